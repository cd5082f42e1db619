//! Business logic services for the Water Monitoring service

pub mod analysis;
pub mod history;
pub mod weather;

pub use analysis::AnalysisService;
pub use history::HistoryService;
pub use weather::WeatherEnricher;
