//! HTTP request handlers

pub mod analysis;
pub mod health;
pub mod history;
pub mod weather;
pub mod zones;

pub use analysis::*;
pub use health::*;
pub use history::*;
pub use weather::*;
pub use zones::*;
