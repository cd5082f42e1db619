//! Configuration management for the Water Monitoring service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with WM_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::ZoneTable;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Analysis pipeline configuration
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Open-Meteo forecast endpoint
    pub api_endpoint: String,

    /// Timezone used for daily aggregates
    pub timezone: String,

    /// Number of forecast days requested
    pub forecast_days: u8,

    /// Request timeout; unset leaves the HTTP client default
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AnalysisConfig {
    /// Fixed seed for the variation source; unset draws a fresh seed per request
    pub seed: Option<u64>,

    /// JSON file replacing the built-in zone table
    pub zones_file: Option<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("WM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("weather.api_endpoint", WeatherConfig::DEFAULT_ENDPOINT)?
            .set_default("weather.timezone", WeatherConfig::DEFAULT_TIMEZONE)?
            .set_default("weather.forecast_days", 3)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (WM_SERVER__PORT -> server.port)
            .add_source(
                Environment::with_prefix("WM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Zone table from `analysis.zones_file`, or the built-in table
    pub fn load_zones(&self) -> anyhow::Result<ZoneTable> {
        match &self.analysis.zones_file {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| anyhow::anyhow!("cannot read zones file {}: {}", path, e))?;
                let zones = ZoneTable::from_json(&json)
                    .map_err(|e| anyhow::anyhow!("invalid zones file {}: {}", path, e))?;
                Ok(zones)
            }
            None => Ok(ZoneTable::burkina_faso()),
        }
    }
}

impl WeatherConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.open-meteo.com/v1/forecast";
    pub const DEFAULT_TIMEZONE: &'static str = "Africa/Ouagadougou";
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            timezone: Self::DEFAULT_TIMEZONE.to_string(),
            forecast_days: 3,
            timeout_secs: None,
        }
    }
}
