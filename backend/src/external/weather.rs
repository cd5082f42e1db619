//! Weather API client for fetching current conditions and a short forecast
//!
//! Integrates with the Open-Meteo forecast API (no key required).

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use shared::{round_to, DailyForecast, WeatherCondition, WeatherSnapshot, WeatherSource};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Forecast entries kept in a snapshot
pub const MAX_FORECAST_ENTRIES: usize = 3;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,precipitation,wind_speed_10m";
const DAILY_FIELDS: &str = "temperature_2m_max,precipitation_sum";

/// Source of live weather snapshots
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch conditions at a position; errors are left to the caller
    async fn fetch_snapshot(&self, latitude: f64, longitude: f64) -> AppResult<WeatherSnapshot>;
}

/// Open-Meteo API client
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    timezone: String,
    forecast_days: u8,
}

/// Open-Meteo forecast response
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    #[serde(default)]
    current: Option<OpenMeteoCurrent>,
    #[serde(default)]
    daily: Option<OpenMeteoDaily>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    precipitation: f64,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
}

impl OpenMeteoClient {
    /// Create a client from the weather configuration
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| {
            AppError::Internal(format!("Failed to build weather HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: config.api_endpoint.clone(),
            timezone: config.timezone.clone(),
            forecast_days: config.forecast_days,
        })
    }

    /// Create a client against a custom endpoint (for testing)
    pub fn with_base_url(base_url: String) -> AppResult<Self> {
        Self::new(&WeatherConfig {
            api_endpoint: base_url,
            ..WeatherConfig::default()
        })
    }

    /// Query parameters for one request
    fn query(&self, latitude: f64, longitude: f64) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", self.timezone.clone()),
            ("forecast_days", self.forecast_days.to_string()),
        ]
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn fetch_snapshot(&self, latitude: f64, longitude: f64) -> AppResult<WeatherSnapshot> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query(latitude, longitude))
            .send()
            .await
            .map_err(|e| AppError::WeatherService(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherService(format!("{} - {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::WeatherService(format!("failed to read response: {}", e)))?;

        parse_forecast(&body)
    }
}

/// Convert an Open-Meteo forecast payload into a snapshot
pub fn parse_forecast(body: &str) -> AppResult<WeatherSnapshot> {
    let data: OpenMeteoResponse = serde_json::from_str(body)
        .map_err(|e| AppError::WeatherService(format!("failed to parse response: {}", e)))?;

    let current = data
        .current
        .ok_or_else(|| AppError::WeatherService("response has no current block".to_string()))?;
    let daily = data
        .daily
        .ok_or_else(|| AppError::WeatherService("response has no daily block".to_string()))?;

    let forecast = daily
        .time
        .iter()
        .zip(daily.temperature_2m_max.iter())
        .zip(daily.precipitation_sum.iter())
        .take(MAX_FORECAST_ENTRIES)
        .map(|((date, temperature), precipitation)| {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| AppError::WeatherService(format!("invalid date {}: {}", date, e)))?;
            Ok(DailyForecast {
                date,
                temperature: temperature.unwrap_or_default().round(),
                precipitation_mm: round_to(precipitation.unwrap_or_default(), 1),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(WeatherSnapshot {
        temperature: current.temperature_2m.round(),
        humidity: current.relative_humidity_2m.round(),
        precipitation_mm: round_to(current.precipitation, 1),
        wind_speed_kmh: current.wind_speed_10m.round(),
        condition: WeatherCondition::classify(current.precipitation, current.relative_humidity_2m),
        forecast,
        source: WeatherSource::Live,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r#"{
        "latitude": 12.25,
        "longitude": -1.5,
        "current": {
            "time": "2024-08-01T12:00",
            "temperature_2m": 29.6,
            "relative_humidity_2m": 78.4,
            "precipitation": 0.84,
            "wind_speed_10m": 14.5
        },
        "daily": {
            "time": ["2024-08-01", "2024-08-02", "2024-08-03", "2024-08-04"],
            "temperature_2m_max": [31.2, 30.5, null, 33.0],
            "precipitation_sum": [2.26, 8.04, 0.0, 1.0]
        }
    }"#;

    #[test]
    fn test_parse_rounds_values() {
        let snapshot = parse_forecast(SAMPLE).unwrap();
        assert_eq!(snapshot.temperature, 30.0);
        assert_eq!(snapshot.humidity, 78.0);
        assert_eq!(snapshot.precipitation_mm, 0.8);
        assert_eq!(snapshot.wind_speed_kmh, 15.0);
        assert_eq!(snapshot.condition, WeatherCondition::Cloudy);
        assert_eq!(snapshot.source, WeatherSource::Live);
    }

    #[test]
    fn test_parse_keeps_three_days() {
        let snapshot = parse_forecast(SAMPLE).unwrap();
        assert_eq!(snapshot.forecast.len(), 3);
        assert_eq!(
            snapshot.forecast[0].date,
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
        );
        assert_eq!(snapshot.forecast[0].precipitation_mm, 2.3);
        assert_eq!(snapshot.forecast[1].temperature, 31.0);
        assert_eq!(snapshot.forecast[2].temperature, 0.0);
    }

    #[test]
    fn test_missing_blocks_are_errors() {
        let daily_only = json!({
            "daily": {"time": [], "temperature_2m_max": [], "precipitation_sum": []}
        });
        assert!(parse_forecast(&daily_only.to_string()).is_err());
        let current_only = json!({
            "current": {
                "temperature_2m": 1,
                "relative_humidity_2m": 1,
                "precipitation": 0,
                "wind_speed_10m": 1
            }
        });
        assert!(parse_forecast(&current_only.to_string()).is_err());
        assert!(parse_forecast(r#"{"error": true, "reason": "bad latitude"}"#).is_err());
        assert!(parse_forecast("not json").is_err());
    }

    #[test]
    fn test_query_parameters() {
        let client = OpenMeteoClient::new(&WeatherConfig::default()).unwrap();
        let query = client.query(12.2395, -1.5584);
        assert!(query.contains(&("latitude", "12.2395".to_string())));
        assert!(query.contains(&("timezone", "Africa/Ouagadougou".to_string())));
        assert!(query.contains(&("forecast_days", "3".to_string())));
        assert!(query.contains(&("current", CURRENT_FIELDS.to_string())));
    }
}
