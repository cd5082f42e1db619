//! Weather snapshot models

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Current precipitation above this is reported as rain (mm)
pub const RAINY_PRECIPITATION_MM: f64 = 1.0;

/// Relative humidity above this is reported as cloudy (%)
pub const CLOUDY_HUMIDITY_PERCENT: f64 = 70.0;

/// Coarse sky condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
}

impl WeatherCondition {
    /// Rain first, then humidity, otherwise sunny
    pub fn classify(precipitation_mm: f64, humidity_percent: f64) -> Self {
        if precipitation_mm > RAINY_PRECIPITATION_MM {
            WeatherCondition::Rainy
        } else if humidity_percent > CLOUDY_HUMIDITY_PERCENT {
            WeatherCondition::Cloudy
        } else {
            WeatherCondition::Sunny
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherCondition::Sunny => write!(f, "sunny"),
            WeatherCondition::Cloudy => write!(f, "cloudy"),
            WeatherCondition::Rainy => write!(f, "rainy"),
        }
    }
}

/// Where a snapshot came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSource {
    #[default]
    Live,
    Fallback,
}

/// One day of the short-range forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Daily maximum (°C)
    pub temperature: f64,
    pub precipitation_mm: f64,
}

/// Conditions at the analysis center
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// °C
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    pub precipitation_mm: f64,
    pub wind_speed_kmh: f64,
    pub condition: WeatherCondition,
    pub forecast: Vec<DailyForecast>,
    #[serde(default)]
    pub source: WeatherSource,
}

impl WeatherSnapshot {
    /// Deterministic snapshot used when the upstream call fails
    pub fn fallback(today: NaiveDate) -> Self {
        let day = |offset: i64, temperature: f64, precipitation_mm: f64| DailyForecast {
            date: today + Duration::days(offset),
            temperature,
            precipitation_mm,
        };

        Self {
            temperature: 32.0,
            humidity: 45.0,
            precipitation_mm: 0.0,
            wind_speed_kmh: 12.0,
            condition: WeatherCondition::Sunny,
            forecast: vec![day(0, 32.0, 0.0), day(1, 33.0, 0.5), day(2, 31.0, 1.2)],
            source: WeatherSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == WeatherSource::Fallback
    }

    /// Forecast precipitation for the given day index, if present
    pub fn forecast_precipitation(&self, index: usize) -> Option<f64> {
        self.forecast.get(index).map(|d| d.precipitation_mm)
    }
}

/// Round to a number of decimals
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_classification() {
        assert_eq!(WeatherCondition::classify(1.5, 90.0), WeatherCondition::Rainy);
        assert_eq!(WeatherCondition::classify(1.0, 71.0), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::classify(0.0, 70.0), WeatherCondition::Sunny);
        assert_eq!(WeatherCondition::classify(0.2, 45.0), WeatherCondition::Sunny);
    }

    #[test]
    fn test_fallback_snapshot() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let snapshot = WeatherSnapshot::fallback(today);

        assert!(snapshot.is_fallback());
        assert_eq!(snapshot.temperature, 32.0);
        assert_eq!(snapshot.humidity, 45.0);
        assert_eq!(snapshot.precipitation_mm, 0.0);
        assert_eq!(snapshot.wind_speed_kmh, 12.0);
        assert_eq!(snapshot.condition, WeatherCondition::Sunny);
        assert_eq!(snapshot.forecast.len(), 3);
        assert_eq!(snapshot.forecast[2].date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert_eq!(snapshot.forecast_precipitation(1), Some(0.5));
        assert_eq!(snapshot.forecast_precipitation(3), None);
    }

    #[test]
    fn test_snapshot_wire_format() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let json = serde_json::to_value(WeatherSnapshot::fallback(today)).unwrap();
        assert_eq!(json["condition"], "sunny");
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["windSpeedKmh"], 12.0);
        assert_eq!(json["forecast"][0]["date"], "2024-03-01");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.26, 1), 1.3);
        assert_eq!(round_to(31.6, 0), 32.0);
        assert_eq!(round_to(-4.44, 1), -4.4);
    }
}
