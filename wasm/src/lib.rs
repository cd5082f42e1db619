//! WebAssembly module for the Water Monitoring platform
//!
//! Provides client-side computation for:
//! - Geometry normalization (WGS84 / Web Mercator)
//! - Water index estimation
//! - Agricultural zone matching
//! - Offline analysis with caller-supplied weather

use chrono::{DateTime, Utc};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Normalize a geometry; returns the center, surface and coordinate system as JSON
#[wasm_bindgen]
pub fn normalize_geometry(geometry_json: &str) -> Result<String, JsValue> {
    let geometry: GeometryInput = serde_json::from_str(geometry_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid geometry JSON: {}", e)))?;

    to_json(&shared::normalize_geometry(&geometry))
}

/// Weather-based water index in [-1, 1]
#[wasm_bindgen]
pub fn estimate_water_index(
    precipitation_mm: f64,
    temperature_c: f64,
    humidity_percent: f64,
) -> f64 {
    shared::estimate_water_index(precipitation_mm, temperature_c, humidity_percent)
}

/// Zones of the built-in table containing a point, with their statistics
#[wasm_bindgen]
pub fn match_zones(longitude: f64, latitude: f64) -> Result<String, JsValue> {
    validate_coordinates(longitude, latitude).map_err(JsValue::from_str)?;

    let table = ZoneTable::burkina_faso();
    let matched = table.match_point(GeoPoint::new(longitude, latitude));
    let stats = AgricultureStats::from_zones(&matched);

    to_json(&serde_json::json!({
        "zones": matched,
        "agricultureStats": stats,
    }))
}

/// Full analysis without network access
///
/// `weather_json` is a weather snapshot; an empty string uses the fallback
/// snapshot. The same seed and inputs give the same result.
#[wasm_bindgen]
pub fn analyze_offline(
    geometry_json: &str,
    weather_json: &str,
    seed: u64,
) -> Result<String, JsValue> {
    let now = DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default();
    if weather_json.trim().is_empty() {
        web_sys::console::warn_1(&"No weather supplied, using fallback snapshot".into());
    }

    let result =
        run_offline(geometry_json, weather_json, seed, now).map_err(|e| JsValue::from_str(&e))?;
    to_json(&result)
}

/// Platform-independent core of [`analyze_offline`]
pub fn run_offline(
    geometry_json: &str,
    weather_json: &str,
    seed: u64,
    now: DateTime<Utc>,
) -> Result<AnalysisResult, String> {
    let geometry: GeometryInput = serde_json::from_str(geometry_json)
        .map_err(|e| format!("Invalid geometry JSON: {}", e))?;

    let weather = if weather_json.trim().is_empty() {
        WeatherSnapshot::fallback(now.date_naive())
    } else {
        serde_json::from_str(weather_json).map_err(|e| format!("Invalid weather JSON: {}", e))?
    };

    let prepared = shared::PreparedAnalysis::new(&geometry, &ZoneTable::burkina_faso());
    let mut rng = shared::seeded_rng(seed);
    Ok(prepared.complete(weather, &mut rng, now))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_point() {
        let json = normalize_geometry(r#"{"x": -1.5584, "y": 12.2395}"#).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["surfaceHectares"], 100.0);
        assert_eq!(value["coordinateSystem"], "geographic");
    }

    #[test]
    fn test_normalize_mercator_with_wkid() {
        let json = normalize_geometry(
            r#"{"x": 0, "y": 0, "spatialReference": {"wkid": 102100}}"#,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["coordinateSystem"], "web_mercator");
        assert_eq!(value["center"]["longitude"], 0.0);
    }

    #[test]
    fn test_estimate_water_index() {
        assert_eq!(estimate_water_index(15.0, 25.0, 80.0), 0.55);
        assert_eq!(estimate_water_index(0.0, 40.0, 20.0), 0.05);
    }

    #[test]
    fn test_match_zones() {
        let json = match_zones(-1.5584, 12.2395).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["zones"].as_array().unwrap().len(), 3);
        assert_eq!(value["agricultureStats"]["totalSurface"], 95_000.0);

        let json = match_zones(100.0, 80.0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["zones"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_run_offline_with_fallback() {
        let now = Utc::now();
        let result = run_offline(r#"{"x": -1.5584, "y": 12.2395}"#, "", 5, now).unwrap();
        assert!(result.weather_data.is_fallback());
        assert_eq!(result.water_index.average, 0.18);
        assert_eq!(result.analysis_date, now);

        let again = run_offline(r#"{"x": -1.5584, "y": 12.2395}"#, "", 5, now).unwrap();
        assert_eq!(result.forecast, again.forecast);
        assert_eq!(result.surface, again.surface);
    }

    #[test]
    fn test_run_offline_with_supplied_weather() {
        let weather = serde_json::json!({
            "temperature": 26.0,
            "humidity": 85.0,
            "precipitationMm": 24.0,
            "windSpeedKmh": 10.0,
            "condition": "rainy",
            "forecast": [
                {"date": "2024-08-01", "temperature": 27.0, "precipitationMm": 2.0},
                {"date": "2024-08-02", "temperature": 27.0, "precipitationMm": 12.0}
            ]
        });
        let geometry = r#"{"x": -1.5584, "y": 12.2395}"#;
        let result = run_offline(geometry, &weather.to_string(), 1, Utc::now()).unwrap();
        assert_eq!(result.water_index.average, 0.55);
        assert_eq!(result.water_index.trend, IndexTrend::Increasing);
        assert!(!result.weather_data.is_fallback());
    }

    #[test]
    fn test_run_offline_rejects_bad_json() {
        assert!(run_offline("not json", "", 1, Utc::now()).is_err());
        assert!(run_offline("{}", "{bad", 1, Utc::now()).is_err());
    }
}
