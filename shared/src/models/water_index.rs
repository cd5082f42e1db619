//! NDWI-like water index estimated from weather
//!
//! No reflectance bands are available to the service, so the index is a
//! deterministic proxy: an open-water baseline shifted by rain, humidity
//! and evaporation pressure.

use serde::{Deserialize, Serialize};

use super::weather::{round_to, WeatherSnapshot};

/// Baseline index for an open water body
pub const BASE_WATER_INDEX: f64 = 0.35;

/// Day-over-day forecast rain increase that counts as wetting (mm)
pub const WETTING_DELTA_MM: f64 = 5.0;

/// Day-over-day forecast rain decrease that counts as drying (mm)
pub const DRYING_DELTA_MM: f64 = -3.0;

/// Direction of the water index
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndexTrend {
    #[default]
    Stable,
    Increasing,
    Decreasing,
}

impl std::fmt::Display for IndexTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexTrend::Stable => write!(f, "stable"),
            IndexTrend::Increasing => write!(f, "increasing"),
            IndexTrend::Decreasing => write!(f, "decreasing"),
        }
    }
}

/// Index value plus trend, as reported in the analysis result
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaterIndex {
    pub average: f64,
    pub trend: IndexTrend,
}

impl WaterIndex {
    pub fn from_weather(weather: &WeatherSnapshot) -> Self {
        Self {
            average: estimate_water_index(
                weather.precipitation_mm,
                weather.temperature,
                weather.humidity,
            ),
            trend: classify_trend(weather),
        }
    }
}

/// Estimate the index, clamped to [-1, 1] and rounded to two decimals
pub fn estimate_water_index(
    precipitation_mm: f64,
    temperature_c: f64,
    humidity_percent: f64,
) -> f64 {
    let mut index = BASE_WATER_INDEX;

    if precipitation_mm > 10.0 {
        index += 0.15;
    } else if precipitation_mm > 5.0 {
        index += 0.08;
    } else if precipitation_mm < 1.0 {
        index -= 0.12;
    }

    if humidity_percent > 70.0 {
        index += 0.05;
    } else if humidity_percent < 40.0 {
        index -= 0.08;
    }

    if temperature_c > 35.0 {
        index -= 0.10;
    } else if temperature_c > 30.0 {
        index -= 0.05;
    }

    round_to(index, 2).clamp(-1.0, 1.0)
}

/// Compare forecast rain of day 2 against day 1
///
/// The thresholds are asymmetric: a smaller drop already counts as drying.
pub fn classify_trend(weather: &WeatherSnapshot) -> IndexTrend {
    match (weather.forecast_precipitation(0), weather.forecast_precipitation(1)) {
        (Some(first), Some(second)) => {
            let delta = second - first;
            if delta > WETTING_DELTA_MM {
                IndexTrend::Increasing
            } else if delta < DRYING_DELTA_MM {
                IndexTrend::Decreasing
            } else {
                IndexTrend::Stable
            }
        }
        _ => IndexTrend::Stable,
    }
}
