//! Water body analysis request and result models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geometry::GeometryInput;
use super::water_index::WaterIndex;
use super::weather::WeatherSnapshot;
use super::zone::AgricultureStats;

/// Caller options; all informational, none affects the computation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisParameters {
    pub region: String,
    pub period: String,
    pub water_body_type: String,
    /// Buffer around the geometry in meters; not applied to the area
    pub buffer_size: f64,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            region: "all".to_string(),
            period: "current".to_string(),
            water_body_type: "all".to_string(),
            buffer_size: 500.0,
        }
    }
}

/// Body of an analysis request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub geometry: GeometryInput,
    #[serde(default)]
    pub parameters: AnalysisParameters,
}

/// Three-level rank shared by anomalies and alerts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Surface estimate and its variation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceInfo {
    pub value: f64,
    pub unit: String,
    pub variation_percent: f64,
}

/// A detected anomaly
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub description: String,
}

/// One day of the surface forecast
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub day: u32,
    pub predicted_surface: f64,
    pub confidence: f64,
}

/// An operator-facing alert
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: String,
    pub priority: Severity,
    pub message: String,
}

/// Full analysis result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub surface: SurfaceInfo,
    pub water_index: WaterIndex,
    pub anomalies: Vec<Anomaly>,
    pub forecast: Vec<ForecastPoint>,
    pub alerts: Vec<Alert>,
    pub suggestions: Vec<String>,
    pub agriculture_stats: AgricultureStats,
    pub weather_data: WeatherSnapshot,
    pub analysis_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

impl AnalysisResult {
    /// True when any alert needs immediate attention
    pub fn has_high_priority_alert(&self) -> bool {
        self.alerts.iter().any(|a| a.priority == Severity::High)
    }
}
