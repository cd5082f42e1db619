//! Water body analysis service

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rand::Rng;
use shared::{seeded_rng, AnalysisRequest, AnalysisResult, PreparedAnalysis, ZoneTable};

use super::weather::WeatherEnricher;

/// Runs the analysis pipeline for one request
#[derive(Clone)]
pub struct AnalysisService {
    zones: Arc<ZoneTable>,
    weather: WeatherEnricher,
    seed: Option<u64>,
}

impl AnalysisService {
    /// Create a new AnalysisService
    pub fn new(zones: Arc<ZoneTable>, weather: WeatherEnricher, seed: Option<u64>) -> Self {
        Self {
            zones,
            weather,
            seed,
        }
    }

    /// Analyze one geometry
    pub async fn analyze(&self, request: AnalysisRequest) -> AnalysisResult {
        let started = Instant::now();
        let params = &request.parameters;
        tracing::info!(
            region = %params.region,
            period = %params.period,
            water_body_type = %params.water_body_type,
            buffer_size = params.buffer_size,
            "Starting water analysis"
        );

        let prepared = PreparedAnalysis::new(&request.geometry, &self.zones);
        tracing::debug!(
            coordinate_system = ?prepared.geometry.coordinate_system,
            longitude = prepared.longitude(),
            latitude = prepared.latitude(),
            surface_hectares = prepared.geometry.surface_hectares,
            matched_zones = prepared.agriculture.crop_breakdown.len(),
            "Geometry normalized"
        );

        let weather = self
            .weather
            .enrich(prepared.latitude(), prepared.longitude())
            .await;

        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());
        tracing::debug!(seed, "Variation source seeded");
        let mut rng = seeded_rng(seed);

        let mut result = prepared.complete(weather, &mut rng, Utc::now());
        let elapsed = started.elapsed().as_millis() as u64;
        result.processing_time_ms = Some(elapsed);

        tracing::info!(
            surface = result.surface.value,
            water_index = result.water_index.average,
            trend = %result.water_index.trend,
            alerts = result.alerts.len(),
            high_priority = result.has_high_priority_alert(),
            elapsed_ms = elapsed,
            "Water analysis completed"
        );

        result
    }
}
