//! Water body analysis pipeline
//!
//! Stages run strictly in order: geometry normalization, zone matching,
//! (weather enrichment, done by the caller since it is the only I/O),
//! index estimation, insight synthesis.

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::models::{
    normalize_geometry, round_to, synthesize, AgricultureStats, AnalysisResult, GeometryInput,
    NormalizedGeometry, SurfaceInfo, WaterIndex, WeatherSnapshot, ZoneTable,
};

/// Variation source for one analysis; identical seeds give identical results
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Output of the stages that precede weather enrichment
#[derive(Debug, Clone)]
pub struct PreparedAnalysis {
    pub geometry: NormalizedGeometry,
    pub agriculture: AgricultureStats,
}

impl PreparedAnalysis {
    /// Normalize the geometry and match its center against the zone table
    pub fn new(geometry: &GeometryInput, zones: &ZoneTable) -> Self {
        let geometry = normalize_geometry(geometry);
        let matched = zones.match_point(geometry.center);
        let agriculture = AgricultureStats::from_zones(&matched);

        Self {
            geometry,
            agriculture,
        }
    }

    /// Latitude to query weather for
    pub fn latitude(&self) -> f64 {
        self.geometry.center.latitude
    }

    /// Longitude to query weather for
    pub fn longitude(&self) -> f64 {
        self.geometry.center.longitude
    }

    /// Finish the analysis once weather is known
    pub fn complete<R: Rng + ?Sized>(
        self,
        weather: WeatherSnapshot,
        rng: &mut R,
        analysis_date: DateTime<Utc>,
    ) -> AnalysisResult {
        let water_index = WaterIndex::from_weather(&weather);
        let insights = synthesize(
            self.geometry.surface_hectares,
            water_index,
            &self.agriculture,
            &weather,
            rng,
        );

        AnalysisResult {
            surface: SurfaceInfo {
                value: insights.final_surface.round(),
                unit: "ha".to_string(),
                variation_percent: round_to(insights.variation_percent, 1),
            },
            water_index,
            anomalies: insights.anomalies,
            forecast: insights.forecast,
            alerts: insights.alerts,
            suggestions: insights.suggestions,
            agriculture_stats: self.agriculture,
            weather_data: weather,
            analysis_date,
            processing_time_ms: None,
        }
    }
}
