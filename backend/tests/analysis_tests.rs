//! Water analysis pipeline tests
//!
//! Tests for the analysis pipeline including:
//! - Geometry normalization in both coordinate systems
//! - Index estimation and trend classification
//! - Forecast series and rule-based insights
//! - End-to-end runs through AnalysisService with stub weather

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use proptest::prelude::*;
use shared::*;
use water_monitoring_backend::services::{AnalysisService, WeatherEnricher};
use water_monitoring_backend::{AppError, AppResult, WeatherProvider};

/// Provider that always fails, forcing the fallback snapshot
struct OfflineProvider;

#[async_trait]
impl WeatherProvider for OfflineProvider {
    async fn fetch_snapshot(&self, _latitude: f64, _longitude: f64) -> AppResult<WeatherSnapshot> {
        Err(AppError::WeatherService("offline".to_string()))
    }
}

/// Provider returning a fixed snapshot
struct FixedProvider(WeatherSnapshot);

#[async_trait]
impl WeatherProvider for FixedProvider {
    async fn fetch_snapshot(&self, _latitude: f64, _longitude: f64) -> AppResult<WeatherSnapshot> {
        Ok(self.0.clone())
    }
}

fn service(provider: Arc<dyn WeatherProvider>, seed: Option<u64>) -> AnalysisService {
    AnalysisService::new(
        Arc::new(ZoneTable::burkina_faso()),
        WeatherEnricher::new(provider),
        seed,
    )
}

fn wet_snapshot() -> WeatherSnapshot {
    let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
    let mut snapshot = WeatherSnapshot::fallback(today);
    snapshot.temperature = 26.0;
    snapshot.humidity = 85.0;
    snapshot.precipitation_mm = 24.0;
    snapshot.wind_speed_kmh = 18.0;
    snapshot.condition = WeatherCondition::Rainy;
    snapshot.forecast[0].precipitation_mm = 2.0;
    snapshot.forecast[1].precipitation_mm = 12.0;
    snapshot.source = WeatherSource::Live;
    snapshot
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Centre point with upstream down: maize zone, drought anomaly and alert
    #[tokio::test]
    async fn test_centre_point_with_fallback() {
        let request = AnalysisRequest {
            geometry: GeometryInput::point(-1.5584, 12.2395),
            parameters: AnalysisParameters::default(),
        };
        let result = service(Arc::new(OfflineProvider), Some(7)).analyze(request).await;

        assert!(result.weather_data.is_fallback());
        assert_eq!(result.weather_data.temperature, 32.0);
        assert!(result
            .agriculture_stats
            .crop_breakdown
            .iter()
            .any(|c| c.crop_type == "Maize"));
        assert_eq!(result.water_index.average, 0.18);
        assert!(result.water_index.average < 0.25);
        assert!(result
            .anomalies
            .iter()
            .any(|a| a.severity == Severity::High && a.kind == "Very low water index"));
        assert!(result.alerts.iter().any(|a| a.kind == "Drought alert"));
        assert_eq!(result.forecast.len(), 7);
        assert!(result.processing_time_ms.is_some());
    }

    /// Mercator polygon around Ouagadougou is converted before matching
    #[tokio::test]
    async fn test_web_mercator_polygon() {
        let ring = vec![
            [-175_000.0, 1_370_000.0],
            [-172_000.0, 1_370_000.0],
            [-172_000.0, 1_374_000.0],
            [-175_000.0, 1_374_000.0],
        ];
        let request = AnalysisRequest {
            geometry: GeometryInput::polygon(ring),
            parameters: AnalysisParameters::default(),
        };
        let result = service(Arc::new(OfflineProvider), Some(3)).analyze(request).await;

        assert!(!result.agriculture_stats.crop_breakdown.is_empty());
        assert!(result.surface.value > 10.0);
    }

    /// Wet live weather: flood alert and an increasing trend
    #[tokio::test]
    async fn test_wet_live_weather() {
        let request = AnalysisRequest {
            geometry: GeometryInput::point(-1.5584, 12.2395),
            parameters: AnalysisParameters::default(),
        };
        let result = service(Arc::new(FixedProvider(wet_snapshot())), Some(1))
            .analyze(request)
            .await;

        assert!(!result.weather_data.is_fallback());
        // 0.35 + 0.15 + 0.05
        assert_eq!(result.water_index.average, 0.55);
        assert_eq!(result.water_index.trend, IndexTrend::Increasing);
        assert!(result
            .alerts
            .iter()
            .any(|a| a.kind == "High flood risk" && a.priority == Severity::High));
        assert!(result.surface.variation_percent >= 1.0);

        let base = result.surface.value;
        assert_eq!(result.forecast[0].predicted_surface, (base * 1.01).round());
        assert_eq!(result.forecast[6].predicted_surface, (base * 1.07).round());
    }

    /// A point outside every zone keeps empty statistics
    #[tokio::test]
    async fn test_point_outside_zones() {
        let request = AnalysisRequest {
            geometry: GeometryInput::point(100.0, 80.0),
            parameters: AnalysisParameters::default(),
        };
        let result = service(Arc::new(OfflineProvider), Some(9)).analyze(request).await;

        assert_eq!(result.agriculture_stats.total_surface, 0.0);
        assert_eq!(result.agriculture_stats.total_parcels, 0);
        assert_eq!(result.surface.value, 100.0);
    }

    /// Missing geometry is analyzed at (0, 0) rather than rejected
    #[tokio::test]
    async fn test_missing_geometry_degrades() {
        let result = service(Arc::new(OfflineProvider), Some(9))
            .analyze(AnalysisRequest::default())
            .await;

        assert!(result.agriculture_stats.crop_breakdown.is_empty());
        assert_eq!(result.surface.value, DEFAULT_SURFACE_HECTARES);
    }

    /// A fixed seed pins the random parts of the result
    #[tokio::test]
    async fn test_seeded_runs_are_reproducible() {
        let request = AnalysisRequest {
            geometry: GeometryInput::point(-1.5584, 12.2395),
            parameters: AnalysisParameters::default(),
        };
        let svc = service(Arc::new(OfflineProvider), Some(42));
        let first = svc.analyze(request.clone()).await;
        let second = svc.analyze(request).await;

        assert_eq!(first.surface, second.surface);
        assert_eq!(first.forecast, second.forecast);
        assert_eq!(first.anomalies, second.anomalies);
    }

    /// Mercator origin maps to the geographic origin
    #[test]
    fn test_mercator_origin() {
        let point = web_mercator_to_wgs84(0.0, 0.0);
        assert_eq!(point.longitude, 0.0);
        assert!(point.latitude.abs() < 1e-9);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn geographic_ring_strategy() -> impl Strategy<Value = Vec<[f64; 2]>> {
        prop::collection::vec((-179.0f64..179.0, -89.0f64..89.0), 3..12)
            .prop_map(|points| points.into_iter().map(|(x, y)| [x, y]).collect())
    }

    fn trend_strategy() -> impl Strategy<Value = IndexTrend> {
        prop_oneof![
            Just(IndexTrend::Stable),
            Just(IndexTrend::Increasing),
            Just(IndexTrend::Decreasing),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Geographic rings pass through unchanged
        #[test]
        fn prop_geographic_ring_is_identity(ring in geographic_ring_strategy()) {
            let normalized = normalize_geometry(&GeometryInput::polygon(ring.clone()));
            prop_assert_eq!(normalized.coordinate_system, CoordinateSystem::Geographic);
            for (raw, point) in ring.iter().zip(&normalized.ring) {
                prop_assert_eq!(raw[0], point.longitude);
                prop_assert_eq!(raw[1], point.latitude);
            }
            prop_assert!(normalized.surface_hectares >= 0.0);
        }

        /// Projected points land inside WGS84 bounds, including wrapped map views
        #[test]
        fn prop_mercator_points_convert(
            x in -60_000_000.0f64..60_000_000.0,
            y in 200.0f64..20_037_508.0,
        ) {
            let normalized = normalize_geometry(&GeometryInput::point(x, y));
            prop_assert_eq!(normalized.coordinate_system, CoordinateSystem::WebMercator);
            prop_assert!(normalized.center.is_geographic());
            prop_assert_eq!(normalized.surface_hectares, POINT_SURFACE_HECTARES);
        }

        /// Seven days, non-increasing confidence floored at 0.5
        #[test]
        fn prop_forecast_series_shape(
            surface in 1.0f64..1_000_000.0,
            trend in trend_strategy(),
            seed in any::<u64>(),
        ) {
            let forecast = forecast_surface(surface, trend, &mut seeded_rng(seed));
            prop_assert_eq!(forecast.len(), 7);
            for (i, point) in forecast.iter().enumerate() {
                prop_assert_eq!(point.day as usize, i + 1);
                prop_assert!(point.confidence >= MIN_CONFIDENCE && point.confidence <= 1.0);
            }
            for pair in forecast.windows(2) {
                prop_assert!(pair[1].confidence <= pair[0].confidence);
            }
        }

        /// A very low index always yields a high-severity anomaly
        #[test]
        fn prop_very_low_index_flagged(
            index in -1.0f64..0.2,
            seed in any::<u64>(),
        ) {
            let weather = WeatherSnapshot::fallback(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
            let variation = surface_variation(index, &mut seeded_rng(seed));
            let anomalies = detect_anomalies(index, variation, &weather);
            prop_assert!(anomalies
                .iter()
                .any(|a| a.kind == "Very low water index" && a.severity == Severity::High));
        }

        /// Variation stays inside its regime
        #[test]
        fn prop_variation_within_regime(index in -1.0f64..1.0, seed in any::<u64>()) {
            let variation = surface_variation(index, &mut seeded_rng(seed));
            if index < 0.25 {
                prop_assert!((-10.0..=-2.0).contains(&variation));
            } else if index > 0.45 {
                prop_assert!((1.0..=7.0).contains(&variation));
            } else {
                prop_assert!((-2.0..=2.0).contains(&variation));
            }
        }

        /// Alerts and anomalies are never empty
        #[test]
        fn prop_rules_never_empty(
            index in -1.0f64..1.0,
            variation in -10.0f64..10.0,
            precipitation in 0.0f64..50.0,
            temperature in 10.0f64..45.0,
        ) {
            let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
            let mut weather = WeatherSnapshot::fallback(date);
            weather.precipitation_mm = precipitation;
            weather.temperature = temperature;
            prop_assert!(!detect_anomalies(index, variation, &weather).is_empty());
            prop_assert!(!derive_alerts(index, &weather).is_empty());
        }
    }
}
