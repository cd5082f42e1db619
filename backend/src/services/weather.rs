//! Weather enrichment with a deterministic fallback

use std::sync::Arc;

use chrono::Utc;
use shared::WeatherSnapshot;

use crate::external::WeatherProvider;

/// Weather enricher; never fails, substitutes the fallback snapshot instead
#[derive(Clone)]
pub struct WeatherEnricher {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherEnricher {
    /// Create a new WeatherEnricher over a provider
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Current conditions at a position, or the fallback snapshot
    pub async fn enrich(&self, latitude: f64, longitude: f64) -> WeatherSnapshot {
        match self.provider.fetch_snapshot(latitude, longitude).await {
            Ok(snapshot) => {
                tracing::debug!(
                    latitude,
                    longitude,
                    temperature = snapshot.temperature,
                    precipitation = snapshot.precipitation_mm,
                    "Fetched live weather"
                );
                snapshot
            }
            Err(e) => {
                tracing::warn!(
                    latitude,
                    longitude,
                    error = %e,
                    "Weather fetch failed, using fallback"
                );
                WeatherSnapshot::fallback(Utc::now().date_naive())
            }
        }
    }
}
