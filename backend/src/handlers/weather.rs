//! Weather HTTP handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{validate_coordinates, WeatherSnapshot};

use crate::error::{AppError, AppResult};
use crate::services::WeatherEnricher;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions at a position, falling back when upstream fails
pub async fn get_weather(
    State(state): State<AppState>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> AppResult<Json<WeatherSnapshot>> {
    let Query(query) = query?;
    validate_coordinates(query.longitude, query.latitude)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let enricher = WeatherEnricher::new(state.weather.clone());
    Ok(Json(enricher.enrich(query.latitude, query.longitude).await))
}
