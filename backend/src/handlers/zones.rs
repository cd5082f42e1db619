//! Agricultural zone handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{validate_coordinates, AgriculturalZone, AgricultureStats, GeoPoint};

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ZoneMatchQuery {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneMatchResponse {
    pub point: GeoPoint,
    pub zones: Vec<AgriculturalZone>,
    pub agriculture_stats: AgricultureStats,
}

/// List the zone table
pub async fn list_zones(State(state): State<AppState>) -> Json<Vec<AgriculturalZone>> {
    Json(state.zones.zones().to_vec())
}

/// Zones containing a point, with their statistics
pub async fn match_zones(
    State(state): State<AppState>,
    query: Result<Query<ZoneMatchQuery>, QueryRejection>,
) -> AppResult<Json<ZoneMatchResponse>> {
    let Query(query) = query?;
    validate_coordinates(query.longitude, query.latitude)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let point = GeoPoint::new(query.longitude, query.latitude);
    let matched = state.zones.match_point(point);
    let agriculture_stats = AgricultureStats::from_zones(&matched);

    Ok(Json(ZoneMatchResponse {
        point,
        zones: matched.into_iter().cloned().collect(),
        agriculture_stats,
    }))
}
