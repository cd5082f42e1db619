//! Water analysis HTTP handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use shared::{AnalysisRequest, AnalysisResult};

use crate::error::{AppError, AppResult};
use crate::services::{AnalysisService, WeatherEnricher};
use crate::AppState;

/// Run the analysis pipeline on a posted geometry
///
/// Any failure, including a body that is not valid JSON, answers 500.
pub async fn analyze_water_body(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> AppResult<Json<AnalysisResult>> {
    let Json(request) = payload.map_err(|rejection| AppError::Analysis(rejection.body_text()))?;

    let service = AnalysisService::new(
        state.zones.clone(),
        WeatherEnricher::new(state.weather.clone()),
        state.config.analysis.seed,
    );

    Ok(Json(service.analyze(request).await))
}
