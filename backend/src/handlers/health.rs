//! Health check and service information handlers

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Root endpoint
pub async fn root() -> &'static str {
    "Water Monitoring Analysis API v1.0"
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check database connectivity
    let db_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected".to_string(),
        Err(_) => "disconnected".to_string(),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    })
}

/// Service description and endpoint map
pub async fn api_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": "Water Monitoring Analysis API",
        "version": env!("CARGO_PKG_VERSION"),
        "zones": state.zones.len(),
        "endpoints": {
            "analysis": "POST /api/v1/water-analysis",
            "weather": "GET /api/v1/weather?latitude=&longitude=",
            "zones": "GET /api/v1/zones",
            "zoneMatch": "GET /api/v1/zones/match?longitude=&latitude=",
            "history": "GET|POST /api/v1/history",
            "historyEntry": "GET|PATCH|DELETE /api/v1/history/{id}",
            "historyTags": "GET /api/v1/history/tags",
            "historyExport": "GET /api/v1/history/export"
        },
        "features": [
            "geometry normalization (WGS84 and Web Mercator)",
            "agricultural zone matching",
            "live weather with fallback",
            "weather-based water index",
            "anomalies, alerts, forecast and suggestions",
            "analysis history with CSV export"
        ]
    }))
}
