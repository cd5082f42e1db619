//! Route definitions for the Water Monitoring service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/info", get(handlers::api_info))
        // Analysis pipeline
        .route("/water-analysis", post(handlers::analyze_water_body))
        // Weather enrichment
        .route("/weather", get(handlers::get_weather))
        // Agricultural zones
        .nest("/zones", zone_routes())
        // Saved analyses
        .nest("/history", history_routes())
}

/// Agricultural zone routes
fn zone_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_zones))
        .route("/match", get(handlers::match_zones))
}

/// Analysis history routes
fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_history).post(handlers::create_history))
        .route("/tags", get(handlers::list_history_tags))
        .route("/export", get(handlers::export_history))
        .route(
            "/:history_id",
            get(handlers::get_history)
                .patch(handlers::update_history)
                .delete(handlers::delete_history),
        )
}
