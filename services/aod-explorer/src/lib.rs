//! AERONET AOD explorer: web UI and command line over the cached data service.

pub mod config;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the router with every explorer route.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Page
        .route("/", get(handlers::page::index_handler))
        // JSON API
        .route("/api/sites", get(handlers::api::sites_handler))
        .route("/api/data", get(handlers::api::data_handler))
        .route("/api/statistics", get(handlers::api::statistics_handler))
        // Images
        .route("/map.png", get(handlers::render::map_handler))
        .route("/plot/timeseries.svg", get(handlers::render::timeseries_handler))
        .route("/plot/statistics.svg", get(handlers::render::statistics_plot_handler))
        // Export
        .route("/export.csv", get(handlers::export::export_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
