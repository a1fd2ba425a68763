//! JSON API handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::Serialize;
use tracing::{info, instrument};

use aeronet_client::{CacheMode, Completeness, Statistics, TemporalCoverage};
use aeronet_common::{Measurement, Query as AodQuery, Site};

use super::error::ApiError;
use super::params::ExplorerParams;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SitesResponse {
    pub count: usize,
    pub sites: Vec<Site>,
}

#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub query: AodQuery,
    pub from_cache: bool,
    pub row_count: usize,
    pub timestamps: usize,
    pub coverage: Option<TemporalCoverage>,
    pub completeness: Vec<Completeness>,
    pub rows: Vec<Measurement>,
}

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub query: AodQuery,
    pub from_cache: bool,
    pub statistics: Vec<Statistics>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/sites - All AERONET sites, sorted by name
pub async fn sites_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SitesResponse>, ApiError> {
    let params = ExplorerParams::from_pairs(pairs);
    let catalog = state.service.sites(params.cache_mode()).await?;

    Ok(Json(SitesResponse {
        count: catalog.len(),
        sites: catalog.sites().to_vec(),
    }))
}

/// GET /api/data - Measurement rows with coverage summaries
#[instrument(skip(state, pairs))]
pub async fn data_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<DataResponse>, ApiError> {
    let params = ExplorerParams::from_pairs(pairs);
    let query = params.to_query(&state.config)?;
    let dataset = state.service.load(&query, params.cache_mode()).await?;

    info!(site = %query.site, rows = dataset.rows.len(), from_cache = dataset.from_cache, "Data request");

    Ok(Json(DataResponse {
        row_count: dataset.rows.len(),
        timestamps: dataset.timestamps().len(),
        coverage: dataset.coverage(),
        completeness: dataset.completeness(),
        from_cache: dataset.from_cache,
        query: dataset.query,
        rows: dataset.rows,
    }))
}

/// GET /api/statistics - Descriptive statistics per wavelength
#[instrument(skip(state, pairs))]
pub async fn statistics_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<StatisticsResponse>, ApiError> {
    let params = ExplorerParams::from_pairs(pairs);
    let query = params.to_query(&state.config)?;
    let dataset = state.service.load(&query, CacheMode::Use).await?;

    Ok(Json(StatisticsResponse {
        statistics: dataset.statistics(),
        from_cache: dataset.from_cache,
        query: dataset.query,
    }))
}
