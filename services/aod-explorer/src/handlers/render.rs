//! Image handlers: site map (PNG) and charts (SVG).

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use aeronet_client::CacheMode;
use aeronet_common::AeronetError;

use super::error::ApiError;
use super::params::ExplorerParams;
use crate::state::AppState;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// GET /map.png - All sites, with `site` highlighted when given
#[instrument(skip(state, pairs))]
pub async fn map_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let params = ExplorerParams::from_pairs(pairs);
    let catalog = state.service.sites(CacheMode::Use).await?;
    let (width, height) = state.config.map_size();

    let png = tokio::task::spawn_blocking(move || {
        renderer::render_site_map(&catalog, params.site.as_deref(), width, height)
    })
    .await
    .map_err(|e| AeronetError::InternalError(format!("map task failed: {}", e)))??;

    metrics::counter!("explorer_renders_total", "image" => "map").increment(1);
    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// GET /plot/timeseries.svg - AOD over time
#[instrument(skip(state, pairs))]
pub async fn timeseries_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let query = ExplorerParams::from_pairs(pairs).to_query(&state.config)?;
    let dataset = state.service.load(&query, CacheMode::Use).await?;

    let title = format!("AOD Time Series - {}", query.site);
    let svg = renderer::render_timeseries_svg(&dataset.rows, &query.wavelengths, &title, state.config.plot_size())?;

    metrics::counter!("explorer_renders_total", "image" => "timeseries").increment(1);
    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg).into_response())
}

/// GET /plot/statistics.svg - AOD distribution per wavelength
#[instrument(skip(state, pairs))]
pub async fn statistics_plot_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let query = ExplorerParams::from_pairs(pairs).to_query(&state.config)?;
    let dataset = state.service.load(&query, CacheMode::Use).await?;

    let svg = renderer::render_statistics_svg(&dataset.rows, &query.wavelengths, state.config.plot_size())?;

    metrics::counter!("explorer_renders_total", "image" => "statistics").increment(1);
    Ok(([(header::CONTENT_TYPE, SVG_CONTENT_TYPE)], svg).into_response())
}
