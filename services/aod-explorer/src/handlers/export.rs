//! CSV download of the displayed measurements.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::{info, instrument};

use aeronet_client::CacheMode;

use super::error::ApiError;
use super::params::ExplorerParams;
use crate::state::AppState;

/// GET /export.csv - One line per timestamp, one column per wavelength
#[instrument(skip(state, pairs))]
pub async fn export_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let query = ExplorerParams::from_pairs(pairs).to_query(&state.config)?;
    let dataset = state.service.load(&query, CacheMode::Use).await?;

    let mut body = Vec::new();
    let lines = renderer::export_csv(&dataset.rows, &query.wavelengths, &mut body)?;
    let filename = renderer::export_filename(&query);

    info!(site = %query.site, lines = lines, file = %filename, "CSV export");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        body,
    )
        .into_response())
}
