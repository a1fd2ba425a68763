//! Router tests against an in-memory AERONET source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tempfile::TempDir;
use tower::ServiceExt;

use aeronet_client::AodSource;
use aeronet_common::{AeronetError, AeronetResult, Query};
use aod_explorer::{app, config::ExplorerConfig, state::AppState};
use renderer::png::PNG_SIGNATURE;
use test_utils::{aod, sites, temp_cache_dir};

const GSFC_JUNE: &str = "site=GSFC&start=2024-06-01&end=2024-06-02&wavelengths=440,500,675";

struct FixedSource {
    aod: &'static str,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl AodSource for FixedSource {
    async fn fetch_aod(&self, _query: &Query) -> AeronetResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.aod.to_string())
    }

    async fn fetch_sites(&self) -> AeronetResult<String> {
        Ok(sites::SAMPLE_LOCATIONS.to_string())
    }
}

/// Knows the sites but cannot deliver data.
struct FlakySource;

#[async_trait]
impl AodSource for FlakySource {
    async fn fetch_aod(&self, _query: &Query) -> AeronetResult<String> {
        Err(AeronetError::HttpStatus(503))
    }

    async fn fetch_sites(&self) -> AeronetResult<String> {
        Ok(sites::SAMPLE_LOCATIONS.to_string())
    }
}

async fn router_with(source: Arc<dyn AodSource>) -> (Router, TempDir) {
    let dir = temp_cache_dir();
    let config = ExplorerConfig {
        cache_dir: dir.path().to_path_buf(),
        ..ExplorerConfig::default()
    };
    let state = AppState::with_source(config, source, None).await.unwrap();
    (app(Arc::new(state)), dir)
}

async fn router() -> (Router, TempDir, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = FixedSource {
        aod: aod::SAMPLE_LEVEL15,
        calls: calls.clone(),
    };
    let (router, dir) = router_with(Arc::new(source)).await;
    (router, dir, calls)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, _, body) = get(router, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get_text(router: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let (status, headers, body) = get(router, uri).await;
    (status, headers, String::from_utf8(body).unwrap())
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (router, _dir, _) = router().await;
    let (status, body) = get_json(&router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cache"]["entries"], 0);
}

#[tokio::test]
async fn test_metrics_without_recorder_is_empty() {
    let (router, _dir, _) = router().await;
    let (status, _, body) = get_text(&router, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

// ============================================================================
// JSON API
// ============================================================================

#[tokio::test]
async fn test_sites_sorted_by_name() {
    let (router, _dir, _) = router().await;
    let (status, body) = get_json(&router, "/api/sites").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], sites::SAMPLE_LOCATIONS_COUNT);
    let names: Vec<&str> = body["sites"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Beijing", "Cart_Site", "GSFC", "Mauna_Loa"]);
}

#[tokio::test]
async fn test_data_rows_and_summary() {
    let (router, _dir, calls) = router().await;
    let uri = format!("/api/data?{}", GSFC_JUNE);

    let (status, body) = get_json(&router, &uri).await;
    assert_eq!(status, StatusCode::OK);
    // 440: 3, 500: 3, 675: 2
    assert_eq!(body["row_count"], 8);
    assert_eq!(body["rows"].as_array().unwrap().len(), 8);
    assert_eq!(body["timestamps"], 3);
    assert_eq!(body["from_cache"], false);
    assert_eq!(body["coverage"]["span_days"], 1);
    assert_eq!(body["completeness"].as_array().unwrap().len(), 3);

    let (_, again) = get_json(&router, &uri).await;
    assert_eq!(again["from_cache"], true);
    assert_eq!(again["rows"], body["rows"]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_refresh_bypasses_cache() {
    let (router, _dir, calls) = router().await;

    get_json(&router, &format!("/api/data?{}", GSFC_JUNE)).await;
    let (status, body) = get_json(&router, &format!("/api/data?{}&refresh=1", GSFC_JUNE)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["from_cache"], false);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_statistics() {
    let (router, _dir, _) = router().await;
    let (status, body) = get_json(&router, &format!("/api/statistics?{}", GSFC_JUNE)).await;

    assert_eq!(status, StatusCode::OK);
    let stats = body["statistics"].as_array().unwrap();
    assert_eq!(stats.len(), 3);
    assert_eq!(stats[0]["count"], 3);
    let mean = stats[0]["mean"].as_f64().unwrap();
    assert!((mean - 0.5 / 3.0).abs() < 1e-9, "mean was {}", mean);
}

// ============================================================================
// Validation and failures
// ============================================================================

#[tokio::test]
async fn test_reversed_range_rejected_without_fetch() {
    let (router, _dir, calls) = router().await;
    let (status, body) = get_json(&router, "/api/data?site=GSFC&start=2024-06-02&end=2024-06-01&wavelengths=440").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
    assert_eq!(body["retryable"], false);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_site_and_bad_level() {
    let (router, _dir, _) = router().await;

    let (status, _) = get_json(&router, "/api/data?site=Atlantis&start=2024-06-01&end=2024-06-02&wavelengths=440").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(&router, &format!("/api/data?{}&level=3.0", GSFC_JUNE)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_service_failure_is_bad_gateway() {
    let (router, _dir) = router_with(Arc::new(FlakySource)).await;
    let (status, body) = get_json(&router, &format!("/api/data?{}", GSFC_JUNE)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "retrieval");
    assert_eq!(body["retryable"], true);
}

// ============================================================================
// Images and export
// ============================================================================

#[tokio::test]
async fn test_map_png() {
    let (router, _dir, _) = router().await;
    let (status, headers, body) = get(&router, "/map.png?site=GSFC").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    assert_eq!(&body[..8], &PNG_SIGNATURE);
}

#[tokio::test]
async fn test_plots_are_svg() {
    let (router, _dir, _) = router().await;

    for path in ["/plot/timeseries.svg", "/plot/statistics.svg"] {
        let (status, headers, body) = get_text(&router, &format!("{}?{}", path, GSFC_JUNE)).await;
        assert_eq!(status, StatusCode::OK, "{}", path);
        assert_eq!(headers[header::CONTENT_TYPE], "image/svg+xml");
        assert!(body.contains("<svg"), "{}", path);
    }
}

#[tokio::test]
async fn test_export_csv() {
    let (router, _dir, _) = router().await;
    let (status, headers, body) = get_text(&router, &format!("/export.csv?{}", GSFC_JUNE)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"aeronet_GSFC_2024-06-01_to_2024-06-02.csv\""
    );

    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "datetime,AOD_440nm,AOD_500nm,AOD_675nm");
    // One line per displayed timestamp
    assert_eq!(lines.len(), 1 + aod::SAMPLE_LEVEL15_TIMESTAMPS);
    assert!(lines[2].starts_with("2024-06-01 13:00:00,"));
    assert!(lines[2].ends_with(','));
}

// ============================================================================
// Page
// ============================================================================

#[tokio::test]
async fn test_index_first_visit_shows_form() {
    let (router, _dir, calls) = router().await;
    let (status, _, html) = get_text(&router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<form"));
    assert!(html.contains("<option value=\"GSFC\" selected>"));
    assert!(html.contains("name=\"wavelength\" value=\"440\" checked"));
    assert!(html.contains("/map.png?site=GSFC"));
    assert!(!html.contains("Download CSV"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_index_submitted_shows_results() {
    let (router, _dir, _) = router().await;
    let (status, _, html) = get_text(&router, &format!("/?{}", GSFC_JUNE)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Statistics"));
    assert!(html.contains("/plot/timeseries.svg?site=GSFC"));
    assert!(html.contains("Data Completeness"));
    assert!(html.contains("Temporal Coverage"));
    assert!(html.contains("Download CSV"));
}

#[tokio::test]
async fn test_raw_data_table_matches_export() {
    let (router, _dir, _) = router().await;
    let (_, _, html) = get_text(&router, &format!("/?{}", GSFC_JUNE)).await;
    let (_, _, csv) = get_text(&router, &format!("/export.csv?{}", GSFC_JUNE)).await;

    assert!(html.contains("View Raw Data"));
    let start = html.find("<table id=\"raw-data\">").unwrap();
    let end = start + html[start..].find("</table>").unwrap();
    let table = &html[start..end];

    let data_rows = table.matches("<tr><td>").count();
    let csv_lines = csv.lines().count() - 1;
    assert_eq!(data_rows, csv_lines);
    assert_eq!(data_rows, aod::SAMPLE_LEVEL15_TIMESTAMPS);
    assert!(table.contains("<th>datetime</th><th>AOD_440nm</th><th>AOD_500nm</th><th>AOD_675nm</th>"));
    assert!(table.contains("<tr><td>2024-06-01 13:00:00</td>"));
}

#[tokio::test]
async fn test_index_renders_validation_error_inline() {
    let (router, _dir, _) = router().await;
    let (status, _, html) = get_text(&router, "/?site=GSFC&start=2024-06-02&end=2024-06-01&wavelength=440").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(html.contains("class=\"error\""));
    assert!(html.contains("<form"));
}
