//! The explorer page: selection form, site information and, once a query is
//! submitted, the results.
//!
//! Charts and the map are separate image routes referenced from the page, so
//! the HTML itself stays small.

use std::fmt::Write;
use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::Html,
};
use tracing::instrument;

use aeronet_client::{AodDataset, CacheMode};
use aeronet_common::{
    AeronetError, AveragingType, QualityLevel, Site, SiteCatalog, AOD_WAVELENGTHS, DEFAULT_WAVELENGTHS,
};

use super::error::ApiError;
use super::params::{default_range, link_query, ExplorerParams};
use crate::config::ExplorerConfig;
use crate::state::AppState;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>AERONET AOD Explorer</title>
    <style>
        body { font-family: sans-serif; margin: 0; display: flex; color: #222; }
        aside { width: 300px; padding: 16px; background: #f3f5f8; min-height: 100vh; box-sizing: border-box; }
        main { flex: 1; padding: 16px 24px; }
        label { display: block; margin-top: 10px; font-weight: bold; }
        fieldset { margin-top: 10px; border: 1px solid #ccd; }
        fieldset label { display: inline-block; font-weight: normal; margin: 2px 8px 2px 0; }
        select, input[type=date], input[type=text] { width: 100%; }
        button { margin-top: 14px; width: 100%; padding: 6px; }
        table { border-collapse: collapse; margin: 8px 0 16px; }
        th, td { border: 1px solid #ccd; padding: 4px 8px; text-align: right; }
        th:first-child, td:first-child { text-align: left; }
        .swatch { display: inline-block; width: 10px; height: 10px; margin-right: 6px; }
        .error { background: #fde8e8; border: 1px solid #d62728; padding: 10px; }
        .note { color: #666; }
        img { max-width: 100%; }
        .raw-data { max-height: 400px; overflow-y: auto; }
    </style>
</head>
<body>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

// ============================================================================
// Form Values
// ============================================================================

/// What the form shows: the submitted values, or the defaults.
struct FormValues {
    site: String,
    start: String,
    end: String,
    level: QualityLevel,
    averaging: AveragingType,
    wavelengths: Vec<u16>,
    refresh: bool,
}

impl FormValues {
    fn new(params: &ExplorerParams, config: &ExplorerConfig) -> Self {
        let (start, end) = default_range(config);
        let wavelengths = if params.wavelengths.is_empty() && !params.is_submitted() {
            DEFAULT_WAVELENGTHS.to_vec()
        } else {
            params.wavelengths.iter().filter_map(|w| w.parse().ok()).collect()
        };

        Self {
            site: params.site.clone().unwrap_or_else(|| config.ui.default_site.clone()),
            start: params.start.clone().unwrap_or_else(|| start.to_string()),
            end: params.end.clone().unwrap_or_else(|| end.to_string()),
            level: params.level.as_deref().and_then(|s| s.parse().ok()).unwrap_or_default(),
            averaging: params.averaging.as_deref().and_then(|s| s.parse().ok()).unwrap_or_default(),
            wavelengths,
            refresh: params.refresh,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / - The explorer page
///
/// Failures are rendered inline; the response status follows the error.
#[instrument(skip(state, pairs))]
pub async fn index_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> (StatusCode, Html<String>) {
    let params = ExplorerParams::from_pairs(pairs);
    let form = FormValues::new(&params, &state.config);
    let mut status = StatusCode::OK;

    let catalog = match state.service.sites(CacheMode::Use).await {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            let err = ApiError(e);
            status = err.status();
            tracing::warn!(error = %err.0, "Site list unavailable");
            None
        }
    };

    let mut page = String::from(PAGE_HEAD);
    page.push_str("<aside>\n<h2>Query Parameters</h2>\n");
    page.push_str(&render_form(catalog.as_deref(), &form));
    page.push_str("</aside>\n<main>\n<h1>AERONET AOD Explorer</h1>\n");

    match &catalog {
        Some(catalog) => page.push_str(&render_site_info(catalog.get(&form.site), &form.site)),
        None => page.push_str(&render_error(&AeronetError::Retrieval(
            "the AERONET site list could not be loaded".to_string(),
        ))),
    }

    if params.is_submitted() {
        match load_dataset(&state, &params).await {
            Ok(dataset) => page.push_str(&render_results(&dataset)),
            Err(err) => {
                status = err.status();
                page.push_str(&render_error(&err.0));
            }
        }
    } else {
        page.push_str("<p class=\"note\">Choose a site, dates and wavelengths, then press <em>Fetch Data</em>.</p>\n");
    }

    page.push_str("</main>\n");
    page.push_str(PAGE_TAIL);
    (status, Html(page))
}

async fn load_dataset(state: &AppState, params: &ExplorerParams) -> Result<AodDataset, ApiError> {
    let query = params.to_query(&state.config)?;
    Ok(state.service.load(&query, params.cache_mode()).await?)
}

// ============================================================================
// Page Sections
// ============================================================================

fn render_form(catalog: Option<&SiteCatalog>, form: &FormValues) -> String {
    let mut html = String::from("<form method=\"get\" action=\"/\">\n");

    html.push_str("<label for=\"site\">Site</label>\n");
    match catalog {
        Some(catalog) => {
            html.push_str("<select id=\"site\" name=\"site\">\n");
            for site in catalog.iter() {
                let _ = writeln!(
                    html,
                    "<option value=\"{0}\"{1}>{0}</option>",
                    escape(&site.name),
                    selected(site.name == form.site)
                );
            }
            html.push_str("</select>\n");
        }
        None => {
            let _ = writeln!(
                html,
                "<input type=\"text\" id=\"site\" name=\"site\" value=\"{}\">",
                escape(&form.site)
            );
        }
    }

    let _ = writeln!(
        html,
        "<label for=\"start\">Start Date</label>\n<input type=\"date\" id=\"start\" name=\"start\" value=\"{}\">",
        escape(&form.start)
    );
    let _ = writeln!(
        html,
        "<label for=\"end\">End Date</label>\n<input type=\"date\" id=\"end\" name=\"end\" value=\"{}\">",
        escape(&form.end)
    );

    html.push_str("<label for=\"level\">Data Quality Level</label>\n<select id=\"level\" name=\"level\">\n");
    for level in QualityLevel::ALL {
        let _ = writeln!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            level.as_str(),
            selected(level == form.level),
            level.label()
        );
    }
    html.push_str("</select>\n");

    html.push_str("<label for=\"averaging\">Averaging</label>\n<select id=\"averaging\" name=\"averaging\">\n");
    for averaging in AveragingType::ALL {
        let _ = writeln!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            averaging.as_str(),
            selected(averaging == form.averaging),
            averaging.label()
        );
    }
    html.push_str("</select>\n");

    html.push_str("<fieldset>\n<legend>Wavelengths</legend>\n");
    for nm in AOD_WAVELENGTHS {
        let _ = writeln!(
            html,
            "<label><input type=\"checkbox\" name=\"wavelength\" value=\"{0}\"{1}> {0} nm</label>",
            nm,
            checked(form.wavelengths.contains(&nm))
        );
    }
    html.push_str("</fieldset>\n");

    let _ = writeln!(
        html,
        "<label><input type=\"checkbox\" name=\"refresh\" value=\"1\"{}> Refresh (bypass cache)</label>",
        checked(form.refresh)
    );
    html.push_str("<button type=\"submit\">Fetch Data</button>\n</form>\n");
    html
}

fn render_site_info(site: Option<&Site>, name: &str) -> String {
    let mut html = String::from("<section>\n<h2>Site Information</h2>\n");
    match site {
        Some(site) => {
            let _ = writeln!(
                html,
                "<table>\n<tr><th>Site</th><td>{}</td></tr>\n<tr><th>Latitude</th><td>{:.4}&deg;</td></tr>\n\
                 <tr><th>Longitude</th><td>{:.4}&deg;</td></tr>\n<tr><th>Elevation</th><td>{:.0} m</td></tr>\n</table>",
                escape(&site.name),
                site.latitude,
                site.longitude,
                site.elevation
            );
        }
        None => {
            let _ = writeln!(html, "<p class=\"note\">Unknown site: {}</p>", escape(name));
        }
    }
    let _ = writeln!(
        html,
        "<img src=\"/map.png?site={}\" alt=\"AERONET site map\">\n</section>",
        urlencoding::encode(name)
    );
    html
}

fn render_results(dataset: &AodDataset) -> String {
    let query = &dataset.query;
    let mut html = String::from("<section>\n<h2>Summary</h2>\n");

    let _ = writeln!(
        html,
        "<table>\n<tr><th>Site</th><td>{}</td></tr>\n<tr><th>Period</th><td>{} to {}</td></tr>\n\
         <tr><th>Quality Level</th><td>{}</td></tr>\n<tr><th>Averaging</th><td>{}</td></tr>\n\
         <tr><th>Measurements</th><td>{}</td></tr>\n<tr><th>Timestamps</th><td>{}</td></tr>\n\
         <tr><th>Source</th><td>{}</td></tr>\n</table>\n</section>",
        escape(&query.site),
        query.start,
        query.end,
        query.level.label(),
        query.averaging.label(),
        dataset.rows.len(),
        dataset.timestamps().len(),
        if dataset.from_cache { "local cache" } else { "AERONET web service" },
    );

    if dataset.is_empty() {
        html.push_str("<p class=\"note\">No data available for the selected parameters.</p>\n");
        return html;
    }

    let link = link_query(query);

    let _ = writeln!(
        html,
        "<section>\n<h2>Time Series</h2>\n<img src=\"/plot/timeseries.svg?{}\" alt=\"AOD time series\">\n</section>",
        escape(&link)
    );

    html.push_str("<section>\n<h2>Statistics</h2>\n<table>\n");
    html.push_str(
        "<tr><th>Wavelength</th><th>Count</th><th>Mean</th><th>Median</th><th>Std</th>\
         <th>Min</th><th>Max</th><th>Q25</th><th>Q75</th></tr>\n",
    );
    for s in dataset.statistics() {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{:.4}</td><td>{:.4}</td><td>{:.4}</td><td>{:.4}</td>\
             <td>{:.4}</td><td>{:.4}</td><td>{:.4}</td></tr>",
            s.wavelength, s.count, s.mean, s.median, s.std, s.min, s.max, s.q25, s.q75
        );
    }
    html.push_str("</table>\n");
    let _ = writeln!(
        html,
        "<img src=\"/plot/statistics.svg?{}\" alt=\"AOD distribution by wavelength\">\n</section>",
        escape(&link)
    );

    html.push_str("<section>\n<h2>Data Completeness</h2>\n<table>\n");
    html.push_str("<tr><th>Wavelength</th><th>Valid</th><th>Total</th><th>Completeness</th></tr>\n");
    for c in dataset.completeness() {
        let _ = writeln!(
            html,
            "<tr><td><span class=\"swatch\" style=\"background:{}\"></span>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td></tr>",
            renderer::wavelength_hex(c.wavelength),
            c.wavelength,
            c.valid,
            c.total,
            c.percent
        );
    }
    html.push_str("</table>\n</section>\n");

    if let Some(coverage) = dataset.coverage() {
        let _ = writeln!(
            html,
            "<section>\n<h2>Temporal Coverage</h2>\n<table>\n<tr><th>First</th><td>{}</td></tr>\n\
             <tr><th>Last</th><td>{}</td></tr>\n<tr><th>Span</th><td>{} days</td></tr>\n</table>\n</section>",
            coverage.first.format("%Y-%m-%d %H:%M:%S"),
            coverage.last.format("%Y-%m-%d %H:%M:%S"),
            coverage.span_days
        );
    }

    html.push_str(&render_raw_data(dataset));

    let _ = writeln!(
        html,
        "<section>\n<h2>Export</h2>\n<a href=\"/export.csv?{}\" download=\"{}\">Download CSV</a>\n</section>",
        escape(&link),
        escape(&renderer::export_filename(query))
    );

    html
}

/// Same lines as the CSV export, collapsed by default.
fn render_raw_data(dataset: &AodDataset) -> String {
    let wavelengths = &dataset.query.wavelengths;
    let table = renderer::wide_table(&dataset.rows, wavelengths);

    let mut html = String::from("<section>\n<details>\n");
    let _ = writeln!(html, "<summary>View Raw Data ({} rows)</summary>", table.len());
    html.push_str("<div class=\"raw-data\">\n<table id=\"raw-data\">\n<tr><th>");
    html.push_str(renderer::export::DATETIME_COLUMN);
    html.push_str("</th>");
    for wl in wavelengths {
        let _ = write!(html, "<th>{}</th>", wl.column_name());
    }
    html.push_str("</tr>\n");

    for row in &table {
        let _ = write!(html, "<tr><td>{}</td>", row.formatted_timestamp());
        for value in &row.values {
            match value {
                Some(v) => {
                    let _ = write!(html, "<td>{:.4}</td>", v);
                }
                None => html.push_str("<td></td>"),
            }
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n</div>\n</details>\n</section>\n");
    html
}

fn render_error(err: &AeronetError) -> String {
    let hint = if err.is_retryable() {
        "<br><span class=\"note\">The AERONET service may be temporarily unavailable.</span>"
    } else {
        ""
    };
    format!(
        "<div class=\"error\"><strong>Error ({}):</strong> {}{}</div>\n",
        err.kind().as_str(),
        escape(&err.user_message()),
        hint
    )
}

fn selected(yes: bool) -> &'static str {
    if yes {
        " selected"
    } else {
        ""
    }
}

fn checked(yes: bool) -> &'static str {
    if yes {
        " checked"
    } else {
        ""
    }
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape("GSFC"), "GSFC");
    }

    #[test]
    fn test_form_marks_selection() {
        let catalog = SiteCatalog::new(vec![
            Site::new("GSFC", 38.99, -76.84, 87.0),
            Site::new("Mauna_Loa", 19.54, -155.58, 3397.0),
        ]);
        let params = ExplorerParams::from_pairs(vec![
            ("site".to_string(), "Mauna_Loa".to_string()),
            ("wavelength".to_string(), "870".to_string()),
            ("level".to_string(), "2.0".to_string()),
        ]);
        let form = FormValues::new(&params, &ExplorerConfig::default());
        let html = render_form(Some(&catalog), &form);

        assert!(html.contains("<option value=\"Mauna_Loa\" selected>"));
        assert!(html.contains("<option value=\"GSFC\">"));
        assert!(html.contains("value=\"870\" checked"));
        assert!(html.contains("value=\"440\">"));
        assert!(html.contains("<option value=\"2.0\" selected>"));
    }

    #[test]
    fn test_first_visit_checks_default_wavelengths() {
        let form = FormValues::new(&ExplorerParams::default(), &ExplorerConfig::default());
        assert_eq!(form.wavelengths, DEFAULT_WAVELENGTHS.to_vec());
        assert_eq!(form.site, "GSFC");
    }

    #[test]
    fn test_error_box_escapes_message() {
        let html = render_error(&AeronetError::UnknownSite("<script>".to_string()));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("validation"));
    }
}
