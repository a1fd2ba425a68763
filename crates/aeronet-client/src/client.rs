//! HTTP client for the AERONET web service.

use std::time::Duration;

use reqwest::{header, Client, Url};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

use aeronet_common::{AeronetError, AeronetResult, Query};

pub const DEFAULT_BASE_URL: &str = "https://aeronet.gsfc.nasa.gov/cgi-bin/print_web_data_v3";
pub const DEFAULT_SITES_URL: &str = "https://aeronet.gsfc.nasa.gov/aeronet_locations_v3.txt";

/// Configuration for the AERONET client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Data download endpoint
    pub base_url: String,
    /// Site locations file
    pub sites_url: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Minimum gap between consecutive requests
    pub request_delay: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            sites_url: DEFAULT_SITES_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            request_delay: Duration::from_secs(1),
            user_agent: format!("AOD-Explorer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Client for the AERONET data and site-list endpoints.
pub struct AeronetClient {
    client: Client,
    config: ClientConfig,
    last_request: Mutex<Option<Instant>>,
}

impl AeronetClient {
    pub fn new(config: ClientConfig) -> AeronetResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AeronetError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            last_request: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Query parameters understood by `print_web_data_v3`.
    pub fn request_params(query: &Query) -> Vec<(String, String)> {
        use chrono::Datelike;

        vec![
            ("site".to_string(), query.site.clone()),
            ("year".to_string(), query.start.year().to_string()),
            ("month".to_string(), query.start.month().to_string()),
            ("day".to_string(), query.start.day().to_string()),
            ("year2".to_string(), query.end.year().to_string()),
            ("month2".to_string(), query.end.month().to_string()),
            ("day2".to_string(), query.end.day().to_string()),
            (query.level.request_param(), "1".to_string()),
            ("AVG".to_string(), query.averaging.code().to_string()),
            ("if_no_html".to_string(), "1".to_string()),
        ]
    }

    /// Full request URL for a query.
    pub fn request_url(&self, query: &Query) -> AeronetResult<Url> {
        Url::parse_with_params(&self.config.base_url, Self::request_params(query))
            .map_err(|e| AeronetError::InternalError(format!("Invalid base URL '{}': {}", self.config.base_url, e)))
    }

    /// Download the raw AOD response for a query.
    #[instrument(skip(self, query), fields(site = %query.site, start = %query.start, end = %query.end, level = %query.level))]
    pub async fn fetch_aod_text(&self, query: &Query) -> AeronetResult<String> {
        let url = self.request_url(query)?;
        info!("Requesting AOD data");
        self.get_text(url).await
    }

    /// Download the raw site locations file.
    #[instrument(skip(self))]
    pub async fn fetch_sites_text(&self) -> AeronetResult<String> {
        let url = Url::parse(&self.config.sites_url)
            .map_err(|e| AeronetError::InternalError(format!("Invalid sites URL '{}': {}", self.config.sites_url, e)))?;
        info!(url = %url, "Requesting site list");
        self.get_text(url).await
    }

    async fn get_text(&self, url: Url) -> AeronetResult<String> {
        self.respect_rate_limit().await;

        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "text/plain, text/csv, */*")
            .send()
            .await
            .map_err(|e| AeronetError::Retrieval(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AeronetError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AeronetError::Retrieval(format!("Error reading response body: {}", e)))?;

        debug!(
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Response received"
        );

        Ok(body)
    }

    /// Keep consecutive requests at least `request_delay` apart.
    async fn respect_rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.config.request_delay {
                let wait = self.config.request_delay - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "Rate limiting request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}
