//! Application state for the explorer web service.

use std::sync::Arc;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;

use aeronet_client::{AeronetClient, AodService, AodSource};
use storage::DiskCache;

use crate::config::ExplorerConfig;

/// Shared application state.
pub struct AppState {
    /// Cached data access; the only path to the AERONET service.
    pub service: AodService<Arc<dyn AodSource>>,

    pub config: ExplorerConfig,

    /// Renders `/metrics`; absent when no recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state backed by the live AERONET web service.
    pub async fn new(config: ExplorerConfig, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let client = AeronetClient::new(config.client_config())?;
        Self::with_source(config, Arc::new(client), prometheus).await
    }

    /// Build state around any response source.
    pub async fn with_source(
        config: ExplorerConfig,
        source: Arc<dyn AodSource>,
        prometheus: Option<PrometheusHandle>,
    ) -> Result<Self> {
        let cache = DiskCache::open(&config.cache_dir).await?;

        Ok(Self {
            service: AodService::new(source, cache),
            config,
            prometheus,
        })
    }
}
