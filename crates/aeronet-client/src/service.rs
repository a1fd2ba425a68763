//! Cached loading pipeline: validate, look up the cache, fetch, parse, store.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use metrics::counter;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use aeronet_common::{AeronetError, AeronetResult, Measurement, Query, SiteCatalog};
use storage::{CacheKey, DiskCache};

use crate::client::AeronetClient;
use crate::parse::{parse_aod_response, parse_sites};
use crate::processing::{
    completeness_against, distinct_timestamps, filter_wavelengths, Completeness, Statistics, TemporalCoverage,
};
use crate::source::AodSource;

/// Whether a load may be answered from the on-disk cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Serve stored responses; fetch and store on a miss
    #[default]
    Use,
    /// Always fetch and overwrite the stored response
    Bypass,
}

impl CacheMode {
    pub fn from_refresh(refresh: bool) -> Self {
        if refresh {
            CacheMode::Bypass
        } else {
            CacheMode::Use
        }
    }
}

/// Rows loaded for one query.
#[derive(Debug, Clone, Serialize)]
pub struct AodDataset {
    pub query: Query,
    /// Rows at the query's wavelengths, sorted by timestamp then wavelength
    pub rows: Vec<Measurement>,
    /// Distinct timestamps in the full response, before wavelength selection
    pub response_timestamps: usize,
    pub from_cache: bool,
}

impl AodDataset {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        distinct_timestamps(&self.rows)
    }

    pub fn statistics(&self) -> Vec<Statistics> {
        Statistics::compute_all(&self.rows, &self.query.wavelengths)
    }

    pub fn completeness(&self) -> Vec<Completeness> {
        completeness_against(&self.rows, &self.query.wavelengths, self.response_timestamps)
    }

    pub fn coverage(&self) -> Option<TemporalCoverage> {
        TemporalCoverage::from_rows(&self.rows)
    }
}

/// Loads site lists and AOD data through the disk cache.
pub struct AodService<S = AeronetClient> {
    source: S,
    cache: DiskCache,
    /// Serializes network fetches and the cache writes that follow them
    fetch_lock: Mutex<()>,
    sites: RwLock<Option<Arc<SiteCatalog>>>,
}

impl<S: AodSource> AodService<S> {
    pub fn new(source: S, cache: DiskCache) -> Self {
        Self {
            source,
            cache,
            fetch_lock: Mutex::new(()),
            sites: RwLock::new(None),
        }
    }

    pub fn cache(&self) -> &DiskCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The AERONET site catalog.
    ///
    /// Served from memory, then from the disk cache, then from the source.
    /// `CacheMode::Bypass` skips both caches and refreshes them.
    pub async fn sites(&self, mode: CacheMode) -> AeronetResult<Arc<SiteCatalog>> {
        if mode == CacheMode::Use {
            if let Some(sites) = self.sites.read().await.as_ref() {
                return Ok(sites.clone());
            }
        }

        let _guard = self.fetch_lock.lock().await;
        let key = CacheKey::sites();

        if mode == CacheMode::Use {
            // Another task may have loaded the list while we waited.
            if let Some(sites) = self.sites.read().await.as_ref() {
                return Ok(sites.clone());
            }
            if let Some(text) = self.cache.get(&key).await? {
                match parse_sites(&text) {
                    Ok(catalog) => {
                        counter!("aeronet_cache_hits_total", "kind" => "sites").increment(1);
                        return Ok(self.remember_sites(catalog).await);
                    }
                    Err(e) => {
                        warn!(error = %e, "Discarding unreadable cached site list");
                        self.cache.remove(&key).await?;
                    }
                }
            }
            counter!("aeronet_cache_misses_total", "kind" => "sites").increment(1);
        }

        counter!("aeronet_fetch_total", "kind" => "sites").increment(1);
        let text = self.source.fetch_sites().await.map_err(record_error)?;
        let catalog = parse_sites(&text).map_err(record_error)?;
        self.cache.put(&key, &text).await?;

        info!(sites = catalog.len(), "Loaded AERONET site list");
        Ok(self.remember_sites(catalog).await)
    }

    async fn remember_sites(&self, catalog: SiteCatalog) -> Arc<SiteCatalog> {
        let catalog = Arc::new(catalog);
        *self.sites.write().await = Some(catalog.clone());
        catalog
    }

    /// Load the measurements for a query, validating it first.
    pub async fn load(&self, query: &Query, mode: CacheMode) -> AeronetResult<AodDataset> {
        self.load_as_of(query, mode, Utc::now().date_naive()).await
    }

    /// [`load`](Self::load) with an explicit "today" for the end date check.
    #[instrument(skip(self, query), fields(site = %query.site, start = %query.start, end = %query.end, level = %query.level))]
    pub async fn load_as_of(&self, query: &Query, mode: CacheMode, today: NaiveDate) -> AeronetResult<AodDataset> {
        query.validate_parameters(today)?;
        let sites = self.sites(CacheMode::Use).await?;
        query.validate(&sites, today)?;

        let _guard = self.fetch_lock.lock().await;
        let key = CacheKey::for_query(query);

        if mode == CacheMode::Use {
            if let Some(text) = self.cache.get(&key).await? {
                match parse_aod_response(&text, query.level) {
                    Ok(rows) => {
                        counter!("aeronet_cache_hits_total", "kind" => "aod").increment(1);
                        debug!(key = %key, "Serving AOD data from cache");
                        return Ok(dataset(query, rows, true));
                    }
                    Err(e) => {
                        warn!(key = %key, error = %e, "Discarding unreadable cache entry");
                        self.cache.remove(&key).await?;
                    }
                }
            }
            counter!("aeronet_cache_misses_total", "kind" => "aod").increment(1);
        }

        counter!("aeronet_fetch_total", "kind" => "aod").increment(1);
        let text = self.source.fetch_aod(query).await.map_err(record_error)?;
        // Parse before storing so a malformed response never reaches the cache.
        let rows = parse_aod_response(&text, query.level).map_err(record_error)?;
        self.cache.put(&key, &text).await?;

        info!(key = %key, rows = rows.len(), "Fetched AOD data");
        Ok(dataset(query, rows, false))
    }
}

fn dataset(query: &Query, rows: Vec<Measurement>, from_cache: bool) -> AodDataset {
    AodDataset {
        rows: filter_wavelengths(&rows, &query.wavelengths),
        response_timestamps: distinct_timestamps(&rows).len(),
        query: query.clone(),
        from_cache,
    }
}

fn record_error(e: AeronetError) -> AeronetError {
    counter!("aeronet_errors_total", "kind" => e.kind().as_str()).increment(1);
    e
}
