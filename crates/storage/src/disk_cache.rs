//! Filesystem cache for downloaded AERONET responses.
//!
//! Entries live as `<dir>/<fingerprint>.txt`. There is no expiry: an entry
//! stays valid until it is deleted or a caller bypasses the cache.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use aeronet_common::{AeronetError, AeronetResult};

use crate::cache::CacheKey;

const ENTRY_EXTENSION: &str = "txt";
const PARTIAL_EXTENSION: &str = "partial";

/// A stored response on disk.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    pub key: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub entries: u64,
    pub total_bytes: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// On-disk response cache.
pub struct DiskCache {
    dir: PathBuf,
    /// Session counters (not persisted)
    stats: Arc<Mutex<CacheStats>>,
}

impl DiskCache {
    /// Open a cache rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> AeronetResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| AeronetError::CacheError(format!("Failed to create {}: {}", dir.display(), e)))?;

        info!(dir = %dir.display(), "Opened response cache");

        Ok(Self {
            dir,
            stats: Arc::new(Mutex::new(CacheStats::default())),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Read a stored response. Counts a hit or a miss.
    pub async fn get(&self, key: &CacheKey) -> AeronetResult<Option<String>> {
        let path = self.path_for(key);

        match fs::read_to_string(&path).await {
            Ok(data) => {
                self.stats.lock().await.hits += 1;
                debug!(key = %key, bytes = data.len(), "Cache hit");
                Ok(Some(data))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.stats.lock().await.misses += 1;
                debug!(key = %key, "Cache miss");
                Ok(None)
            }
            Err(e) => Err(AeronetError::CacheError(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Store a response, replacing any existing entry.
    ///
    /// Data is written to a `.partial` file first and renamed into place, so
    /// a reader never sees a half written entry.
    pub async fn put(&self, key: &CacheKey, data: &str) -> AeronetResult<PathBuf> {
        let final_path = self.path_for(key);
        let temp_path = final_path.with_extension(PARTIAL_EXTENSION);

        fs::write(&temp_path, data)
            .await
            .map_err(|e| AeronetError::CacheError(format!("Failed to write {}: {}", temp_path.display(), e)))?;

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            fs::remove_file(&temp_path).await.ok();
            return Err(AeronetError::CacheError(format!(
                "Failed to move {} into place: {}",
                final_path.display(),
                e
            )));
        }

        self.stats.lock().await.writes += 1;
        debug!(key = %key, bytes = data.len(), path = %final_path.display(), "Stored response");

        Ok(final_path)
    }

    pub async fn contains(&self, key: &CacheKey) -> bool {
        fs::metadata(self.path_for(key)).await.is_ok()
    }

    /// Delete one entry. Returns whether it existed.
    pub async fn remove(&self, key: &CacheKey) -> AeronetResult<bool> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AeronetError::CacheError(format!("Failed to remove {}: {}", key, e))),
        }
    }

    /// Delete every entry (and stray partial files). Returns the number of
    /// entries removed.
    pub async fn clear(&self) -> AeronetResult<u64> {
        let mut removed = 0;
        for path in self.files()? {
            let is_entry = path.extension().and_then(|e| e.to_str()) == Some(ENTRY_EXTENSION);
            match fs::remove_file(&path).await {
                Ok(()) if is_entry => removed += 1,
                Ok(()) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove cache file"),
            }
        }

        *self.stats.lock().await = CacheStats::default();
        info!(removed = removed, "Cleared response cache");

        Ok(removed)
    }

    /// List stored entries, sorted by key.
    pub fn entries(&self) -> AeronetResult<Vec<CacheEntry>> {
        let mut entries = Vec::new();

        for path in self.files()? {
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            let metadata = std::fs::metadata(&path)?;
            entries.push(CacheEntry {
                key,
                size_bytes: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
                path,
            });
        }

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    /// Session counters combined with the current on-disk footprint.
    pub async fn stats(&self) -> AeronetResult<CacheStats> {
        let entries = self.entries()?;
        let mut stats = self.stats.lock().await.clone();
        stats.entries = entries.len() as u64;
        stats.total_bytes = entries.iter().map(|e| e.size_bytes).sum();
        Ok(stats)
    }

    fn files(&self) -> AeronetResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| AeronetError::CacheError(format!("Failed to list cache: {}", e)))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}
