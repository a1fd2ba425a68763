//! Storage abstractions for the AOD explorer.
//!
//! Provides a filesystem cache of raw AERONET responses keyed by a
//! deterministic query fingerprint.

pub mod cache;
pub mod disk_cache;

pub use cache::{CacheKey, SITES_CACHE_KEY};
pub use disk_cache::{CacheEntry, CacheStats, DiskCache};
