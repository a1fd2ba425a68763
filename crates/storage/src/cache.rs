//! Cache keys for stored AERONET responses.

use serde::{Deserialize, Serialize};

use aeronet_common::Query;

/// Fixed key under which the site list is stored.
pub const SITES_CACHE_KEY: &str = "aeronet_locations_v3";

/// Deterministic, filesystem-safe fingerprint of a download.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from an arbitrary name. Bytes outside `[A-Za-z0-9_]` are
    /// written as `-XX` (uppercase hex), so distinct names give distinct keys.
    pub fn new(raw: &str) -> Self {
        Self(encode(raw))
    }

    /// Fingerprint of everything that changes the service response.
    ///
    /// Wavelengths are not part of the key: a response always carries every
    /// wavelength, and selection happens after parsing.
    pub fn for_query(query: &Query) -> Self {
        Self(format!(
            "aod_{}_{}_{}_lev{}_avg{}",
            encode(&query.site),
            query.start.format("%Y%m%d"),
            query.end.format("%Y%m%d"),
            query.level.code(),
            query.averaging.code(),
        ))
    }

    pub fn sites() -> Self {
        Self(SITES_CACHE_KEY.to_string())
    }

    /// File name of the entry inside the cache directory.
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Filesystem-safe and one-to-one: `-` only ever starts an escape.
fn encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        if b.is_ascii_alphanumeric() || b == b'_' {
            out.push(b as char);
        } else {
            out.push_str(&format!("-{:02X}", b));
        }
    }
    out
}
