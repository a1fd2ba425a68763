//! AERONET monitoring sites.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Site selected when the user has not chosen one and it is available.
pub const DEFAULT_SITE: &str = "GSFC";

/// A monitoring site from the AERONET locations list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above sea level
    pub elevation: f64,
}

impl Site {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            elevation,
        }
    }
}

/// Read-only list of known sites, sorted by name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteCatalog {
    sites: Vec<Site>,
}

impl SiteCatalog {
    /// Build a catalog. Duplicate names keep their first occurrence.
    pub fn new(sites: Vec<Site>) -> Self {
        let mut seen = HashSet::new();
        let mut sites: Vec<Site> = sites
            .into_iter()
            .filter(|s| seen.insert(s.name.clone()))
            .collect();
        sites.sort_by(|a, b| a.name.cmp(&b.name));
        Self { sites }
    }

    pub fn get(&self, name: &str) -> Option<&Site> {
        self.sites
            .binary_search_by(|s| s.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.sites[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Site> {
        self.sites.iter()
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn names(&self) -> Vec<&str> {
        self.sites.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// GSFC when present, otherwise the first site alphabetically.
    pub fn default_site(&self) -> Option<&Site> {
        self.get(DEFAULT_SITE).or_else(|| self.sites.first())
    }
}
