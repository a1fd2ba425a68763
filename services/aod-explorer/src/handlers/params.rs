//! Query string parameters shared by the page, API, plot and export routes.
//!
//! Parameters are read as raw key/value pairs so the HTML form's repeated
//! `wavelength` checkboxes and a comma separated `wavelengths` list are both
//! accepted.

use chrono::{Duration, NaiveDate, Utc};

use aeronet_client::CacheMode;
use aeronet_common::{
    parse_date, AeronetError, AeronetResult, AveragingType, QualityLevel, Query, Wavelength,
};

use crate::config::ExplorerConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplorerParams {
    pub site: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub level: Option<String>,
    pub averaging: Option<String>,
    pub wavelengths: Vec<String>,
    pub refresh: bool,
}

impl ExplorerParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let value = value.trim().to_string();
            match key.as_str() {
                "site" => params.site = non_empty(value),
                "start" => params.start = non_empty(value),
                "end" => params.end = non_empty(value),
                "level" => params.level = non_empty(value),
                "averaging" | "avg" => params.averaging = non_empty(value),
                "wavelength" => params.wavelengths.push(value),
                "wavelengths" => params
                    .wavelengths
                    .extend(value.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty())),
                "refresh" => params.refresh = matches!(value.as_str(), "1" | "true" | "on" | "yes"),
                _ => {}
            }
        }
        params
    }

    /// Whether the form was submitted, as opposed to a first visit.
    pub fn is_submitted(&self) -> bool {
        self.site.is_some() || self.start.is_some() || self.end.is_some()
    }

    pub fn cache_mode(&self) -> CacheMode {
        CacheMode::from_refresh(self.refresh)
    }

    /// Build a query, filling unset fields from the configured defaults.
    ///
    /// Only syntax is checked here; range and site checks happen when the
    /// query is loaded.
    pub fn to_query(&self, config: &ExplorerConfig) -> AeronetResult<Query> {
        let (default_start, default_end) = default_range(config);

        let site = self.site.clone().unwrap_or_else(|| config.ui.default_site.clone());
        let start = self.start.as_deref().map(parse_date).transpose()?.unwrap_or(default_start);
        let end = self.end.as_deref().map(parse_date).transpose()?.unwrap_or(default_end);

        let level = match &self.level {
            Some(s) => s.parse::<QualityLevel>()?,
            None => QualityLevel::default(),
        };
        let averaging = match &self.averaging {
            Some(s) => s.parse::<AveragingType>()?,
            None => AveragingType::default(),
        };

        let wavelengths = if self.wavelengths.is_empty() {
            if self.is_submitted() {
                return Err(AeronetError::invalid("wavelength", "select at least one wavelength"));
            }
            Wavelength::defaults()
        } else {
            Wavelength::parse_list(&self.wavelengths.join(","))?
        };

        Ok(Query::new(site, start, end)
            .with_level(level)
            .with_averaging(averaging)
            .with_wavelengths(wavelengths))
    }
}

/// The preselected date range: the last `default_span_days` days up to today.
pub fn default_range(config: &ExplorerConfig) -> (NaiveDate, NaiveDate) {
    let today = Utc::now().date_naive();
    (today - Duration::days(config.ui.default_span_days), today)
}

/// Query string for links to the plot and export routes.
pub fn link_query(query: &Query) -> String {
    let wavelengths: Vec<String> = query.wavelengths.iter().map(|w| w.nm().to_string()).collect();
    format!(
        "site={}&start={}&end={}&level={}&averaging={}&wavelengths={}",
        urlencoding::encode(&query.site),
        query.start,
        query.end,
        query.level.as_str(),
        query.averaging.as_str(),
        wavelengths.join("%2C"),
    )
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
