//! Query parameters for AERONET AOD downloads.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AeronetError, AeronetResult};
use crate::site::SiteCatalog;
use crate::time::aeronet_epoch;

/// AOD wavelengths (nanometers) offered for selection.
pub const AOD_WAVELENGTHS: [u16; 7] = [340, 380, 440, 500, 675, 870, 1020];

/// Wavelengths selected when the user has not chosen any.
pub const DEFAULT_WAVELENGTHS: [u16; 3] = [440, 500, 675];

/// AERONET data processing tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QualityLevel {
    /// Level 1.0: raw, unscreened
    Level10,
    /// Level 1.5: cloud-screened and quality-controlled
    #[default]
    Level15,
    /// Level 2.0: quality-assured
    Level20,
}

impl QualityLevel {
    pub const ALL: [QualityLevel; 3] = [QualityLevel::Level10, QualityLevel::Level15, QualityLevel::Level20];

    /// Two digit code used by the web service (`AOD15=1`) and in cache keys.
    pub fn code(&self) -> &'static str {
        match self {
            QualityLevel::Level10 => "10",
            QualityLevel::Level15 => "15",
            QualityLevel::Level20 => "20",
        }
    }

    /// Decimal form shown to users.
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Level10 => "1.0",
            QualityLevel::Level15 => "1.5",
            QualityLevel::Level20 => "2.0",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityLevel::Level10 => "Level 1.0 (Unscreened)",
            QualityLevel::Level15 => "Level 1.5 (Cloud-screened)",
            QualityLevel::Level20 => "Level 2.0 (Quality-assured)",
        }
    }

    /// Name of the query parameter that selects this level.
    pub fn request_param(&self) -> String {
        format!("AOD{}", self.code())
    }
}

impl FromStr for QualityLevel {
    type Err = AeronetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1.0" | "1" | "10" | "lev10" => Ok(QualityLevel::Level10),
            "1.5" | "15" | "lev15" => Ok(QualityLevel::Level15),
            "2.0" | "2" | "20" | "lev20" => Ok(QualityLevel::Level20),
            other => Err(AeronetError::invalid(
                "level",
                format!("'{}' is not a data quality level (expected 1.0, 1.5 or 2.0)", other),
            )),
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for QualityLevel {
    type Error = AeronetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualityLevel> for String {
    fn from(level: QualityLevel) -> Self {
        level.as_str().to_string()
    }
}

/// Temporal averaging applied by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AveragingType {
    #[default]
    AllPoints,
    DailyAverage,
}

impl AveragingType {
    pub const ALL: [AveragingType; 2] = [AveragingType::AllPoints, AveragingType::DailyAverage];

    /// Value of the `AVG` request parameter.
    pub fn code(&self) -> &'static str {
        match self {
            AveragingType::AllPoints => "10",
            AveragingType::DailyAverage => "20",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AveragingType::AllPoints => "all",
            AveragingType::DailyAverage => "daily",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AveragingType::AllPoints => "All Points",
            AveragingType::DailyAverage => "Daily Averages",
        }
    }
}

impl FromStr for AveragingType {
    type Err = AeronetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "10" | "all_points" => Ok(AveragingType::AllPoints),
            "daily" | "20" | "daily_average" => Ok(AveragingType::DailyAverage),
            other => Err(AeronetError::invalid(
                "avg",
                format!("'{}' is not an averaging type (expected all or daily)", other),
            )),
        }
    }
}

impl fmt::Display for AveragingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AveragingType {
    type Error = AeronetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AveragingType> for String {
    fn from(avg: AveragingType) -> Self {
        avg.as_str().to_string()
    }
}

/// A recognised AOD wavelength in nanometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Wavelength(u16);

impl Wavelength {
    pub fn new(nm: u16) -> AeronetResult<Self> {
        if AOD_WAVELENGTHS.contains(&nm) {
            Ok(Self(nm))
        } else {
            Err(AeronetError::invalid(
                "wavelength",
                format!("{} nm is not one of {:?}", nm, AOD_WAVELENGTHS),
            ))
        }
    }

    pub fn nm(&self) -> u16 {
        self.0
    }

    /// All selectable wavelengths, shortest first.
    pub fn all() -> Vec<Wavelength> {
        AOD_WAVELENGTHS.iter().map(|&nm| Wavelength(nm)).collect()
    }

    pub fn defaults() -> Vec<Wavelength> {
        DEFAULT_WAVELENGTHS.iter().map(|&nm| Wavelength(nm)).collect()
    }

    /// Column header used in AERONET responses and CSV exports (`AOD_440nm`).
    pub fn column_name(&self) -> String {
        format!("AOD_{}nm", self.0)
    }

    /// Match a response column header against the recognised wavelengths.
    pub fn from_column(name: &str) -> Option<Wavelength> {
        let nm = name.trim().strip_prefix("AOD_")?.strip_suffix("nm")?;
        nm.parse::<u16>().ok().and_then(|nm| Wavelength::new(nm).ok())
    }

    /// Parse a comma separated list such as `440,500,675`.
    pub fn parse_list(s: &str) -> AeronetResult<Vec<Wavelength>> {
        let mut out = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let part = part.trim_end_matches("nm");
            let nm: u16 = part
                .parse()
                .map_err(|_| AeronetError::invalid("wavelength", format!("'{}' is not a number", part)))?;
            let wl = Wavelength::new(nm)?;
            if !out.contains(&wl) {
                out.push(wl);
            }
        }
        Ok(out)
    }
}

impl fmt::Display for Wavelength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}nm", self.0)
    }
}

impl TryFrom<u16> for Wavelength {
    type Error = AeronetError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Wavelength::new(value)
    }
}

impl From<Wavelength> for u16 {
    fn from(wl: Wavelength) -> Self {
        wl.0
    }
}

/// A user query for AOD measurements at one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub site: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub level: QualityLevel,
    pub averaging: AveragingType,
    pub wavelengths: Vec<Wavelength>,
}

impl Query {
    pub fn new(site: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            site: site.into(),
            start,
            end,
            level: QualityLevel::default(),
            averaging: AveragingType::default(),
            wavelengths: Wavelength::defaults(),
        }
    }

    pub fn with_level(mut self, level: QualityLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_averaging(mut self, averaging: AveragingType) -> Self {
        self.averaging = averaging;
        self
    }

    pub fn with_wavelengths(mut self, wavelengths: Vec<Wavelength>) -> Self {
        self.wavelengths = wavelengths;
        self
    }

    /// Check the parts of the query that do not need the site list.
    ///
    /// `today` bounds the end date; AERONET has no data in the future.
    pub fn validate_parameters(&self, today: NaiveDate) -> AeronetResult<()> {
        if self.site.trim().is_empty() {
            return Err(AeronetError::MissingParameter("site".to_string()));
        }
        if self.start > self.end {
            return Err(AeronetError::EmptyDateRange {
                start: self.start.to_string(),
                end: self.end.to_string(),
            });
        }
        if self.start < aeronet_epoch() {
            return Err(AeronetError::invalid(
                "start",
                format!("AERONET records begin on {}", aeronet_epoch()),
            ));
        }
        if self.end > today {
            return Err(AeronetError::invalid(
                "end",
                format!("{} is in the future", self.end),
            ));
        }
        if self.wavelengths.is_empty() {
            return Err(AeronetError::invalid("wavelength", "select at least one wavelength"));
        }
        Ok(())
    }

    /// Full validation, including that the site exists in the catalog.
    pub fn validate(&self, sites: &SiteCatalog, today: NaiveDate) -> AeronetResult<()> {
        self.validate_parameters(today)?;
        if !sites.contains(&self.site) {
            return Err(AeronetError::UnknownSite(self.site.clone()));
        }
        Ok(())
    }

    /// Number of calendar days covered, inclusive.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
