//! Measurement rows parsed from AERONET responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::query::{QualityLevel, Wavelength};

/// One AOD observation at one wavelength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub timestamp: DateTime<Utc>,
    pub wavelength: Wavelength,
    pub aod: f64,
    /// Processing level the value was produced at
    pub quality: QualityLevel,
}

impl Measurement {
    pub fn new(timestamp: DateTime<Utc>, wavelength: Wavelength, aod: f64, quality: QualityLevel) -> Self {
        Self {
            timestamp,
            wavelength,
            aod,
            quality,
        }
    }
}
