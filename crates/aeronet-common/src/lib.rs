//! Common types and utilities shared across the AOD explorer crates.

pub mod error;
pub mod measurement;
pub mod query;
pub mod site;
pub mod time;

pub use error::{AeronetError, AeronetResult, ErrorKind};
pub use measurement::Measurement;
pub use query::{AveragingType, QualityLevel, Query, Wavelength, AOD_WAVELENGTHS, DEFAULT_WAVELENGTHS};
pub use site::{Site, SiteCatalog, DEFAULT_SITE};
pub use time::{aeronet_epoch, parse_aeronet_timestamp, parse_date};
