//! Data access for the AERONET aerosol web service.
//!
//! - `client`: HTTP requests against the data and site-list endpoints
//! - `parse`: delimited text responses into measurement rows and sites
//! - `processing`: wavelength filtering, statistics and coverage summaries
//! - `service`: cached loading pipeline used by the UI

pub mod client;
pub mod parse;
pub mod processing;
pub mod service;
pub mod source;

pub use client::{AeronetClient, ClientConfig};
pub use parse::{parse_aod_response, parse_sites};
pub use processing::{completeness, completeness_against, distinct_timestamps, filter_wavelengths, Completeness, Statistics, TemporalCoverage};
pub use service::{AodDataset, AodService, CacheMode};
pub use source::AodSource;
