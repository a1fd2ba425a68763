//! CSV export of measurement rows.
//!
//! The table is wide: one line per timestamp, one `AOD_<n>nm` column per
//! selected wavelength. Cells without a measurement are left blank.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::{DateTime, Utc};
use tracing::debug;

use aeronet_common::{AeronetError, AeronetResult, Measurement, Query, Wavelength};

pub const DATETIME_COLUMN: &str = "datetime";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One timestamp of the wide table, with a cell per selected wavelength.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub timestamp: DateTime<Utc>,
    /// Parallel to the wavelength list the table was built with.
    pub values: Vec<Option<f64>>,
}

impl WideRow {
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(DATETIME_FORMAT).to_string()
    }
}

/// Group `rows` by timestamp, in time order.
///
/// Timestamps with no value at any of `wavelengths` are omitted.
pub fn wide_table(rows: &[Measurement], wavelengths: &[Wavelength]) -> Vec<WideRow> {
    let mut grouped: BTreeMap<DateTime<Utc>, BTreeMap<Wavelength, f64>> = BTreeMap::new();
    for row in rows.iter().filter(|r| wavelengths.contains(&r.wavelength)) {
        grouped.entry(row.timestamp).or_default().insert(row.wavelength, row.aod);
    }

    grouped
        .into_iter()
        .map(|(timestamp, values)| WideRow {
            timestamp,
            values: wavelengths.iter().map(|wl| values.get(wl).copied()).collect(),
        })
        .collect()
}

/// Download file name for a query, e.g. `aeronet_GSFC_2024-06-01_to_2024-06-02.csv`.
pub fn export_filename(query: &Query) -> String {
    let site: String = query
        .site
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    format!("aeronet_{}_{}_to_{}.csv", site, query.start, query.end)
}

/// Write `rows` at `wavelengths` as CSV. Returns the number of data lines.
///
/// Timestamps with no value at any selected wavelength are omitted.
pub fn export_csv<W: Write>(rows: &[Measurement], wavelengths: &[Wavelength], writer: W) -> AeronetResult<usize> {
    let table = wide_table(rows, wavelengths);

    let mut out = csv::Writer::from_writer(writer);

    let mut header = vec![DATETIME_COLUMN.to_string()];
    header.extend(wavelengths.iter().map(|wl| wl.column_name()));
    out.write_record(&header).map_err(export_error)?;

    for row in &table {
        let mut record = Vec::with_capacity(wavelengths.len() + 1);
        record.push(row.formatted_timestamp());
        record.extend(row.values.iter().map(|v| v.map(|v| v.to_string()).unwrap_or_default()));
        out.write_record(&record).map_err(export_error)?;
    }

    out.flush()?;
    debug!(lines = table.len(), columns = wavelengths.len(), "Exported CSV");

    Ok(table.len())
}

fn export_error(e: csv::Error) -> AeronetError {
    AeronetError::InternalError(format!("CSV export failed: {}", e))
}
