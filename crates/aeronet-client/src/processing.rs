//! Summaries over parsed measurement rows.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use aeronet_common::{Measurement, Wavelength};

/// Keep only rows at the given wavelengths, preserving order.
pub fn filter_wavelengths(rows: &[Measurement], wavelengths: &[Wavelength]) -> Vec<Measurement> {
    rows.iter()
        .filter(|row| wavelengths.contains(&row.wavelength))
        .copied()
        .collect()
}

/// Distinct timestamps, ascending.
pub fn distinct_timestamps(rows: &[Measurement]) -> Vec<DateTime<Utc>> {
    rows.iter()
        .map(|row| row.timestamp)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Descriptive statistics of the AOD values at one wavelength.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub wavelength: Wavelength,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1); zero for a single value
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
}

impl Statistics {
    /// Statistics over the rows at `wavelength`, or `None` if there are none.
    pub fn compute(rows: &[Measurement], wavelength: Wavelength) -> Option<Self> {
        let mut values: Vec<f64> = rows
            .iter()
            .filter(|row| row.wavelength == wavelength)
            .map(|row| row.aod)
            .collect();

        if values.is_empty() {
            return None;
        }

        values.sort_by(|a, b| a.total_cmp(b));

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            var.sqrt()
        } else {
            0.0
        };

        Some(Self {
            wavelength,
            count,
            mean,
            median: percentile(&values, 0.5),
            std,
            min: values[0],
            max: values[count - 1],
            q25: percentile(&values, 0.25),
            q75: percentile(&values, 0.75),
        })
    }

    /// Statistics for each wavelength that has data, in the given order.
    pub fn compute_all(rows: &[Measurement], wavelengths: &[Wavelength]) -> Vec<Self> {
        wavelengths
            .iter()
            .filter_map(|&wl| Self::compute(rows, wl))
            .collect()
    }
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// How many timestamps carry a valid value at one wavelength.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completeness {
    pub wavelength: Wavelength,
    pub valid: usize,
    pub total: usize,
    pub percent: f64,
}

/// Per wavelength completeness against the distinct timestamps of `rows`.
pub fn completeness(rows: &[Measurement], wavelengths: &[Wavelength]) -> Vec<Completeness> {
    completeness_against(rows, wavelengths, distinct_timestamps(rows).len())
}

/// Per wavelength completeness against a given number of timestamps.
///
/// `total` is usually counted over the whole response, before wavelength
/// selection, so a wavelength is measured against every timestamp that has
/// a valid value at any wavelength.
pub fn completeness_against(rows: &[Measurement], wavelengths: &[Wavelength], total: usize) -> Vec<Completeness> {
    wavelengths
        .iter()
        .map(|&wavelength| {
            let valid = rows.iter().filter(|row| row.wavelength == wavelength).count();
            let percent = if total == 0 {
                0.0
            } else {
                valid as f64 / total as f64 * 100.0
            };
            Completeness {
                wavelength,
                valid,
                total,
                percent,
            }
        })
        .collect()
}

/// Time span covered by a set of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemporalCoverage {
    pub first: DateTime<Utc>,
    pub last: DateTime<Utc>,
    /// Calendar span, inclusive of both ends
    pub span_days: i64,
    pub timestamps: usize,
}

impl TemporalCoverage {
    pub fn from_rows(rows: &[Measurement]) -> Option<Self> {
        let timestamps = distinct_timestamps(rows);
        let first = *timestamps.first()?;
        let last = *timestamps.last()?;

        Some(Self {
            first,
            last,
            span_days: (last - first).num_days() + 1,
            timestamps: timestamps.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeronet_common::QualityLevel;
    use chrono::TimeZone;

    fn row(day: u32, hour: u32, nm: u16, aod: f64) -> Measurement {
        Measurement::new(
            Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap(),
            Wavelength::new(nm).unwrap(),
            aod,
            QualityLevel::Level15,
        )
    }

    #[test]
    fn test_percentile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&v, 0.0), 1.0);
        assert_eq!(percentile(&v, 1.0), 4.0);
        assert!((percentile(&v, 0.5) - 2.5).abs() < 1e-12);
        assert!((percentile(&v, 0.25) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_statistics_single_value() {
        let rows = vec![row(1, 12, 500, 0.2)];
        let stats = Statistics::compute(&rows, Wavelength::new(500).unwrap()).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.median, 0.2);
        assert_eq!(stats.q25, 0.2);
        assert!(Statistics::compute(&rows, Wavelength::new(440).unwrap()).is_none());
    }

    #[test]
    fn test_statistics_known_series() {
        let rows: Vec<_> = [0.1, 0.2, 0.3, 0.4, 0.5]
            .iter()
            .enumerate()
            .map(|(i, &v)| row(1, i as u32, 440, v))
            .collect();
        let stats = Statistics::compute(&rows, Wavelength::new(440).unwrap()).unwrap();
        assert_eq!(stats.count, 5);
        assert!((stats.mean - 0.3).abs() < 1e-12);
        assert!((stats.median - 0.3).abs() < 1e-12);
        assert!((stats.std - 0.025f64.sqrt()).abs() < 1e-12);
        assert!((stats.q25 - 0.2).abs() < 1e-12);
        assert!((stats.q75 - 0.4).abs() < 1e-12);
        assert_eq!(stats.min, 0.1);
        assert_eq!(stats.max, 0.5);
    }

    #[test]
    fn test_completeness_counts_distinct_timestamps() {
        let rows = vec![
            row(1, 12, 440, 0.1),
            row(1, 12, 500, 0.1),
            row(1, 13, 440, 0.1),
            row(2, 9, 440, 0.1),
        ];
        let wl = [Wavelength::new(440).unwrap(), Wavelength::new(500).unwrap()];
        let c = completeness(&rows, &wl);
        assert_eq!(c[0].valid, 3);
        assert_eq!(c[0].total, 3);
        assert_eq!(c[0].percent, 100.0);
        assert_eq!(c[1].valid, 1);
        assert!((c[1].percent - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_completeness_against_wider_total() {
        let rows = vec![row(1, 12, 440, 0.1), row(2, 9, 440, 0.1)];
        let c = completeness_against(&rows, &[Wavelength::new(440).unwrap()], 4);
        assert_eq!(c[0].valid, 2);
        assert_eq!(c[0].total, 4);
        assert_eq!(c[0].percent, 50.0);
    }

    #[test]
    fn test_completeness_of_nothing() {
        let c = completeness(&[], &[Wavelength::new(440).unwrap()]);
        assert_eq!(c[0].total, 0);
        assert_eq!(c[0].percent, 0.0);
    }

    #[test]
    fn test_temporal_coverage() {
        let rows = vec![row(1, 12, 440, 0.1), row(3, 9, 440, 0.1), row(3, 9, 500, 0.1)];
        let cov = TemporalCoverage::from_rows(&rows).unwrap();
        assert_eq!(cov.span_days, 2);
        assert_eq!(cov.timestamps, 2);
        assert!(TemporalCoverage::from_rows(&[]).is_none());
    }

    #[test]
    fn test_filter_wavelengths() {
        let rows = vec![row(1, 12, 440, 0.1), row(1, 12, 500, 0.2), row(1, 12, 870, 0.3)];
        let kept = filter_wavelengths(&rows, &[Wavelength::new(870).unwrap(), Wavelength::new(440).unwrap()]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].aod, 0.1);
        assert_eq!(kept[1].aod, 0.3);
    }
}
