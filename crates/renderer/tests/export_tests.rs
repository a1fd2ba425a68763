//! Tests for CSV export.

use aeronet_client::parse_aod_response;
use aeronet_common::{QualityLevel, Query, Wavelength};
use chrono::NaiveDate;
use renderer::{export_csv, export_filename};
use test_utils::aod;

fn wl(nm: u16) -> Wavelength {
    Wavelength::new(nm).unwrap()
}

fn export(wavelengths: &[Wavelength]) -> (usize, Vec<Vec<String>>) {
    let rows = parse_aod_response(aod::SAMPLE_LEVEL15, QualityLevel::Level15).unwrap();
    let mut out = Vec::new();
    let written = export_csv(&rows, wavelengths, &mut out).unwrap();

    let mut reader = csv::ReaderBuilder::new().has_headers(false).from_reader(&out[..]);
    let records = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (written, records)
}

#[test]
fn test_export_line_count_matches_displayed_timestamps() {
    let (written, records) = export(&Wavelength::defaults());
    assert_eq!(written, aod::SAMPLE_LEVEL15_TIMESTAMPS);
    // Header plus one line per timestamp
    assert_eq!(records.len(), written + 1);
}

#[test]
fn test_export_columns_and_values() {
    let (_, records) = export(&[wl(440), wl(675)]);

    assert_eq!(records[0], vec!["datetime", "AOD_440nm", "AOD_675nm"]);
    assert_eq!(records[1], vec!["2024-06-01 12:00:00", "0.18", "0.09"]);
    // 675 nm is missing at 13:00
    assert_eq!(records[2], vec!["2024-06-01 13:00:00", "0.19", ""]);
    assert_eq!(records[3], vec!["2024-06-02 09:30:00", "0.13", "0.07"]);
}

#[test]
fn test_export_omits_timestamps_without_selected_values() {
    let (written, records) = export(&[wl(675)]);
    assert_eq!(written, 2);
    assert_eq!(records.len(), 3);
}

#[test]
fn test_export_filename_sanitizes_site() {
    let q = Query::new(
        "Site/With Space",
        NaiveDate::from_ymd_opt(2023, 3, 10).unwrap(),
        NaiveDate::from_ymd_opt(2023, 3, 11).unwrap(),
    );
    assert_eq!(export_filename(&q), "aeronet_Site_With_Space_2023-03-10_to_2023-03-11.csv");
}
