//! Parsing of AERONET delimited text responses.
//!
//! A data response starts with a few free-text metadata lines followed by a
//! comma separated table. The table header is the first line naming a
//! `Date(dd:mm:yyyy)` column.

use csv::{Position, ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use aeronet_common::{
    parse_aeronet_timestamp, AeronetError, AeronetResult, Measurement, QualityLevel, Site, SiteCatalog, Wavelength,
};

/// AERONET fill value for missing measurements.
const MISSING_VALUE: f64 = -999.0;

const QUALITY_COLUMN: &str = "Data_Quality_Level";

/// Column positions within a data table.
#[derive(Debug)]
struct ColumnLayout {
    date: usize,
    time: usize,
    quality: Option<usize>,
    aod: Vec<(usize, Wavelength)>,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> AeronetResult<Self> {
        let find = |pred: &dyn Fn(&str) -> bool| headers.iter().position(pred);

        let date = find(&is_date_column).ok_or_else(|| AeronetError::MissingColumn("Date(dd:mm:yyyy)".to_string()))?;
        let time = find(&|h: &str| h.starts_with("Time(") || h.starts_with("Time_"))
            .ok_or_else(|| AeronetError::MissingColumn("Time(hh:mm:ss)".to_string()))?;
        let quality = find(&|h: &str| h == QUALITY_COLUMN);

        let aod: Vec<(usize, Wavelength)> = headers
            .iter()
            .enumerate()
            .filter_map(|(idx, h)| Wavelength::from_column(h).map(|wl| (idx, wl)))
            .collect();

        if aod.is_empty() {
            return Err(AeronetError::MissingColumn("AOD_<wavelength>nm".to_string()));
        }

        Ok(Self { date, time, quality, aod })
    }
}

fn is_date_column(header: &str) -> bool {
    header.starts_with("Date(") || header.starts_with("Date_(")
}

fn is_header_line(line: &str) -> bool {
    line.split(',').map(str::trim).any(is_date_column)
}

/// Parse an AOD download into measurement rows.
///
/// `level` is the quality flag applied when the response has no
/// `Data_Quality_Level` column. Rows are sorted by timestamp, then wavelength.
pub fn parse_aod_response(body: &str, level: QualityLevel) -> AeronetResult<Vec<Measurement>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let lines: Vec<&str> = body.lines().collect();
    let header_idx = lines.iter().position(|l| is_header_line(l)).ok_or_else(|| {
        let preview: String = body.trim().chars().take(80).collect();
        AeronetError::UnexpectedFormat(format!("no data table found in response starting with '{}'", preview))
    })?;

    let table = lines[header_idx..].join("\n");
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(table.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AeronetError::MalformedRow { line: header_idx + 1, message: e.to_string() })?
        .clone();
    let layout = ColumnLayout::from_headers(&headers)?;

    let mut rows = Vec::new();
    // csv positions are 1-based lines of `table`, whose first line is body
    // line `header_idx + 1`; blank and multi-line records keep them exact.
    let body_line = |pos: Option<&Position>| header_idx + pos.map_or(1, |p| p.line() as usize);

    for record in reader.records() {
        let record = record.map_err(|e| AeronetError::MalformedRow {
            line: body_line(e.position()),
            message: e.to_string(),
        })?;
        let line = body_line(record.position());

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        parse_record(&record, &layout, level, line, &mut rows)?;
    }

    rows.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.wavelength.cmp(&b.wavelength)));

    debug!(rows = rows.len(), "Parsed AOD response");
    Ok(rows)
}

fn parse_record(
    record: &StringRecord,
    layout: &ColumnLayout,
    default_level: QualityLevel,
    line: usize,
    rows: &mut Vec<Measurement>,
) -> AeronetResult<()> {
    let field = |idx: usize| record.get(idx).unwrap_or("");

    let date = field(layout.date);
    let time = field(layout.time);
    let timestamp = parse_aeronet_timestamp(date, time).ok_or_else(|| AeronetError::MalformedRow {
        line,
        message: format!("invalid date/time '{} {}'", date, time),
    })?;

    let quality = match layout.quality.map(field) {
        Some(flag) if !flag.is_empty() => flag.parse().unwrap_or_else(|_| {
            warn!(line = line, flag = flag, "Unrecognised quality flag, using query level");
            default_level
        }),
        _ => default_level,
    };

    for &(idx, wavelength) in &layout.aod {
        let Some(aod) = parse_value(field(idx)).map_err(|message| AeronetError::MalformedRow {
            line,
            message: format!("{}: {}", wavelength.column_name(), message),
        })?
        else {
            continue;
        };
        rows.push(Measurement::new(timestamp, wavelength, aod, quality));
    }

    Ok(())
}

/// `Ok(None)` for fill values and blanks.
fn parse_value(raw: &str) -> Result<Option<f64>, String> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("N/A") || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let value: f64 = raw.parse().map_err(|_| format!("'{}' is not a number", raw))?;
    if (value - MISSING_VALUE).abs() < 1e-6 || !value.is_finite() {
        return Ok(None);
    }
    Ok(Some(value))
}

/// Parse the AERONET site locations file.
///
/// Lines are `name,longitude,latitude,elevation`; header lines and lines
/// whose coordinates do not parse are skipped. A blank elevation is 0 m.
pub fn parse_sites(body: &str) -> AeronetResult<SiteCatalog> {
    let mut sites = Vec::new();

    for line in body.lines() {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 3 || parts[0].is_empty() {
            continue;
        }
        let (Ok(longitude), Ok(latitude)) = (parts[1].parse::<f64>(), parts[2].parse::<f64>()) else {
            continue;
        };
        let elevation = parts.get(3).and_then(|e| e.parse::<f64>().ok()).unwrap_or(0.0);

        sites.push(Site::new(parts[0], latitude, longitude, elevation));
    }

    if sites.is_empty() {
        return Err(AeronetError::UnexpectedFormat("site list contains no sites".to_string()));
    }

    Ok(SiteCatalog::new(sites))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("0.125"), Ok(Some(0.125)));
        assert_eq!(parse_value("-999."), Ok(None));
        assert_eq!(parse_value("-999.000000"), Ok(None));
        assert_eq!(parse_value(""), Ok(None));
        assert_eq!(parse_value("N/A"), Ok(None));
        assert!(parse_value("abc").is_err());
    }

    #[test]
    fn test_header_detection() {
        assert!(is_header_line("AERONET_Site,Date(dd:mm:yyyy),Time(hh:mm:ss)"));
        assert!(is_header_line("Date_(dd:mm:yyyy),Time_(hh:mm:ss),AOD_500nm"));
        assert!(!is_header_line("AERONET_Database_Site_List,Num=2,Date_Generated=01:01:2024"));
        assert!(!is_header_line("Version 3: AOD Level 1.5"));
    }

    #[test]
    fn test_empty_body_has_no_rows() {
        assert!(parse_aod_response("  \n", QualityLevel::Level15).unwrap().is_empty());
    }
}
