//! Date and time handling for AERONET queries and responses.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{AeronetError, AeronetResult};

/// First day of the AERONET record. Earlier start dates are rejected.
pub fn aeronet_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1993, 1, 1).unwrap_or_default()
}

/// Parse a user supplied calendar date.
///
/// Accepts ISO `YYYY-MM-DD` (what HTML date inputs submit) and the
/// AERONET `dd:mm:yyyy` form.
pub fn parse_date(s: &str) -> AeronetResult<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return Err(AeronetError::MissingParameter("date".to_string()));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d:%m:%Y"))
        .map_err(|_| AeronetError::invalid("date", format!("'{}' is not a valid date (expected YYYY-MM-DD)", s)))
}

/// Combine the date and time columns of an AERONET data line into a UTC timestamp.
///
/// AERONET reports `dd:mm:yyyy` and `hh:mm:ss`; other products use
/// `yyyy-mm-dd`, which is accepted as well.
pub fn parse_aeronet_timestamp(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let combined = format!("{} {}", date.trim(), time.trim());
    NaiveDateTime::parse_from_str(&combined, "%d:%m:%Y %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&combined, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_iso_date() {
        let d = parse_date("2024-01-15").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 1, 15));
    }

    #[test]
    fn test_parse_aeronet_style_date() {
        let d = parse_date("15:01:2024").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2024, 1, 15));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(parse_date("2024-13-01"), Err(AeronetError::InvalidParameter { .. })));
        assert!(matches!(parse_date("  "), Err(AeronetError::MissingParameter(_))));
    }

    #[test]
    fn test_parse_aeronet_timestamp() {
        let ts = parse_aeronet_timestamp("02:06:2023", "13:45:07").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2023, 6, 2));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (13, 45, 7));
    }

    #[test]
    fn test_parse_aeronet_timestamp_invalid() {
        assert!(parse_aeronet_timestamp("32:01:2023", "00:00:00").is_none());
        assert!(parse_aeronet_timestamp("01:01:2023", "25:00:00").is_none());
    }

    #[test]
    fn test_epoch() {
        assert_eq!(aeronet_epoch().year(), 1993);
    }
}
