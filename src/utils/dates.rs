use chrono::{NaiveDate, NaiveDateTime};

const ISO_DATE: &str = "%Y-%m-%d";
const ISO_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Pollution `Date Local` format (M/d/yy)
pub const SHORT_US_DATE: &str = "%m/%d/%y";

/// Parse an ISO date, truncating any time component. Unparseable input yields `None`.
///
/// # Examples
/// ```
/// use fire_pollution::utils::dates::parse_iso_date;
///
/// let date = parse_iso_date("2014-05-10 00:00:00").unwrap();
/// assert_eq!(date.to_string(), "2014-05-10");
/// assert!(parse_iso_date("not a date").is_none());
/// ```
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, ISO_DATE) {
        return Some(date);
    }

    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|datetime| datetime.date())
}

/// Parse a month/day/two-digit-year date such as `5/12/14`.
pub fn parse_short_us_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, SHORT_US_DATE).ok()
}

/// Parse a `YYYY-MM-DD` bound, surfacing the failure (used for configuration).
pub fn parse_date_bound(value: &str) -> crate::error::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE).map_err(|e| {
        crate::error::ProcessingError::Config(format!("Invalid date '{}': {}", value, e))
    })
}
