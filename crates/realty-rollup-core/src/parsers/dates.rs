use chrono::{Datelike, NaiveDate};

/// Parse an ISO `YYYY-MM-DD` date, tolerating a trailing time component.
pub fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Whole calendar months from `from` to `to`, ignoring the day of month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    let years = to.year() - from.year();
    let months = to.month() as i32 - from.month() as i32;
    years * 12 + months
}
