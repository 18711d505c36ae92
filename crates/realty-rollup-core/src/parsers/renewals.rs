use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([0-9]{1,2})/([0-9]{1,2})/([0-9]{2,4})").expect("valid regex")
    })
}

/// Pull the first `M/D/YYYY` (or `M/D/YY`) date out of a line of text.
///
/// Two-digit years are read as 20YY. Impossible calendar dates yield `None`.
pub fn extract_date_from_text(input: &str) -> Option<NaiveDate> {
    let caps = date_pattern().captures(input)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year_raw: i32 = caps[3].parse().ok()?;
    let year = if year_raw < 100 { 2000 + year_raw } else { year_raw };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Choose the renewal line to headline from free-text lease notes.
///
/// Returns the earliest line dated on or after `today`. When every dated line
/// is in the past, the earliest dated line is returned; when no line carries
/// a date, the first non-empty line is returned verbatim.
pub fn first_upcoming_renewal(text: Option<&str>, today: NaiveDate) -> Option<String> {
    let lines: Vec<&str> = text?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let first = *lines.first()?;

    let mut dated: Vec<(NaiveDate, &str)> = lines
        .iter()
        .filter_map(|line| extract_date_from_text(line).map(|date| (date, *line)))
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    let chosen = dated
        .iter()
        .find(|(date, _)| *date >= today)
        .or_else(|| dated.first())
        .map(|(_, line)| *line)
        .unwrap_or(first);

    Some(chosen.to_string())
}
