use crate::parsers::leading_decimal;
use crate::types::Percent;

/// Parse an occupancy string such as `"92%"` into a 0–100 percentage.
///
/// Returns `None` for missing, blank or non-numeric text.
pub fn parse_occupancy(raw: Option<&str>) -> Option<Percent> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    let cleaned = raw.replacen('%', "", 1);
    leading_decimal(cleaned.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_suffix() {
        assert_eq!(parse_occupancy(Some("92%")), Some(dec!(92)));
        assert_eq!(parse_occupancy(Some("100%")), Some(dec!(100)));
        assert_eq!(parse_occupancy(Some("87.5 %")), Some(dec!(87.5)));
    }

    #[test]
    fn test_bare_number() {
        assert_eq!(parse_occupancy(Some("64")), Some(dec!(64)));
        assert_eq!(parse_occupancy(Some("0%")), Some(dec!(0)));
    }

    #[test]
    fn test_trailing_commentary_is_ignored() {
        assert_eq!(
            parse_occupancy(Some("95% (2 suites vacant)")),
            Some(dec!(95))
        );
    }

    #[test]
    fn test_missing_or_garbage() {
        assert_eq!(parse_occupancy(None), None);
        assert_eq!(parse_occupancy(Some("")), None);
        assert_eq!(parse_occupancy(Some("   ")), None);
        assert_eq!(parse_occupancy(Some("%")), None);
        assert_eq!(parse_occupancy(Some("Vacant")), None);
    }
}
