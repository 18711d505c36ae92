use std::collections::BTreeMap;

use chrono::NaiveDate;
use realty_rollup_core::parsers::capex_budget::next_capex_entry;
use realty_rollup_core::parsers::occupancy::parse_occupancy;
use realty_rollup_core::parsers::renewals::first_upcoming_renewal;
use realty_rollup_core::parsers::slugify;
use realty_rollup_core::Property;
use rust_decimal_macros::dec;

#[test]
fn test_percent_strings_parse_to_their_number() {
    for p in [dec!(0), dec!(12.5), dec!(85), dec!(94.99), dec!(100), dec!(-3)] {
        assert_eq!(parse_occupancy(Some(&format!("{p}%"))), Some(p));
    }
}

#[test]
fn test_non_numeric_occupancy_is_none_not_zero() {
    for raw in ["", "   ", "n/a", "Vacant", "%", "--"] {
        assert_eq!(parse_occupancy(Some(raw)), None, "input {raw:?}");
    }
    assert_eq!(parse_occupancy(None), None);
}

#[test]
fn test_property_occupancy_keeps_raw_text() {
    let property = Property {
        id: "p".into(),
        property_name: "Mill Yard".into(),
        occupancy_rate: Some("88.5%".into()),
        ..Default::default()
    };
    let field = property.occupancy();
    assert_eq!(field.raw.as_deref(), Some("88.5%"));
    assert_eq!(field.value, Some(dec!(88.5)));
    assert!(!field.is_malformed());
}

#[test]
fn test_next_capex_never_returns_past_year() {
    let budget: BTreeMap<String, String> = [("2024", "10"), ("2026", "20"), ("2027", "30")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    for current in 2020..=2030 {
        if let Some(entry) = next_capex_entry(Some(&budget), current) {
            assert!(entry.year.parse::<i32>().unwrap() >= current);
        }
    }
    let entry = next_capex_entry(Some(&budget), 2026).unwrap();
    assert_eq!((entry.year.as_str(), entry.amount.as_str()), ("2026", "20"));
    assert!(next_capex_entry(Some(&budget), 2028).is_none());
}

#[test]
fn test_renewal_notes_from_property_row() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let notes = "Suite 100 (Bright Dental) - expires 3/31/27\n\
                 Suite 210 (Law office) - expired 6/30/2026\n\
                 Suite 300 - renewal options TBD";
    assert_eq!(
        first_upcoming_renewal(Some(notes), today).as_deref(),
        Some("Suite 100 (Bright Dental) - expires 3/31/27")
    );
}

#[test]
fn test_slug_matches_overview_links() {
    assert_eq!(slugify("The Shops @ 5th & Main"), "the-shops-5th-and-main");
}
