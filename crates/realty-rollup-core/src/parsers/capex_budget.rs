use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parsers::leading_integer;

/// The next budgeted capex year and the amount text recorded for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapexEntry {
    pub year: String,
    pub amount: String,
}

/// Pick the earliest budget year that is not in the past.
///
/// Keys that do not start with a year are ignored. Returns `None` when the
/// budget is missing, empty, or only covers past years.
pub fn next_capex_entry(
    budget: Option<&BTreeMap<String, String>>,
    current_year: i32,
) -> Option<CapexEntry> {
    let budget = budget?;
    let (year, key) = budget
        .keys()
        .filter_map(|key| leading_integer(key).map(|year| (year, key)))
        .filter(|(year, _)| *year >= current_year)
        .min_by_key(|(year, _)| *year)?;

    let amount = budget
        .get(&year.to_string())
        .or_else(|| budget.get(key))
        .cloned()
        .unwrap_or_else(|| "N/A".to_string());

    Some(CapexEntry {
        year: year.to_string(),
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_picks_current_year_when_present() {
        let b = budget(&[("2024", "10"), ("2026", "20"), ("2027", "30")]);
        let entry = next_capex_entry(Some(&b), 2026).unwrap();
        assert_eq!(entry.year, "2026");
        assert_eq!(entry.amount, "20");
    }

    #[test]
    fn test_skips_past_years() {
        let b = budget(&[("2023", "$50,000"), ("2028", "$125,000")]);
        let entry = next_capex_entry(Some(&b), 2026).unwrap();
        assert_eq!(entry.year, "2028");
        assert_eq!(entry.amount, "$125,000");
    }

    #[test]
    fn test_all_past_or_empty() {
        let b = budget(&[("2020", "1"), ("2021", "2")]);
        assert_eq!(next_capex_entry(Some(&b), 2026), None);
        assert_eq!(next_capex_entry(Some(&BTreeMap::new()), 2026), None);
        assert_eq!(next_capex_entry(None, 2026), None);
    }

    #[test]
    fn test_non_year_keys_ignored() {
        let b = budget(&[("notes", "roof soon"), ("2027 (est)", "80k")]);
        let entry = next_capex_entry(Some(&b), 2026).unwrap();
        assert_eq!(entry.year, "2027");
        assert_eq!(entry.amount, "80k");
    }
}
