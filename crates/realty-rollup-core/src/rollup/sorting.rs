use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::rollup::builder::PropertyRollup;

/// Orderings offered by the overview table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollupSort {
    #[default]
    Alphabetical,
    HighestNoi,
    /// Weakest coverage first; properties without DSCR go last
    LowestDscr,
}

/// Return the rollups in the requested order. The input is left untouched.
pub fn sort_rollups(rollups: &[PropertyRollup], order: RollupSort) -> Vec<PropertyRollup> {
    let mut sorted = rollups.to_vec();
    match order {
        RollupSort::Alphabetical => sorted.sort_by(|a, b| {
            a.property
                .property_name
                .to_lowercase()
                .cmp(&b.property.property_name.to_lowercase())
        }),
        RollupSort::HighestNoi => sorted.sort_by(|a, b| b.noi().cmp(&a.noi())),
        RollupSort::LowestDscr => sorted.sort_by(|a, b| {
            match (a.effective_dscr(), b.effective_dscr()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AssetMetric, Property};
    use crate::rollup::builder::build_property_rollups;
    use rust_decimal_macros::dec;

    fn sample() -> Vec<PropertyRollup> {
        let props = vec![
            Property { id: "1".into(), property_name: "beacon".into(), ..Default::default() },
            Property { id: "2".into(), property_name: "Atrium".into(), ..Default::default() },
            Property { id: "3".into(), property_name: "Cedar".into(), ..Default::default() },
        ];
        let metrics = vec![
            AssetMetric { property_id: "1".into(), noi_ttm: Some(dec!(50)), dscr: Some(dec!(1.4)), ..Default::default() },
            AssetMetric { property_id: "2".into(), noi_ttm: Some(dec!(90)), ..Default::default() },
            AssetMetric { property_id: "3".into(), noi_ttm: Some(dec!(10)), dscr: Some(dec!(1.1)), ..Default::default() },
        ];
        build_property_rollups(&props, &metrics, &[])
    }

    fn names(rollups: &[PropertyRollup]) -> Vec<&str> {
        rollups.iter().map(|r| r.property.property_name.as_str()).collect()
    }

    #[test]
    fn test_alphabetical_ignores_case() {
        assert_eq!(names(&sort_rollups(&sample(), RollupSort::Alphabetical)), vec!["Atrium", "beacon", "Cedar"]);
    }

    #[test]
    fn test_highest_noi() {
        assert_eq!(names(&sort_rollups(&sample(), RollupSort::HighestNoi)), vec!["Atrium", "beacon", "Cedar"]);
    }

    #[test]
    fn test_lowest_dscr_puts_unknown_last() {
        assert_eq!(names(&sort_rollups(&sample(), RollupSort::LowestDscr)), vec!["Cedar", "beacon", "Atrium"]);
    }
}
