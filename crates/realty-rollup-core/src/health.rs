use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Percent, Rate};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// DSCR below this is a concern.
pub const DSCR_CONCERN_BELOW: Rate = dec!(1.25);
/// DSCR below this (and at or above the concern line) is on watch.
pub const DSCR_WATCH_BELOW: Rate = dec!(1.5);
/// Occupancy percentage below this is a concern.
pub const OCCUPANCY_CONCERN_BELOW: Percent = dec!(85);
/// Occupancy percentage below this (and at or above the concern line) is on watch.
pub const OCCUPANCY_WATCH_BELOW: Percent = dec!(95);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Discrete health category shared by every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Green,
    Yellow,
    Red,
    /// Unknown / informational
    Blue,
}

impl Tone {
    /// Chart colour used for this tone across the dashboard.
    pub fn hex_color(self) -> &'static str {
        match self {
            Tone::Red => "#ef4444",
            Tone::Yellow => "#f59e0b",
            Tone::Green => "#10b981",
            Tone::Blue => "#3b82f6",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tone::Green => "green",
            Tone::Yellow => "yellow",
            Tone::Red => "red",
            Tone::Blue => "blue",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResult {
    pub tone: Tone,
    pub label: String,
    pub emoji: String,
}

impl HealthResult {
    fn new(tone: Tone, label: &str, emoji: &str) -> Self {
        Self {
            tone,
            label: label.to_string(),
            emoji: emoji.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Classifiers
// ---------------------------------------------------------------------------

/// Classify a debt service coverage ratio.
pub fn dscr_health(value: Option<Rate>) -> HealthResult {
    match value {
        None => HealthResult::new(Tone::Blue, "No data", "📊"),
        Some(v) => banded(v, DSCR_CONCERN_BELOW, DSCR_WATCH_BELOW),
    }
}

/// Classify an occupancy percentage (0–100).
pub fn occupancy_health(value: Option<Percent>) -> HealthResult {
    match value {
        None => HealthResult::new(Tone::Blue, "No data", "👥"),
        Some(v) => banded(v, OCCUPANCY_CONCERN_BELOW, OCCUPANCY_WATCH_BELOW),
    }
}

/// Classify a capex project priority. Unrecognised priorities are routine.
pub fn capex_priority_health(priority: &str) -> HealthResult {
    match priority.trim().to_lowercase().as_str() {
        "critical" => HealthResult::new(Tone::Red, "Critical", "🔴"),
        "major" => HealthResult::new(Tone::Yellow, "Major", "🟡"),
        "tenant improvements" => HealthResult::new(Tone::Blue, "Tenant Improvements", "🔵"),
        _ => HealthResult::new(Tone::Green, "Routine", "🟢"),
    }
}

fn banded(value: Decimal, concern_below: Decimal, watch_below: Decimal) -> HealthResult {
    if value < concern_below {
        HealthResult::new(Tone::Red, "Concern", "🚨")
    } else if value < watch_below {
        HealthResult::new(Tone::Yellow, "Watch", "⚠️")
    } else {
        HealthResult::new(Tone::Green, "Healthy", "✅")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dscr_boundaries() {
        assert_eq!(dscr_health(Some(dec!(1.24))).tone, Tone::Red);
        assert_eq!(dscr_health(Some(dec!(1.25))).tone, Tone::Yellow);
        assert_eq!(dscr_health(Some(dec!(1.49))).tone, Tone::Yellow);
        assert_eq!(dscr_health(Some(dec!(1.5))).tone, Tone::Green);
        assert_eq!(dscr_health(Some(dec!(0))).label, "Concern");
    }

    #[test]
    fn test_dscr_missing_is_blue() {
        let h = dscr_health(None);
        assert_eq!(h.tone, Tone::Blue);
        assert_eq!(h.label, "No data");
    }

    #[test]
    fn test_occupancy_boundaries() {
        assert_eq!(occupancy_health(Some(dec!(84.99))).tone, Tone::Red);
        assert_eq!(occupancy_health(Some(dec!(85))).tone, Tone::Yellow);
        assert_eq!(occupancy_health(Some(dec!(94.9))).tone, Tone::Yellow);
        assert_eq!(occupancy_health(Some(dec!(95))).tone, Tone::Green);
        assert_eq!(occupancy_health(None).tone, Tone::Blue);
    }

    #[test]
    fn test_capex_priority_case_insensitive() {
        assert_eq!(capex_priority_health("CRITICAL").tone, Tone::Red);
        assert_eq!(capex_priority_health("Major").tone, Tone::Yellow);
        assert_eq!(capex_priority_health("Tenant Improvements").tone, Tone::Blue);
        let routine = capex_priority_health("paint");
        assert_eq!(routine.tone, Tone::Green);
        assert_eq!(routine.label, "Routine");
    }

    #[test]
    fn test_tone_serializes_lowercase() {
        let json = serde_json::to_string(&Tone::Yellow).unwrap();
        assert_eq!(json, "\"yellow\"");
        assert_eq!(Tone::Blue.hex_color(), "#3b82f6");
    }
}
