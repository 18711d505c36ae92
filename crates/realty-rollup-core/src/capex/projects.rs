use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::health::{capex_priority_health, HealthResult};
use crate::parsers::dates::parse_loose_date;
use crate::records::null_as_default;
use crate::types::Money;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapexStatus {
    #[default]
    Planning,
    #[serde(rename = "In Progress")]
    InProgress,
    Complete,
}

/// A planned capital project on a property.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapexProject {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub property_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub project: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budget: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actual_spend: Money,
    #[serde(default, deserialize_with = "null_as_default")]
    pub planned_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub due_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: CapexStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: String,
}

impl CapexProject {
    pub fn due(&self) -> Option<NaiveDate> {
        parse_loose_date(&self.due_date)
    }

    pub fn planned(&self) -> Option<NaiveDate> {
        parse_loose_date(&self.planned_date)
    }

    pub fn health(&self) -> HealthResult {
        capex_priority_health(&self.priority)
    }
}

/// Projects due within `days` days of `as_of`, inclusive at both ends.
/// Projects without a readable due date are skipped.
pub fn upcoming_capex(projects: &[CapexProject], days: u64, as_of: NaiveDate) -> Vec<CapexProject> {
    let end = as_of.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
    projects
        .iter()
        .filter(|p| p.due().is_some_and(|due| due >= as_of && due <= end))
        .cloned()
        .collect()
}

/// Projects past their due date that are not complete.
pub fn overdue_capex(projects: &[CapexProject], as_of: NaiveDate) -> Vec<CapexProject> {
    projects
        .iter()
        .filter(|p| p.status != CapexStatus::Complete && p.due().is_some_and(|due| due < as_of))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub category: String,
    pub budget: Money,
}

/// Budget totals per category, largest first.
pub fn capex_by_category(projects: &[CapexProject]) -> Vec<CategoryBudget> {
    let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
    for project in projects {
        let total = totals.entry(project.category.as_str()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(project.budget);
    }
    let mut out: Vec<CategoryBudget> = totals
        .into_iter()
        .map(|(category, budget)| CategoryBudget {
            category: category.to_string(),
            budget,
        })
        .collect();
    out.sort_by(|a, b| b.budget.cmp(&a.budget));
    out
}
