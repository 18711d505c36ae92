//! Parsers for the loosely typed fields the datastore hands us.
//!
//! None of these fail: malformed or missing input comes back as `None`,
//! never as zero.

pub mod capex_budget;
pub mod dates;
pub mod occupancy;
pub mod renewals;

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A persisted text field next to the value parsed out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LooseField<T> {
    pub raw: Option<String>,
    pub value: Option<T>,
}

impl<T> LooseField<T> {
    pub fn parse(raw: Option<&str>, parser: impl FnOnce(&str) -> Option<T>) -> Self {
        Self {
            raw: raw.map(str::to_string),
            value: raw.and_then(parser),
        }
    }

    /// Raw text was present but yielded nothing.
    pub fn is_malformed(&self) -> bool {
        self.raw.as_deref().is_some_and(|r| !r.trim().is_empty()) && self.value.is_none()
    }
}

/// Parse the leading decimal number of `text`, ignoring anything after it.
///
/// `"92.5 (incl. signed LOIs)"` yields 92.5; `"TBD"` yields `None`.
pub(crate) fn leading_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    let sign = if bytes[0] == b'-' { "-" } else { "" };
    let unsigned = &text[int_start..end];
    let number = if unsigned.starts_with('.') {
        format!("{sign}0{unsigned}")
    } else {
        format!("{sign}{unsigned}")
    };
    Decimal::from_str(&number).ok()
}

/// Parse the leading integer of `text` (`"2026 (est.)"` yields 2026).
pub(crate) fn leading_integer(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    text[..end].trim_start_matches('+').parse().ok()
}

/// URL slug for a property name: "Elm & Oak Plaza" -> "elm-and-oak-plaza".
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase().replace('&', " and ");
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}
