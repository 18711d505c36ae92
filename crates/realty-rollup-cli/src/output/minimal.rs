use serde_json::Value;

use super::cell;

/// Headline fields, most specific first. The first non-null one found wins.
const HEADLINE_KEYS: &[&str] = &[
    "renewal",
    "next",
    "value",
    "label",
    "weighted_avg_dscr",
    "portfolio_value_estimate",
    "total_debt",
];

/// Print only the headline answer of a result.
///
/// Row sets print one `id: total` (or id) per line; objects print the first
/// headline field present, else their first field.
pub fn print_minimal(value: &Value) {
    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Array(rows) => {
            for row in rows {
                println!("{}", row_line(row));
            }
        }
        Value::Object(map) => {
            if let Some(stats) = map.get("stats") {
                return print_minimal(stats);
            }
            for key in HEADLINE_KEYS {
                if let Some(val) = map.get(*key).filter(|v| !v.is_null()) {
                    println!("{}", headline(val));
                    return;
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{key}: {}", headline(val));
            }
        }
        _ => println!("{}", headline(body)),
    }
}

fn headline(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Object(map) => match (map.get("year"), map.get("amount")) {
            (Some(year), Some(amount)) => format!("{}: {}", cell(year), cell(amount)),
            _ => cell(value),
        },
        _ => cell(value),
    }
}

fn row_line(row: &Value) -> String {
    let Value::Object(map) = row else {
        return cell(row);
    };
    let name = map
        .get("property_name")
        .or_else(|| map.get("property"))
        .or_else(|| map.get("id"))
        .map(cell)
        .unwrap_or_default();
    match map.get("urgency").and_then(|u| u.get("total")) {
        Some(total) => format!("{name}: {}", cell(total)),
        None => name,
    }
}
