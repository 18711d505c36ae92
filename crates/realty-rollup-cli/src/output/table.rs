use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, headers, is_row_set};

/// Print a result as one or more tables.
///
/// Arrays of rows become a single table. Objects print their scalar fields as
/// a Field/Value table and every nested row set (properties, loans, lender
/// exposure, ...) as its own titled table. A report envelope additionally
/// prints its warnings and methodology.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => {
                print_sections(result);
                print_envelope_notes(map);
            }
            None => print_sections(value),
        },
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", cell(value)),
    }
}

fn print_sections(value: &Value) {
    let Value::Object(map) = value else {
        println!("{}", cell(value));
        return;
    };

    let scalars: Vec<(&String, &Value)> = map.iter().filter(|(_, v)| !is_row_set(v)).collect();
    if !scalars.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in scalars {
            builder.push_record([key.as_str(), &display_cell(val)]);
        }
        println!("{}", Table::from(builder));
    }

    for (key, val) in map.iter().filter(|(_, v)| is_row_set(v)) {
        println!("\n{}", title(key));
        if let Value::Array(rows) = val {
            print_rows(rows);
        }
    }
}

fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(none)");
        return;
    }
    if !rows.iter().all(Value::is_object) {
        for row in rows {
            println!("{}", cell(row));
        }
        return;
    }

    let columns = headers(rows);
    let mut builder = Builder::default();
    builder.push_record(&columns);
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = columns
                .iter()
                .map(|c| map.get(c.as_str()).map(display_cell).unwrap_or_default())
                .collect();
            builder.push_record(record);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }
    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {methodology}");
    }
}

/// Health badges and urgency breakdowns collapse to a short readable form.
fn display_cell(value: &Value) -> String {
    if let Value::Object(map) = value {
        if let (Some(label), Some(emoji)) = (map.get("label"), map.get("emoji")) {
            return format!("{} {}", cell(emoji), cell(label));
        }
        if let Some(total) = map.get("total") {
            return cell(total);
        }
    }
    cell(value)
}

fn title(key: &str) -> String {
    key.split('_')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_cell_collapses_badges() {
        let badge = json!({"tone": "red", "label": "Concern", "emoji": "🚨"});
        assert_eq!(display_cell(&badge), "🚨 Concern");
        let score = json!({"maturity": "0", "dscr": "0", "size": "10", "total": "10"});
        assert_eq!(display_cell(&score), "10");
    }

    #[test]
    fn test_title() {
        assert_eq!(title("lender_exposure"), "Lender Exposure");
    }
}
