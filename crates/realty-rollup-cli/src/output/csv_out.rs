use serde_json::Value;
use std::io;

use super::{cell, headers, is_row_set};

/// Write a result as CSV on stdout.
///
/// Row sets are written with a header line. An object holding exactly one row
/// set (e.g. the loans listing) writes that set; anything else falls back to
/// field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Array(rows) => write_rows(&mut wtr, rows),
        Value::Object(map) => {
            let row_sets: Vec<&Value> = map.values().filter(|v| is_row_set(v)).collect();
            if let [Value::Array(rows)] = row_sets.as_slice() {
                write_rows(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &cell(val)]);
                }
            }
        }
        _ => {
            let _ = wtr.write_record([cell(body)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    if rows.is_empty() {
        return;
    }
    if !rows.iter().all(Value::is_object) {
        for row in rows {
            let _ = wtr.write_record([cell(row)]);
        }
        return;
    }

    let columns = headers(rows);
    let _ = wtr.write_record(&columns);
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = columns
                .iter()
                .map(|c| map.get(c.as_str()).map(cell).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_write_header_and_values() {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_rows(
            &mut wtr,
            &[json!({"id": "a", "dscr": "1.2"}), json!({"id": "b", "dscr": null})],
        );
        let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        // serde_json maps iterate keys in sorted order
        assert_eq!(data, "dscr,id\n1.2,a\n,b\n");
    }
}
