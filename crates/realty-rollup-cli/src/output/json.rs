use serde_json::Value;

/// Pretty-printed JSON on stdout; the default and the format scripts should consume.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("failed to serialise output: {e}"),
    }
}
