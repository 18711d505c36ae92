use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Stream a JSON document (snapshot, weights or budget map) from disk.
///
/// Relative paths resolve against the working directory.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let path = Path::new(path);
    let meta = fs::metadata(path).map_err(|e| format!("Cannot open '{}': {e}", path.display()))?;
    if !meta.is_file() {
        return Err(format!("'{}' is a directory, expected a JSON file", path.display()).into());
    }
    debug!(path = %path.display(), bytes = meta.len(), "reading JSON input");

    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader)
        .map_err(|e| format!("'{}' is not valid input: {e}", path.display()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use realty_rollup_core::debt::UrgencyWeights;

    #[test]
    fn test_missing_file_is_reported() {
        let err = read_json::<UrgencyWeights>("no/such/weights.json").unwrap_err();
        assert!(err.to_string().contains("Cannot open"));
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = std::env::temp_dir();
        let err = read_json::<UrgencyWeights>(dir.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("directory"));
    }
}
