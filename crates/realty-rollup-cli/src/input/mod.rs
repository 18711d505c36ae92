pub mod file;
pub mod stdin;

use realty_rollup_core::PortfolioSnapshot;

/// Load a portfolio snapshot from `--input`, falling back to piped stdin.
pub fn load_snapshot(path: &Option<String>) -> Result<PortfolioSnapshot, Box<dyn std::error::Error>> {
    if let Some(ref path) = path {
        return file::read_json(path);
    }
    match stdin::read_stdin()? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Err("Provide --input <snapshot.json> or pipe a JSON snapshot via stdin".into()),
    }
}
