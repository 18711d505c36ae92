pub mod debt;
pub mod error;
pub mod health;
pub mod parsers;
pub mod records;
pub mod report;
pub mod rollup;
pub mod types;

#[cfg(feature = "capex")]
pub mod capex;

#[cfg(feature = "alerts")]
pub mod alerts;

pub use error::RollupError;
pub use records::{AssetMetric, DebtLoan, PortfolioSnapshot, Property};
pub use types::*;

/// Standard result type for all realty-rollup operations
pub type RollupResult<T> = Result<T, RollupError>;
