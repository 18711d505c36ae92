pub mod builder;
pub mod sorting;
pub mod stats;

pub use builder::{build_property_rollups, PropertyRollup};
pub use sorting::{sort_rollups, RollupSort};
pub use stats::{calculate_portfolio_stats, PortfolioStats};
