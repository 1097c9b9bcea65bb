pub mod blockchain;
pub mod config;
pub mod export;
pub mod models;
pub mod state;
pub mod summary;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use blockchain::{Aggregator, FetchError, FetchRequest, FetchSettings, SolscanClient};
pub use models::{AccountSummary, DateRange, Row};
pub use state::{FetchState, FetchStatus, ProgressSnapshot};
pub use summary::HistorySummary;
pub use validation::{parse_date, validate_fetch_input, ValidationError};
