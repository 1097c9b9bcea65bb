pub mod aggregator;
pub mod client;
pub mod models;
pub mod paginator;

// Re-exports for convenience
pub use aggregator::{Aggregator, FetchError, FetchRequest, FetchSettings};
pub use client::{ClientError, HistorySource, SolscanClient};
pub use paginator::TransactionPaginator;
