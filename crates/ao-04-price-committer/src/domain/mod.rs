//! Domain layer for the block price committer

pub mod payload;
pub mod summary;

pub use payload::{decode_oracle_tx, parse_prices, ParsedPrices};
pub use summary::CommitSummary;
