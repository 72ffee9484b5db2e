//! # Block Price Committer (ao-04)
//!
//! Pre-block hook of the execution runtime. Reads the oracle payload from
//! the first transaction of a block and writes a price for every registered
//! currency pair the payload quotes.
//!
//! ## Flow
//!
//! ```text
//! FinalizeBlockRequest ──→ UpgradeHook (migrations first)
//!                               │
//!                               ↓
//!            txs[0] ──ao-01 decode──→ (prices, report)
//!                               │
//!                               ↓
//!                  QueryPricesResponse ──parse──→ {pair: BigInt}
//!                               │
//!                               ↓
//!        for pair in PriceStore::currency_pairs():
//!            absent   → skip (debug)
//!            negative → skip (error)
//!            else     → set_price(pair, QuotePrice{price, height, time})
//! ```
//!
//! ## Guarantees
//!
//! - A block without transactions changes nothing and is not an error.
//! - Malformed payloads fail the whole step; entries are never skipped
//!   silently.
//! - A store write failure aborts the pass and is returned.
//! - The pass is a pure function of the block and the registered pairs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::InMemoryPriceStore;
pub use domain::{decode_oracle_tx, parse_prices, CommitSummary};
pub use error::{CommitError, Result, StoreError};
pub use ports::{NoopUpgradeHook, PreBlocker, PriceStore, UpgradeHook};
pub use service::BlockPriceCommitter;
