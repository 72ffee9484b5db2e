//! # Shared Types Crate
//!
//! Domain entities and wire messages exchanged between the sequencing side
//! (which pulls attested prices from the oracle) and the execution side
//! (which commits them to chain state during block finalization).
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `CurrencyPair` and `QuotePrice` are defined
//!   once and used by both the producer and the committer.
//! - **Canonical Forms**: a currency pair's string form round-trips through
//!   [`CurrencyPair::from_str`](std::str::FromStr).
//! - **Non-negative Prices**: `QuotePrice::price` is a `BigUint`; a negative
//!   price cannot be represented at the point of commit.

pub mod block;
pub mod entities;
pub mod errors;
pub mod wire;

pub use block::*;
pub use entities::*;
pub use errors::*;
pub use wire::*;
