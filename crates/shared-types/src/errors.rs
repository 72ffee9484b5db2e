//! # Error Types
//!
//! Errors raised while parsing shared domain values.

use thiserror::Error;

/// Errors that can occur when parsing a currency pair or a price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// The pair is not of the form `BASE/QUOTE`.
    #[error("incorrectly formatted currency pair: {0}")]
    MalformedCurrencyPair(String),

    /// One side of the pair is empty.
    #[error("empty ticker in currency pair: {0}")]
    EmptyTicker(String),

    /// The price is not a base-10 integer.
    #[error("failed to convert price string to integer: {0}")]
    InvalidPrice(String),
}

/// Errors that can occur when decoding a wire message.
#[derive(Debug, Clone, Error)]
pub enum WireError {
    /// Protobuf decoding failed.
    #[error("failed to unmarshal prices: {0}")]
    Decode(#[from] prost::DecodeError),
}
