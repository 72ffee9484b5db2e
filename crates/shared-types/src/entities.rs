//! # Core Domain Entities
//!
//! Currency pairs and the quote prices stored against them.

use chrono::{DateTime, Utc};
use num::{BigInt, BigUint, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::TypesError;

/// Separator between the base and quote symbols in the canonical string form.
pub const CURRENCY_PAIR_SEPARATOR: char = '/';

/// A tradable asset pair, e.g. `BTC/USD`.
///
/// Both symbols are stored upper-cased, so the string form produced by
/// `Display` parses back into an equal value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    base: String,
    quote: String,
}

impl CurrencyPair {
    /// Build a pair from its two symbols, normalising them to upper case.
    pub fn new(base: &str, quote: &str) -> Result<Self, TypesError> {
        let base = base.to_uppercase();
        let quote = quote.to_uppercase();
        if base.is_empty() || quote.is_empty() {
            return Err(TypesError::EmptyTicker(format!(
                "{base}{CURRENCY_PAIR_SEPARATOR}{quote}"
            )));
        }
        Ok(Self { base, quote })
    }

    /// The asset being priced.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The asset the price is denominated in.
    pub fn quote(&self) -> &str {
        &self.quote
    }
}

impl FromStr for CurrencyPair {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(CURRENCY_PAIR_SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(base), Some(quote), None) => Self::new(base, quote),
            _ => Err(TypesError::MalformedCurrencyPair(s.to_string())),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.base, CURRENCY_PAIR_SEPARATOR, self.quote)
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.to_string()
    }
}

/// A price observation committed to chain state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotePrice {
    /// Price scaled to the pair's decimals. Never negative.
    pub price: BigUint,
    /// Height of the block that committed the price.
    pub block_height: u64,
    /// Timestamp of the block that committed the price.
    pub block_timestamp: DateTime<Utc>,
}

impl QuotePrice {
    /// Floating-point approximation of the price, for metrics only.
    pub fn approximate(&self) -> f64 {
        self.price.to_f64().unwrap_or(f64::MAX)
    }
}

/// Parse a base-10 integer price, which may carry a leading sign.
///
/// Only an optional `+`/`-` followed by ASCII digits is accepted; the sign is
/// preserved so callers can decide what to do with negative values.
pub fn parse_price(raw: &str) -> Result<BigInt, TypesError> {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TypesError::InvalidPrice(raw.to_string()));
    }
    BigInt::parse_bytes(raw.as_bytes(), 10).ok_or_else(|| TypesError::InvalidPrice(raw.to_string()))
}
