//! Oracle payload decoding
//!
//! Transaction 0 of a block carries the framed `(prices, report)` pair.
//! Execution decodes the frame and parses the first field; the report is
//! not re-verified here, so block execution stays deterministic and offline.

use std::collections::BTreeMap;

use num::BigInt;
use shared_types::{parse_price, CurrencyPair, QueryPricesResponse, RawPriceSet};

use crate::error::Result;

/// Prices parsed from the payload, keyed by pair. Values may be negative.
pub type ParsedPrices = BTreeMap<CurrencyPair, BigInt>;

/// Decode the oracle transaction into the price response it carries.
pub fn decode_oracle_tx(tx: &[u8]) -> Result<QueryPricesResponse> {
    let (prices, _report) = ao_01_framing::decode(tx)?;
    Ok(QueryPricesResponse::unmarshal(prices)?)
}

/// Parse every entry of a raw price set.
///
/// Any malformed pair or price fails the whole set; nothing is skipped.
pub fn parse_prices(raw: &RawPriceSet) -> Result<ParsedPrices> {
    raw.iter()
        .map(|(pair, price)| Ok((pair.parse::<CurrencyPair>()?, parse_price(price)?)))
        .collect()
}
