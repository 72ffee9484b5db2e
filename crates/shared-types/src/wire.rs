//! # Oracle Wire Messages
//!
//! Protobuf messages of the oracle price service
//! (`connect.service.oracle.v2.Oracle/Prices`). The response is the payload
//! whose SHA-256 digest the enclave binds into its attestation report, so
//! its encoding must be byte-stable: prices are kept in a `BTreeMap`, which
//! encodes map entries in sorted key order.

use std::collections::BTreeMap;

use prost::Message;

use crate::errors::WireError;

/// Currency-pair string to decimal price string, as received over the wire.
pub type RawPriceSet = BTreeMap<String, String>;

/// Request for the current price set. Carries no fields.
#[derive(Clone, Copy, PartialEq, Message)]
pub struct QueryPricesRequest {}

/// Current aggregated prices reported by the oracle.
#[derive(Clone, PartialEq, Message)]
pub struct QueryPricesResponse {
    /// Prices keyed by currency-pair string form.
    #[prost(btree_map = "string, string", tag = "1")]
    pub prices: RawPriceSet,
    /// Time the oracle last updated the price set.
    #[prost(message, optional, tag = "2")]
    pub timestamp: Option<prost_types::Timestamp>,
    /// Oracle version string.
    #[prost(string, tag = "3")]
    pub version: String,
}

impl QueryPricesResponse {
    /// Canonical protobuf encoding.
    pub fn marshal(&self) -> Vec<u8> {
        self.encode_to_vec()
    }

    /// Decode from protobuf bytes.
    pub fn unmarshal(bytes: &[u8]) -> Result<Self, WireError> {
        Ok(Self::decode(bytes)?)
    }
}
