//! Outbound ports (driven side - SPI)

use crate::error::Result;
use async_trait::async_trait;
use shared_types::{QueryPricesRequest, QueryPricesResponse};

/// Port: Oracle price service connection
#[async_trait]
pub trait OracleConnection: Send + Sync {
    /// Establish the connection. Called once at startup and again by the
    /// refresh task after a failed health query.
    async fn start(&self) -> Result<()>;

    /// Query current prices.
    async fn prices(&self, request: QueryPricesRequest) -> Result<QueryPricesResponse>;
}

/// Price response together with the report the enclave attached to it.
#[derive(Clone, Debug, PartialEq)]
pub struct AttestedPrices {
    /// Price response as received.
    pub response: QueryPricesResponse,
    /// Enclave report bound to the marshalled response, if one was sent.
    pub report: Option<Vec<u8>>,
}

/// Port: Oracle connection able to return a side-channel attestation report
#[async_trait]
pub trait SideChannelOracle: OracleConnection {
    /// Query prices and collect the attached report.
    async fn prices_with_report(&self, request: QueryPricesRequest) -> Result<AttestedPrices>;
}

/// Extension bytes produced for one batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchExtension {
    /// Bytes placed first in the batch.
    pub head: Vec<u8>,
    /// Bytes placed last in the batch.
    pub tail: Vec<u8>,
}

impl BatchExtension {
    /// True when neither side carries data.
    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.tail.is_empty()
    }
}

/// Port: Sequencer batch consumer
#[async_trait]
pub trait BatchSink: Send + Sync {
    /// Hand one batch extension to the sequencer.
    async fn submit(&self, extension: BatchExtension) -> Result<()>;
}
