//! In-process oracle connections
//!
//! `StaticOracle` serves a fixed price set and, when given an enclave,
//! attests each response the way the enclave-side oracle server does:
//! SHA-256 over the marshalled response, report bound to that hash.
//! `StallingOracle` never answers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use ao_02_attestation::SyntheticEnclave;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{QueryPricesRequest, QueryPricesResponse, RawPriceSet};

use crate::error::{OracleError, Result};
use crate::ports::{AttestedPrices, OracleConnection, SideChannelOracle};

/// Oracle serving a configurable price set.
pub struct StaticOracle {
    prices: RwLock<RawPriceSet>,
    enclave: Option<SyntheticEnclave>,
    failing: AtomicBool,
    starts: AtomicUsize,
}

impl StaticOracle {
    /// Serve `prices` without attesting them.
    pub fn new<K, V>(prices: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prices: RwLock::new(
                prices
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            enclave: None,
            failing: AtomicBool::new(false),
            starts: AtomicUsize::new(0),
        }
    }

    /// Attach a report produced by `enclave` to every response.
    pub fn attested_by(mut self, enclave: SyntheticEnclave) -> Self {
        self.enclave = Some(enclave);
        self
    }

    /// Replace the served prices.
    pub fn set_prices(&self, prices: RawPriceSet) {
        *self.prices.write() = prices;
    }

    /// Make queries fail with a connection error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of `start` calls so far.
    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    fn response(&self) -> QueryPricesResponse {
        QueryPricesResponse {
            prices: self.prices.read().clone(),
            timestamp: None,
            version: String::new(),
        }
    }
}

#[async_trait]
impl OracleConnection for StaticOracle {
    async fn start(&self) -> Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn prices(&self, _request: QueryPricesRequest) -> Result<QueryPricesResponse> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(OracleError::Connection("static oracle offline".into()));
        }
        Ok(self.response())
    }
}

#[async_trait]
impl SideChannelOracle for StaticOracle {
    async fn prices_with_report(&self, request: QueryPricesRequest) -> Result<AttestedPrices> {
        let response = self.prices(request).await?;
        let report = match &self.enclave {
            Some(enclave) => Some(
                enclave
                    .attest(&response.marshal())
                    .map_err(|e| OracleError::Connection(e.to_string()))?,
            ),
            None => None,
        };
        Ok(AttestedPrices { response, report })
    }
}

/// Oracle whose queries never complete.
#[derive(Debug, Default)]
pub struct StallingOracle;

#[async_trait]
impl OracleConnection for StallingOracle {
    async fn start(&self) -> Result<()> {
        Ok(())
    }

    async fn prices(&self, _request: QueryPricesRequest) -> Result<QueryPricesResponse> {
        std::future::pending().await
    }
}

#[async_trait]
impl SideChannelOracle for StallingOracle {
    async fn prices_with_report(&self, _request: QueryPricesRequest) -> Result<AttestedPrices> {
        std::future::pending().await
    }
}
