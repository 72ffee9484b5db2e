//! Batch extension hook handed to the sequencer

use std::sync::Arc;

use ao_02_attestation::ReportVerifier;
use async_trait::async_trait;

use crate::error::Result;
use crate::ports::BatchExtender;
use crate::service::OracleReportProducer;

/// `head` carries the attested oracle extension; `tail` is reserved and
/// always empty.
pub struct OracleBatchExtender<V: ReportVerifier + ?Sized> {
    producer: Arc<OracleReportProducer<V>>,
}

impl<V: ReportVerifier + ?Sized> OracleBatchExtender<V> {
    /// Wrap a producer.
    pub fn new(producer: Arc<OracleReportProducer<V>>) -> Self {
        Self { producer }
    }
}

#[async_trait]
impl<V: ReportVerifier + ?Sized> BatchExtender for OracleBatchExtender<V> {
    async fn head(&self, max_bytes: u64) -> Result<Vec<u8>> {
        self.producer.produce_extension(max_bytes).await
    }

    async fn tail(&self, _max_bytes: u64) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}
