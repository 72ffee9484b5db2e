//! # Oracle Report Producer Service
//!
//! One round: query prices and report, verify the report against the
//! marshalled prices, frame `(prices, report)`. The whole round runs under
//! the configured deadline.
//!
//! Routine absence of data never fails the round: a timeout, a failed
//! query, an empty price set, a missing report or an unsupported connection
//! all yield an empty extension. Verification failure follows
//! [`FailurePolicy`].

use std::sync::Arc;

use ao_02_attestation::ReportVerifier;
use oracle_telemetry::{time_histogram, ORACLE_EXTENSIONS, ORACLE_EXTENSION_DURATION};
use shared_types::QueryPricesRequest;
use tracing::{debug, error, info, warn};

use crate::config::{FailurePolicy, ProducerConfig};
use crate::domain::{ExtensionOutcome, OracleSource};
use crate::error::{OracleError, Result};

/// Produces attested oracle extensions.
pub struct OracleReportProducer<V: ReportVerifier + ?Sized> {
    source: OracleSource,
    verifier: Arc<V>,
    config: ProducerConfig,
}

impl<V: ReportVerifier + ?Sized> OracleReportProducer<V> {
    /// Create a producer.
    pub fn new(source: OracleSource, verifier: Arc<V>, config: ProducerConfig) -> Self {
        Self {
            source,
            verifier,
            config,
        }
    }

    /// The oracle source this producer queries.
    pub fn source(&self) -> &OracleSource {
        &self.source
    }

    /// Produce the extension for one batch.
    ///
    /// `max_bytes == 0` means no size limit.
    pub async fn produce_extension(&self, max_bytes: u64) -> Result<Vec<u8>> {
        let _timer = time_histogram!(ORACLE_EXTENSION_DURATION);

        let (outcome, result) =
            match tokio::time::timeout(self.config.query_timeout, self.round(max_bytes)).await {
                Ok(round) => round,
                Err(_) => {
                    warn!(
                        timeout_ms = self.config.query_timeout.as_millis() as u64,
                        "[ao-03] Oracle round timed out, no extension this batch"
                    );
                    (ExtensionOutcome::Timeout, Ok(Vec::new()))
                }
            };

        ORACLE_EXTENSIONS.with_label_values(&[outcome.label()]).inc();
        result
    }

    async fn round(&self, max_bytes: u64) -> (ExtensionOutcome, Result<Vec<u8>>) {
        let Some(oracle) = self.source.side_channel() else {
            debug!("[ao-03] Oracle connection does not support reports");
            return (ExtensionOutcome::Unsupported, Ok(Vec::new()));
        };

        let attested = match oracle.prices_with_report(QueryPricesRequest::default()).await {
            Ok(attested) => attested,
            Err(e) => {
                warn!(error = %e, "[ao-03] Oracle query failed, no extension this batch");
                return (ExtensionOutcome::Empty, Ok(Vec::new()));
            }
        };

        if attested.response.prices.is_empty() {
            debug!("[ao-03] Oracle returned no prices");
            return (ExtensionOutcome::NoPrices, Ok(Vec::new()));
        }

        let Some(report) = attested.report else {
            warn!("[ao-03] Oracle response carries no enclave report");
            return (ExtensionOutcome::Empty, Ok(Vec::new()));
        };

        let prices = attested.response.marshal();
        if let Err(e) = self.verifier.verify(&report, &prices).await {
            return match self.config.on_attestation_failure {
                FailurePolicy::DropRound => {
                    error!(error = %e, "[ao-03] Oracle report failed verification, dropping round");
                    (ExtensionOutcome::AttestationFailed, Ok(Vec::new()))
                }
                FailurePolicy::Halt => {
                    error!(error = %e, "[ao-03] Oracle report failed verification, halting");
                    (
                        ExtensionOutcome::AttestationFailed,
                        Err(OracleError::Attestation(e)),
                    )
                }
            };
        }

        if prices.len().max(report.len()) > ao_01_framing::MAX_FIELD_LEN {
            warn!(
                prices = prices.len(),
                report = report.len(),
                "[ao-03] Extension cannot be framed"
            );
            return (ExtensionOutcome::TooLarge, Ok(Vec::new()));
        }
        let framed = ao_01_framing::encode(&prices, &report);

        if max_bytes > 0 && framed.len() as u64 > max_bytes {
            warn!(
                size = framed.len(),
                max_bytes, "[ao-03] Extension exceeds batch limit, dropping round"
            );
            return (ExtensionOutcome::TooLarge, Ok(Vec::new()));
        }

        info!(
            pairs = attested.response.prices.len(),
            size = framed.len(),
            "[ao-03] Verified oracle prices attached to batch"
        );
        (ExtensionOutcome::Attached, Ok(framed))
    }
}
