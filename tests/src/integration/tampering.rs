//! # Tampering Scenarios
//!
//! A relay between the enclave and the sequencer must not be able to get
//! altered prices into a batch:
//!
//! - prices rewritten after attestation
//! - a genuine report replayed for a different response
//! - reports from enclaves the policy does not trust
//!
//! Each case must end in an empty extension (drop-round policy) or a
//! returned error (halt policy), never in a framed payload.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use ao_02_attestation::{
        AttestationError, AttestationVerifier, BackendError, ReportVerifier, SyntheticBackend,
        SyntheticEnclave, TcbStatus, VerificationPolicy,
    };
    use ao_03_oracle_producer::{
        AttestedPrices, BatchExtender, FailurePolicy, OracleBatchExtender, OracleConnection,
        OracleError, OracleReportProducer, OracleSource, ProducerConfig, SideChannelOracle,
    };
    use shared_types::{QueryPricesRequest, QueryPricesResponse, RawPriceSet};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const SIGNER: [u8; 32] = [0x36; 32];

    fn prices(entries: &[(&str, &str)]) -> RawPriceSet {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn response(entries: &[(&str, &str)]) -> QueryPricesResponse {
        QueryPricesResponse {
            prices: prices(entries),
            timestamp: None,
            version: String::new(),
        }
    }

    /// Relay that attests one response and forwards another.
    struct TamperingOracle {
        enclave: SyntheticEnclave,
        attested: QueryPricesResponse,
        forwarded: QueryPricesResponse,
    }

    #[async_trait]
    impl OracleConnection for TamperingOracle {
        async fn start(&self) -> ao_03_oracle_producer::Result<()> {
            Ok(())
        }

        async fn prices(
            &self,
            _request: QueryPricesRequest,
        ) -> ao_03_oracle_producer::Result<QueryPricesResponse> {
            Ok(self.forwarded.clone())
        }
    }

    #[async_trait]
    impl SideChannelOracle for TamperingOracle {
        async fn prices_with_report(
            &self,
            _request: QueryPricesRequest,
        ) -> ao_03_oracle_producer::Result<AttestedPrices> {
            let report = self
                .enclave
                .attest(&self.attested.marshal())
                .map_err(|e| OracleError::Connection(e.to_string()))?;
            Ok(AttestedPrices {
                response: self.forwarded.clone(),
                report: Some(report),
            })
        }
    }

    fn verifier() -> Arc<AttestationVerifier<SyntheticBackend>> {
        Arc::new(AttestationVerifier::new(
            Arc::new(SyntheticBackend::new()),
            VerificationPolicy::new(SIGNER.to_vec()),
        ))
    }

    fn extender(
        oracle: TamperingOracle,
        policy: FailurePolicy,
    ) -> OracleBatchExtender<AttestationVerifier<SyntheticBackend>> {
        let config = ProducerConfig {
            on_attestation_failure: policy,
            ..ProducerConfig::default()
        };
        let producer = OracleReportProducer::new(
            OracleSource::with_side_channel(Arc::new(oracle)),
            verifier(),
            config,
        );
        OracleBatchExtender::new(Arc::new(producer))
    }

    fn rewritten_prices() -> TamperingOracle {
        TamperingOracle {
            enclave: SyntheticEnclave::new(SIGNER.to_vec()),
            attested: response(&[("BTC/USD", "100")]),
            forwarded: response(&[("BTC/USD", "1")]),
        }
    }

    // =============================================================================
    // RELAY TAMPERING
    // =============================================================================

    #[tokio::test]
    async fn test_rewritten_prices_dropped() {
        let head = extender(rewritten_prices(), FailurePolicy::DropRound)
            .head(0)
            .await
            .unwrap();
        assert!(head.is_empty());
    }

    #[tokio::test]
    async fn test_rewritten_prices_halt() {
        let result = extender(rewritten_prices(), FailurePolicy::Halt)
            .head(0)
            .await;
        assert!(matches!(
            result,
            Err(OracleError::Attestation(AttestationError::BindingMismatch { .. }))
        ));
    }

    #[tokio::test]
    async fn test_added_pair_rejected() {
        let oracle = TamperingOracle {
            enclave: SyntheticEnclave::new(SIGNER.to_vec()),
            attested: response(&[("BTC/USD", "100")]),
            forwarded: response(&[("BTC/USD", "100"), ("ETH/USD", "1")]),
        };
        let result = extender(oracle, FailurePolicy::Halt).head(0).await;
        assert!(matches!(result, Err(OracleError::Attestation(_))));
    }

    #[tokio::test]
    async fn test_untrusted_enclave_rejected() {
        let oracle = TamperingOracle {
            enclave: SyntheticEnclave::new(vec![0xEE; 32]),
            attested: response(&[("BTC/USD", "100")]),
            forwarded: response(&[("BTC/USD", "100")]),
        };
        let result = extender(oracle, FailurePolicy::Halt).head(0).await;
        assert!(matches!(
            result,
            Err(OracleError::Attestation(AttestationError::UntrustedSigner { .. }))
        ));
    }

    #[tokio::test]
    async fn test_honest_relay_attaches() {
        let honest = response(&[("BTC/USD", "100")]);
        let oracle = TamperingOracle {
            enclave: SyntheticEnclave::new(SIGNER.to_vec()),
            attested: honest.clone(),
            forwarded: honest.clone(),
        };
        let head = extender(oracle, FailurePolicy::Halt).head(0).await.unwrap();

        let (payload, report) = ao_01_framing::decode(&head).unwrap();
        assert_eq!(payload, honest.marshal().as_slice());
        verifier().verify(report, payload).await.unwrap();
    }

    // =============================================================================
    // ENCLAVE POLICY
    // =============================================================================

    #[tokio::test]
    async fn test_enclave_policy_violations() {
        let payload = response(&[("BTC/USD", "100")]).marshal();
        let verifier = verifier();

        let stale = SyntheticEnclave::new(SIGNER.to_vec()).with_security_version(0);
        assert!(matches!(
            verifier
                .verify(&stale.attest(&payload).unwrap(), &payload)
                .await,
            Err(AttestationError::StaleEnclave { actual: 0, minimum: 1 })
        ));

        let other_product = SyntheticEnclave::new(SIGNER.to_vec()).with_product_id(2);
        assert!(matches!(
            verifier
                .verify(&other_product.attest(&payload).unwrap(), &payload)
                .await,
            Err(AttestationError::WrongProduct { expected: 1, .. })
        ));

        let debug = SyntheticEnclave::new(SIGNER.to_vec()).with_debug(true);
        assert!(matches!(
            verifier
                .verify(&debug.attest(&payload).unwrap(), &payload)
                .await,
            Err(AttestationError::DebugEnclave)
        ));
    }

    #[tokio::test]
    async fn test_degraded_tcb_only_with_opt_in() {
        let payload = response(&[("BTC/USD", "100")]).marshal();
        let report = SyntheticEnclave::new(SIGNER.to_vec())
            .with_tcb_status(TcbStatus::OutOfDate)
            .attest(&payload)
            .unwrap();

        assert!(matches!(
            verifier().verify(&report, &payload).await,
            Err(AttestationError::DegradedTcb {
                status: TcbStatus::OutOfDate
            })
        ));

        let tolerant = AttestationVerifier::new(
            Arc::new(SyntheticBackend::new()),
            VerificationPolicy::new(SIGNER.to_vec()).with_accept_degraded_tcb(true),
        );
        tolerant.verify(&report, &payload).await.unwrap();
    }

    #[tokio::test]
    async fn test_revoked_never_tolerated() {
        let payload = response(&[("BTC/USD", "100")]).marshal();
        let report = SyntheticEnclave::new(SIGNER.to_vec())
            .with_tcb_status(TcbStatus::Revoked)
            .attest(&payload)
            .unwrap();
        let tolerant = AttestationVerifier::new(
            Arc::new(SyntheticBackend::new()),
            VerificationPolicy::new(SIGNER.to_vec()).with_accept_degraded_tcb(true),
        );

        assert!(matches!(
            tolerant.verify(&report, &payload).await,
            Err(AttestationError::Backend(BackendError::Rejected(_)))
        ));
    }
}
