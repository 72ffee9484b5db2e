//! # Price Propagation Flows
//!
//! End-to-end path of a price update:
//!
//! 1. **Oracle → Producer (ao-03)**: prices and enclave report are queried
//! 2. **Producer → Verifier (ao-02)**: the report is bound to the prices
//! 3. **Producer → Framing (ao-01)**: `(prices, report)` becomes the batch head
//! 4. **Block → Committer (ao-04)**: transaction 0 is decoded and written
//!    to the price store at the block's height and time

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use num::BigUint;

    use ao_02_attestation::{
        AttestationVerifier, SyntheticBackend, SyntheticEnclave, VerificationPolicy,
    };
    use ao_03_oracle_producer::{
        BatchExtender, OracleBatchExtender, OracleReportProducer, OracleSource, ProducerConfig,
        StallingOracle, StaticOracle,
    };
    use ao_04_price_committer::{
        BlockPriceCommitter, CommitError, InMemoryPriceStore, NoopUpgradeHook, PreBlocker,
    };
    use shared_types::{BlockContext, CurrencyPair, ExecMode, FinalizeBlockRequest};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const SIGNER: [u8; 32] = [0x36; 32];

    type Extender = OracleBatchExtender<AttestationVerifier<SyntheticBackend>>;

    fn pair(s: &str) -> CurrencyPair {
        s.parse().unwrap()
    }

    fn extender(source: OracleSource) -> Extender {
        let verifier = Arc::new(AttestationVerifier::new(
            Arc::new(SyntheticBackend::new()),
            VerificationPolicy::new(SIGNER.to_vec()),
        ));
        let producer = OracleReportProducer::new(source, verifier, ProducerConfig::default());
        OracleBatchExtender::new(Arc::new(producer))
    }

    fn attested_oracle(prices: &[(&str, &str)]) -> Arc<StaticOracle> {
        Arc::new(
            StaticOracle::new(prices.iter().copied())
                .attested_by(SyntheticEnclave::new(SIGNER.to_vec())),
        )
    }

    fn store(pairs: &[&str]) -> Arc<InMemoryPriceStore> {
        Arc::new(InMemoryPriceStore::with_pairs(pairs.iter().map(|p| pair(p))))
    }

    fn committer(
        store: Arc<InMemoryPriceStore>,
    ) -> BlockPriceCommitter<InMemoryPriceStore, NoopUpgradeHook> {
        BlockPriceCommitter::new(store, Arc::new(NoopUpgradeHook))
    }

    fn block(height: u64, txs: Vec<Vec<u8>>) -> (BlockContext, FinalizeBlockRequest) {
        let time = Utc.timestamp_opt(1_700_000_000 + height as i64, 0).unwrap();
        (
            BlockContext::finalize(height, time),
            FinalizeBlockRequest { height, txs },
        )
    }

    // =============================================================================
    // PRODUCER → COMMITTER
    // =============================================================================

    #[tokio::test]
    async fn test_attested_prices_reach_the_store() {
        let oracle = attested_oracle(&[
            ("BTC/USD", "6500000"),
            ("ETH/USD", "300000"),
            ("SOL/USD", "-1"),
            ("XRP/USD", "5"),
        ]);
        let head = extender(OracleSource::with_side_channel(oracle))
            .head(0)
            .await
            .unwrap();
        assert!(!head.is_empty());

        let store = store(&["BTC/USD", "ETH/USD", "SOL/USD", "DOGE/USD"]);
        let committer = committer(store.clone());
        let (ctx, request) = block(10, vec![head, b"user-tx".to_vec()]);

        committer.pre_block(&ctx, Some(&request)).unwrap();

        let btc = store.price(&pair("BTC/USD")).unwrap();
        assert_eq!(btc.price, BigUint::from(6_500_000u64));
        assert_eq!(btc.block_height, 10);
        assert_eq!(btc.block_timestamp, ctx.time);
        assert_eq!(
            store.price(&pair("ETH/USD")).unwrap().price,
            BigUint::from(300_000u64)
        );
        // Negative and unquoted pairs are skipped; unregistered quotes ignored.
        assert!(store.price(&pair("SOL/USD")).is_none());
        assert!(store.price(&pair("DOGE/USD")).is_none());
        assert_eq!(store.prices().len(), 2);
    }

    #[tokio::test]
    async fn test_later_block_overwrites_earlier_price() {
        let oracle = attested_oracle(&[("BTC/USD", "100")]);
        let extender = extender(OracleSource::with_side_channel(oracle.clone()));
        let store = store(&["BTC/USD"]);
        let committer = committer(store.clone());

        let (ctx, request) = block(1, vec![extender.head(0).await.unwrap()]);
        committer.pre_block(&ctx, Some(&request)).unwrap();

        oracle.set_prices([("BTC/USD".to_string(), "200".to_string())].into());
        let (ctx, request) = block(2, vec![extender.head(0).await.unwrap()]);
        committer.pre_block(&ctx, Some(&request)).unwrap();

        let btc = store.price(&pair("BTC/USD")).unwrap();
        assert_eq!(btc.price, BigUint::from(200u64));
        assert_eq!(btc.block_height, 2);
    }

    #[tokio::test]
    async fn test_replay_on_another_node_is_identical() {
        let oracle = attested_oracle(&[("BTC/USD", "100"), ("ETH/USD", "7")]);
        let head = extender(OracleSource::with_side_channel(oracle))
            .head(0)
            .await
            .unwrap();
        let (ctx, request) = block(42, vec![head]);

        let first = store(&["BTC/USD", "ETH/USD"]);
        let second = store(&["ETH/USD", "BTC/USD"]);
        committer(first.clone()).pre_block(&ctx, Some(&request)).unwrap();
        committer(second.clone()).pre_block(&ctx, Some(&request)).unwrap();

        assert_eq!(first.prices(), second.prices());
    }

    #[tokio::test]
    async fn test_simulation_mode_writes_like_finalize() {
        let oracle = attested_oracle(&[("BTC/USD", "100")]);
        let head = extender(OracleSource::with_side_channel(oracle))
            .head(0)
            .await
            .unwrap();
        let store = store(&["BTC/USD"]);
        let (mut ctx, request) = block(3, vec![head]);
        ctx.mode = ExecMode::Simulate;

        committer(store.clone())
            .pre_block(&ctx, Some(&request))
            .unwrap();
        assert!(store.price(&pair("BTC/USD")).is_some());
    }

    // =============================================================================
    // NO-EXTENSION ROUNDS
    // =============================================================================

    #[tokio::test]
    async fn test_empty_oracle_leaves_prices_untouched() {
        let store = store(&["BTC/USD"]);
        let committer = committer(store.clone());

        let oracle = attested_oracle(&[("BTC/USD", "100")]);
        let extender = extender(OracleSource::with_side_channel(oracle.clone()));
        let (ctx, request) = block(1, vec![extender.head(0).await.unwrap()]);
        committer.pre_block(&ctx, Some(&request)).unwrap();

        oracle.set_prices(Default::default());
        let head = extender.head(0).await.unwrap();
        assert!(head.is_empty());

        // A batch without an extension produces a block without the oracle tx.
        let (ctx, request) = block(2, Vec::new());
        committer.pre_block(&ctx, Some(&request)).unwrap();
        assert_eq!(store.price(&pair("BTC/USD")).unwrap().block_height, 1);
    }

    #[tokio::test]
    async fn test_empty_head_as_first_tx_keeps_block_valid() {
        let store = store(&["BTC/USD"]);
        let committer = committer(store.clone());

        let oracle = attested_oracle(&[("BTC/USD", "100")]);
        let extender = extender(OracleSource::with_side_channel(oracle.clone()));
        let (ctx, request) = block(1, vec![extender.head(0).await.unwrap()]);
        committer.pre_block(&ctx, Some(&request)).unwrap();

        oracle.set_prices(Default::default());
        let head = extender.head(0).await.unwrap();
        assert!(head.is_empty());

        let (ctx, request) = block(2, vec![head, b"user-tx".to_vec()]);
        committer.pre_block(&ctx, Some(&request)).unwrap();
        assert_eq!(store.price(&pair("BTC/USD")).unwrap().block_height, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_oracle_times_out_with_empty_head() {
        let extender = extender(OracleSource::with_side_channel(Arc::new(StallingOracle)));

        let started = tokio::time::Instant::now();
        let head = extender.head(0).await.unwrap();

        assert!(head.is_empty());
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_plain_connection_never_extends() {
        let oracle = attested_oracle(&[("BTC/USD", "100")]);
        let extender = extender(OracleSource::plain(oracle));
        assert!(extender.head(0).await.unwrap().is_empty());
        assert!(extender.tail(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_extension_dropped() {
        let oracle = attested_oracle(&[("BTC/USD", "100")]);
        let extender = extender(OracleSource::with_side_channel(oracle));
        let full = extender.head(0).await.unwrap();

        assert!(extender.head(full.len() as u64 - 1).await.unwrap().is_empty());
        assert_eq!(extender.head(full.len() as u64).await.unwrap(), full);
    }

    // =============================================================================
    // MALFORMED BLOCKS
    // =============================================================================

    #[test]
    fn test_block_with_unframed_first_tx_fails() {
        let store = store(&["BTC/USD"]);
        let (ctx, request) = block(5, vec![b"not an oracle tx".to_vec()]);
        let result = committer(store.clone()).pre_block(&ctx, Some(&request));

        assert!(matches!(result, Err(CommitError::Framing(_))));
        assert!(store.prices().is_empty());
    }

    #[test]
    fn test_missing_request_fails() {
        let store = store(&["BTC/USD"]);
        let (ctx, _) = block(5, Vec::new());
        assert!(matches!(
            committer(store).pre_block(&ctx, None),
            Err(CommitError::MissingRequest { height: 5 })
        ));
    }
}
