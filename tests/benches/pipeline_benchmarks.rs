//! # Attested Oracle Pipeline Benchmarks
//!
//! | Stage | Work per batch/block | Target |
//! |-------|----------------------|--------|
//! | ao-01 Framing | encode + decode of the oracle tx | < 10µs |
//! | ao-02 Attestation | synthetic report verification | < 100µs |
//! | ao-04 Committer | commit pass over registered pairs | < 1ms for 100 pairs |

use std::sync::Arc;
use std::time::Duration;

use ao_02_attestation::{
    AttestationVerifier, ReportVerifier, SyntheticBackend, SyntheticEnclave, VerificationPolicy,
};
use ao_04_price_committer::{BlockPriceCommitter, InMemoryPriceStore, NoopUpgradeHook};
use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_types::{BlockContext, CurrencyPair, QueryPricesResponse};

fn response(pairs: usize) -> QueryPricesResponse {
    QueryPricesResponse {
        prices: (0..pairs)
            .map(|i| (format!("T{i}/USD"), format!("{}", 1_000_000 + i)))
            .collect(),
        timestamp: None,
        version: String::new(),
    }
}

// ============================================================================
// AO-01: Framing
// ============================================================================

fn bench_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ao-01-framing");
    let report = vec![0xAB; 4_700];

    for pairs in [1, 10, 100] {
        let prices = response(pairs).marshal();
        let framed = ao_01_framing::encode(&prices, &report);

        group.throughput(Throughput::Bytes(framed.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", pairs), &prices, |b, prices| {
            b.iter(|| ao_01_framing::encode(black_box(prices), black_box(&report)))
        });
        group.bench_with_input(BenchmarkId::new("decode", pairs), &framed, |b, framed| {
            b.iter(|| ao_01_framing::decode(black_box(framed)))
        });
    }

    group.finish();
}

// ============================================================================
// AO-02: Attestation
// ============================================================================

fn bench_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("ao-02-attestation");
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let signer = vec![0x36; 32];
    let verifier = AttestationVerifier::new(
        Arc::new(SyntheticBackend::new()),
        VerificationPolicy::new(signer.clone()),
    );
    let payload = response(10).marshal();
    let report = SyntheticEnclave::new(signer).attest(&payload).unwrap();

    group.bench_function("synthetic_verify", |b| {
        b.iter(|| {
            runtime
                .block_on(verifier.verify(black_box(&report), black_box(&payload)))
                .is_ok()
        })
    });

    group.finish();
}

// ============================================================================
// AO-04: Price Committer
// ============================================================================

fn bench_commit_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("ao-04-price-committer");
    group.measurement_time(Duration::from_secs(5));

    for pairs in [10, 100] {
        let response = response(pairs);
        let tx = ao_01_framing::encode(&response.marshal(), b"report");
        let store = Arc::new(InMemoryPriceStore::with_pairs(
            response
                .prices
                .keys()
                .map(|k| k.parse::<CurrencyPair>().unwrap()),
        ));
        let committer = BlockPriceCommitter::new(store, Arc::new(NoopUpgradeHook));
        let ctx = BlockContext::finalize(1, Utc::now());
        let txs = vec![tx];

        group.throughput(Throughput::Elements(pairs as u64));
        group.bench_with_input(BenchmarkId::new("commit_prices", pairs), &txs, |b, txs| {
            b.iter(|| committer.commit_prices(black_box(&ctx), black_box(txs)).is_ok())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_framing,
    bench_verification,
    bench_commit_pass
);
criterion_main!(benches);
