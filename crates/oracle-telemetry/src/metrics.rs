//! Prometheus metrics for attested oracle propagation.
//!
//! All metrics follow the naming convention: `ao_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., prices_committed_total)
//! - **Gauge**: Value that can go up or down (e.g., oracle_price)
//! - **Histogram**: Distribution of values (e.g., preblock_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, GaugeVec, Histogram, HistogramOpts,
    HistogramVec, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // ORACLE PRODUCER METRICS (ao-03)
    // =========================================================================

    /// Time spent producing one batch extension
    pub static ref ORACLE_EXTENSION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "ao_oracle_extension_duration_seconds",
            "Time spent producing the oracle batch extension"
        ).buckets(exponential_buckets(0.001, 2.0, 13).expect("valid buckets"))
    ).expect("metric creation failed");

    /// Extension rounds by outcome
    pub static ref ORACLE_EXTENSIONS: CounterVec = CounterVec::new(
        Opts::new("ao_oracle_extensions_total", "Oracle extension rounds by outcome"),
        &["outcome"]  // attached/empty/timeout/no_prices/attestation_failed/too_large/unsupported
    ).expect("metric creation failed");

    /// Background oracle connection health (1 = up)
    pub static ref ORACLE_CONNECTION_UP: Gauge = Gauge::new(
        "ao_oracle_connection_up",
        "Whether the last oracle health query succeeded"
    ).expect("metric creation failed");

    // =========================================================================
    // ATTESTATION METRICS (ao-02)
    // =========================================================================

    /// Verifications by result
    pub static ref ATTESTATION_VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("ao_attestation_verifications_total", "Attestation verifications by result"),
        &["result"]  // valid or the rejection label
    ).expect("metric creation failed");

    /// Verification latency
    pub static ref ATTESTATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "ao_attestation_verification_duration_seconds",
            "Time spent verifying attestation reports"
        ).buckets(exponential_buckets(0.0001, 2.0, 15).expect("valid buckets"))
    ).expect("metric creation failed");

    /// Reports accepted despite a degraded platform TCB
    pub static ref ATTESTATION_DEGRADED_TCB: Counter = Counter::new(
        "ao_attestation_degraded_tcb_total",
        "Reports accepted with a degraded TCB status"
    ).expect("metric creation failed");

    // =========================================================================
    // PRICE COMMITTER METRICS (ao-04)
    // =========================================================================

    /// Pre-block hook latency
    pub static ref PREBLOCK_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "ao_preblock_duration_seconds",
            "Time spent committing oracle prices before block execution"
        ).buckets(exponential_buckets(0.0001, 2.0, 15).expect("valid buckets")),
        &["status"]  // success/failure
    ).expect("metric creation failed");

    /// Last committed price per ticker (float approximation)
    pub static ref ORACLE_PRICE: GaugeVec = GaugeVec::new(
        Opts::new("ao_oracle_price", "Last committed oracle price"),
        &["ticker"]
    ).expect("metric creation failed");

    /// Prices written to the store
    pub static ref PRICES_COMMITTED: Counter = Counter::new(
        "ao_prices_committed_total",
        "Total prices written to the price store"
    ).expect("metric creation failed");

    /// Registered pairs skipped during commit
    pub static ref PRICES_SKIPPED: CounterVec = CounterVec::new(
        Opts::new("ao_prices_skipped_total", "Registered pairs skipped during commit"),
        &["reason"]  // absent/negative
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Calling it twice returns `MetricsInit` for the duplicate registration.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Producer
        Box::new(ORACLE_EXTENSION_DURATION.clone()),
        Box::new(ORACLE_EXTENSIONS.clone()),
        Box::new(ORACLE_CONNECTION_UP.clone()),
        // Attestation
        Box::new(ATTESTATION_VERIFICATIONS.clone()),
        Box::new(ATTESTATION_DURATION.clone()),
        Box::new(ATTESTATION_DEGRADED_TCB.clone()),
        // Committer
        Box::new(PREBLOCK_DURATION.clone()),
        Box::new(ORACLE_PRICE.clone()),
        Box::new(PRICES_COMMITTED.clone()),
        Box::new(PRICES_SKIPPED.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::HistogramTimer::new(&$histogram)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_encode() {
        // May already be registered by another test in this binary.
        let _ = register_metrics();
        PRICES_COMMITTED.inc();
        let text = encode_metrics().unwrap();
        assert!(text.contains("ao_prices_committed_total"));
    }

    #[test]
    fn test_labelled_counters() {
        ORACLE_EXTENSIONS.with_label_values(&["timeout"]).inc();
        assert!(ORACLE_EXTENSIONS.with_label_values(&["timeout"]).get() >= 1.0);
    }

    #[test]
    fn test_gauge_set() {
        ORACLE_PRICE.with_label_values(&["TEST/GAUGE"]).set(42.0);
        assert_eq!(ORACLE_PRICE.with_label_values(&["TEST/GAUGE"]).get(), 42.0);
    }

    #[test]
    fn test_histogram_timer() {
        let before = ORACLE_EXTENSION_DURATION.get_sample_count();
        {
            let _timer = HistogramTimer::new(&ORACLE_EXTENSION_DURATION);
        }
        assert!(ORACLE_EXTENSION_DURATION.get_sample_count() > before);
    }
}
