//! # Oracle Telemetry
//!
//! Observability for the attested oracle pipeline.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` with an env filter, pretty or JSON output
//! - **Traces**: optional OpenTelemetry OTLP export
//! - **Metrics**: a global Prometheus registry rendered by [`encode_metrics`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use oracle_telemetry::{init_telemetry, TelemetryConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // Application code; dropping the guard flushes traces.
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | unset | OTLP endpoint; export disabled when unset |
//! | `OTEL_SERVICE_NAME` | `attested-oracle` | Service name in traces |
//! | `AO_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `AO_JSON_LOGS` | `false` | JSON log lines |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, ATTESTATION_DEGRADED_TCB,
    ATTESTATION_DURATION, ATTESTATION_VERIFICATIONS, ORACLE_CONNECTION_UP,
    ORACLE_EXTENSIONS, ORACLE_EXTENSION_DURATION, ORACLE_PRICE, PREBLOCK_DURATION,
    PRICES_COMMITTED, PRICES_SKIPPED, REGISTRY,
};
pub use tracing_setup::TracingGuard;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Tracer or subscriber could not be installed
    #[error("Failed to initialize tracing: {0}")]
    TracerInit(String),

    /// Metric registration or encoding failed
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid filter or endpoint
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize metrics and logging.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    register_metrics()?;
    let tracing_guard = tracing_setup::init_tracing(&config)?;

    Ok(TelemetryGuard {
        _tracing: tracing_guard,
    })
}

/// Guard that keeps telemetry active. Drop to flush and shutdown.
pub struct TelemetryGuard {
    _tracing: TracingGuard,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}
