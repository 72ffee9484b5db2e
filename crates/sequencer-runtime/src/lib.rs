//! # Sequencer Runtime
//!
//! Sequencer-side process of the attested oracle pipeline.
//!
//! ## Modules
//!
//! - `config` - TOML configuration, defaults and validation
//! - `cli` - command-line overrides
//! - `runtime` - wiring of backend, oracle connection, producer and driver
//! - `driver` - periodic `head`/`tail` calls feeding a [`BatchSink`]
//! - `sink` - logging and recording batch sinks
//! - `metrics_server` - Prometheus endpoint
//!
//! ## Batch Cycle
//!
//! ```text
//!   every batch_time
//!         │
//!         ↓
//!   BatchExtender::head ──→ OracleReportProducer (ao-03)
//!         │                      │ prices + report
//!         │                      ↓
//!         │                 AttestationVerifier (ao-02)
//!         │                      │
//!         │                      ↓
//!         │                 framing encode (ao-01)
//!         ↓
//!   BatchSink::submit(head, tail)
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry
//! 2. Load the config file and apply flags
//! 3. Validate (signer, namespace, backend)
//! 4. Start metrics server and oracle task
//! 5. Drive batches until Ctrl+C or a halting verification failure
//!
//! [`BatchSink`]: ao_03_oracle_producer::BatchSink

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod config;
pub mod driver;
pub mod metrics_server;
pub mod runtime;
pub mod sink;

pub use cli::Cli;
pub use config::{BackendKind, ConfigError, RuntimeConfig};
pub use driver::BatchDriver;
pub use runtime::{build_backend, SequencerRuntime};
pub use sink::{LoggingBatchSink, RecordingBatchSink};
