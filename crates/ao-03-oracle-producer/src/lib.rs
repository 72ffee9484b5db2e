//! # Oracle Report Producer (ao-03)
//!
//! Turns an oracle price response and the enclave report attached to it
//! into a verified, framed batch extension.
//!
//! ## Round
//!
//! ```text
//! Sequencer ──head(max)──→ OracleBatchExtender
//!                               │
//!                               ↓
//!                    OracleReportProducer (deadline, 3s default)
//!                               │
//!        ┌──────────────────────┼──────────────────────────┐
//!        ↓                      ↓                          ↓
//!  SideChannelOracle     ReportVerifier (ao-02)     ao-01 framing
//!  prices + report       report ⇔ sha256(prices)    BE32|prices|BE32|report
//! ```
//!
//! ## Outcomes
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Deadline exceeded | empty extension |
//! | Query failed, no prices, no report | empty extension |
//! | Connection without report support | empty extension |
//! | Verification failed | empty (`drop_round`) or error (`halt`) |
//! | Framed size above `max_bytes` (non-zero) | empty extension |
//! | Otherwise | framed `(prices, report)` |
//!
//! `tail` is reserved and always empty.
//!
//! ## Connection Lifecycle
//!
//! [`OracleTask`] owns the background refresh loop: it starts the
//! connection, issues periodic health queries, reconnects on failure and
//! stops on the shutdown signal.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod extender;
pub mod ports;
pub mod service;
pub mod task;

pub use adapters::{GrpcOracleClient, StallingOracle, StaticOracle};
pub use config::{FailurePolicy, OracleClientConfig, ProducerConfig, DEFAULT_QUERY_TIMEOUT};
pub use domain::{ExtensionOutcome, OracleSource};
pub use error::{OracleError, Result};
pub use extender::OracleBatchExtender;
pub use ports::{
    AttestedPrices, BatchExtender, BatchExtension, BatchSink, OracleConnection, SideChannelOracle,
};
pub use service::OracleReportProducer;
pub use task::OracleTask;
