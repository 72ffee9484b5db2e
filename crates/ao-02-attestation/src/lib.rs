//! # Attestation Verifier (ao-02)
//!
//! Decides whether an enclave-produced report is authentic, comes from the
//! trusted enclave, and commits to a given payload.
//!
//! ## Verification Steps
//!
//! 1. The [`AttestationBackend`] authenticates the report and returns its
//!    claims. A degraded platform TCB is an error unless the policy sets
//!    `accept_degraded_tcb`; revoked or unknown platforms never pass.
//! 2. The claims' report data must start with `SHA-256(bound_data)`.
//! 3. Security version must be at least the policy minimum (default 1).
//! 4. The little-endian product id must equal the expected product (default 1).
//! 5. The signer identity must equal the trusted signer byte for byte.
//! 6. Debug enclaves are rejected unless explicitly allowed.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────────────┐     ┌───────────────────────┐
//! │ ReportVerifier   │ ──→ │ AttestationVerifier │ ──→ │ AttestationBackend    │
//! │ (inbound port)   │     │ + VerificationPolicy│     │ DCAP service/synthetic│
//! └──────────────────┘     └─────────────────────┘     └───────────────────────┘
//! ```
//!
//! ## Backends
//!
//! - [`DcapServiceBackend`]: parses the SGX quote and delegates signature and
//!   TCB evaluation to an HTTP quote verification service.
//! - [`SyntheticBackend`] with [`SyntheticEnclave`]: software-only reports
//!   for development networks and tests.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{DcapServiceBackend, SyntheticBackend, SyntheticEnclave};
pub use domain::{PolicyError, ReportClaims, TcbStatus, VerificationPolicy};
pub use error::{AttestationError, BackendError, Result};
pub use ports::{AttestationBackend, ReportVerifier};
pub use service::AttestationVerifier;

/// Signer identity of the reference oracle enclave build.
pub const REFERENCE_ORACLE_SIGNER: &str =
    "36d6f8cd12953b56d764ea4ce9fcff4526ae150c580cc8026b2ec9bb106d131e";
