//! Error types for attestation verification

use crate::domain::{ReportClaims, TcbStatus};
use thiserror::Error;

/// Result type alias for attestation operations
pub type Result<T> = std::result::Result<T, AttestationError>;

/// Errors reported by an attestation backend
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// Report is authentic but the platform TCB is degraded.
    ///
    /// Carries the claims so a permissive policy can continue with them.
    #[error("TCB level is invalid: {status}")]
    TcbLevelInvalid {
        /// Claims extracted from the report
        claims: Box<ReportClaims>,
        /// Status reported by the backend
        status: TcbStatus,
    },

    /// Report could not be parsed
    #[error("malformed report: {0}")]
    MalformedReport(String),

    /// Backend refused the report (bad signature, revoked platform, ...)
    #[error("report rejected: {0}")]
    Rejected(String),

    /// Backend could not be reached
    #[error("attestation backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while verifying a report against bound data
#[derive(Debug, Clone, Error)]
pub enum AttestationError {
    /// Backend verification failed
    #[error("backend verification failed: {0}")]
    Backend(#[from] BackendError),

    /// TCB degraded and the policy does not accept it
    #[error("degraded TCB status not accepted: {status}")]
    DegradedTcb {
        /// Status reported by the backend
        status: TcbStatus,
    },

    /// Report data does not start with the hash of the bound data
    #[error("report data does not match the payload hash: expected {expected}")]
    BindingMismatch {
        /// Hex-encoded expected hash
        expected: String,
    },

    /// Enclave security version below the minimum
    #[error("invalid security version: {actual} < {minimum}")]
    StaleEnclave {
        /// Version carried by the report
        actual: u32,
        /// Minimum accepted version
        minimum: u32,
    },

    /// Product identifier does not match
    #[error("invalid product: expected {expected}, got {actual:?}")]
    WrongProduct {
        /// Expected product id
        expected: u16,
        /// Product id carried by the report, if readable
        actual: Option<u16>,
    },

    /// Signer identity is not the trusted signer
    #[error("invalid signer: {actual}")]
    UntrustedSigner {
        /// Hex-encoded signer carried by the report
        actual: String,
    },

    /// Enclave runs in debug mode and the policy forbids it
    #[error("debug enclave not allowed")]
    DebugEnclave,
}

impl AttestationError {
    /// Short label for metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Backend(_) => "backend",
            Self::DegradedTcb { .. } => "degraded_tcb",
            Self::BindingMismatch { .. } => "binding_mismatch",
            Self::StaleEnclave { .. } => "stale_enclave",
            Self::WrongProduct { .. } => "wrong_product",
            Self::UntrustedSigner { .. } => "untrusted_signer",
            Self::DebugEnclave => "debug_enclave",
        }
    }

    /// Check if the error indicates the backend was unreachable rather than
    /// the report being bad
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Backend(BackendError::Unavailable(_)))
    }
}
