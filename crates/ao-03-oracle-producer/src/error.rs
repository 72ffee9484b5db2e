//! Error types for the oracle report producer

use ao_02_attestation::AttestationError;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for producer operations
pub type Result<T> = std::result::Result<T, OracleError>;

/// Errors that can occur while producing an oracle extension
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    /// Oracle could not be reached or returned a transport error
    #[error("oracle connection failed: {0}")]
    Connection(String),

    /// Oracle did not answer within the deadline
    #[error("oracle query timed out after {0:?}")]
    Timeout(Duration),

    /// Oracle client configuration is invalid
    #[error("invalid oracle configuration: {0}")]
    Config(String),

    /// Report verification failed under the `halt` failure policy
    #[error("oracle report failed attestation: {0}")]
    Attestation(#[from] AttestationError),

    /// Downstream sequencer refused the batch
    #[error("batch sink rejected extension: {0}")]
    Sink(String),
}

impl OracleError {
    /// Check if the error is recoverable (retry next round)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Timeout(_) | Self::Sink(_)
        )
    }

    /// Check if the error must stop batch production
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Attestation(_) | Self::Config(_))
    }
}
