//! Error types for the block price committer

use ao_01_framing::FramingError;
use shared_types::{TypesError, WireError};
use thiserror::Error;

/// Result type alias for committer operations
pub type Result<T> = std::result::Result<T, CommitError>;

/// Errors raised by a price store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be read or written
    #[error("price store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write
    #[error("price for {pair} rejected: {reason}")]
    Rejected {
        /// Currency pair being written
        pair: String,
        /// Reason given by the store
        reason: String,
    },
}

/// Errors that fail the block's pre-processing step
#[derive(Debug, Clone, Error)]
pub enum CommitError {
    /// The runtime delivered no finalize-block request
    #[error("received nil finalize-block request in oracle pre-blocker: height {height}")]
    MissingRequest {
        /// Height from the execution context
        height: u64,
    },

    /// The hook that runs before price commits failed
    #[error("pre-block hook failed: {0}")]
    Hook(String),

    /// Transaction 0 is not a valid frame
    #[error("oracle transaction is not framed correctly: {0}")]
    Framing(#[from] FramingError),

    /// Transaction 0 does not contain a price response
    #[error(transparent)]
    Decode(#[from] WireError),

    /// A currency pair or price in the payload is malformed
    #[error(transparent)]
    InvalidEntry(#[from] TypesError),

    /// Reading registered pairs or writing a price failed
    #[error("price store failed: {0}")]
    Store(#[from] StoreError),
}

impl CommitError {
    /// Short label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingRequest { .. } => "missing_request",
            Self::Hook(_) => "hook",
            Self::Framing(_) => "framing",
            Self::Decode(_) => "decode",
            Self::InvalidEntry(_) => "invalid_entry",
            Self::Store(_) => "store",
        }
    }

    /// Check if the error comes from the block contents rather than the node
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            Self::Framing(_) | Self::Decode(_) | Self::InvalidEntry(_)
        )
    }
}
