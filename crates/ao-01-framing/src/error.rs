//! Error types for the framing codec

use thiserror::Error;

/// Result type alias for framing operations
pub type Result<T> = std::result::Result<T, FramingError>;

/// Errors that can occur while unframing a blob
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FramingError {
    /// Blob is shorter than two length prefixes
    #[error("invalid data: too short")]
    TooShort,

    /// First length prefix overruns the blob (including the second prefix)
    #[error("invalid a length")]
    InvalidFirstLength,

    /// Second length prefix overruns the blob
    #[error("invalid b length")]
    InvalidSecondLength,

    /// Bytes remain after both fields were consumed
    #[error("extra data at end")]
    TrailingBytes,
}
