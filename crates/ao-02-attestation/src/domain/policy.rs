//! Verification policy
//!
//! The relying party's expectations of an enclave: who must have signed it,
//! which product it must be, how fresh it must be, and which degraded
//! states are tolerated.

use crate::domain::claims::MEASUREMENT_SIZE;

/// Product id the oracle enclave is built with.
pub const DEFAULT_PRODUCT_ID: u16 = 1;

/// Lowest accepted enclave security version.
pub const DEFAULT_MIN_SECURITY_VERSION: u32 = 1;

/// Policy applied to every report after backend verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationPolicy {
    /// Expected signer identity (MRSIGNER).
    pub trusted_signer: Vec<u8>,
    /// Expected ISV product id.
    pub product_id: u16,
    /// Minimum ISV security version.
    pub min_security_version: u32,
    /// Continue with a warning when the platform TCB is degraded.
    ///
    /// Off by default; enabling it trades platform freshness for liveness.
    pub accept_degraded_tcb: bool,
    /// Accept enclaves running in debug mode.
    pub allow_debug_enclave: bool,
}

impl VerificationPolicy {
    /// Strict policy trusting a single signer.
    pub fn new(trusted_signer: impl Into<Vec<u8>>) -> Self {
        Self {
            trusted_signer: trusted_signer.into(),
            product_id: DEFAULT_PRODUCT_ID,
            min_security_version: DEFAULT_MIN_SECURITY_VERSION,
            accept_degraded_tcb: false,
            allow_debug_enclave: false,
        }
    }

    /// Strict policy from a hex-encoded signer identity.
    pub fn from_hex_signer(signer: &str) -> Result<Self, PolicyError> {
        let bytes = hex::decode(signer.trim()).map_err(|e| PolicyError::InvalidHex(e.to_string()))?;
        if bytes.len() != MEASUREMENT_SIZE {
            return Err(PolicyError::InvalidSignerLength(bytes.len()));
        }
        Ok(Self::new(bytes))
    }

    /// Set the degraded-TCB tolerance.
    pub fn with_accept_degraded_tcb(mut self, accept: bool) -> Self {
        self.accept_degraded_tcb = accept;
        self
    }

    /// Set the debug-enclave tolerance.
    pub fn with_allow_debug_enclave(mut self, allow: bool) -> Self {
        self.allow_debug_enclave = allow;
        self
    }
}

/// Errors building a policy from configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// Signer is not valid hex.
    #[error("trusted signer is not valid hex: {0}")]
    InvalidHex(String),
    /// Signer has the wrong length.
    #[error("trusted signer must be 32 bytes, got {0}")]
    InvalidSignerLength(usize),
}
