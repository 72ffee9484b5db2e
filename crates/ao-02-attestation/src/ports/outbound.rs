//! Outbound ports (driven side - SPI)

use crate::domain::ReportClaims;
use crate::error::BackendError;
use async_trait::async_trait;

/// Port: Remote attestation backend
///
/// Establishes that a report was produced by genuine enclave hardware and
/// returns the claims it carries. A degraded platform is reported as
/// [`BackendError::TcbLevelInvalid`] together with the claims.
#[async_trait]
pub trait AttestationBackend: Send + Sync {
    /// Verify report authenticity and extract its claims.
    async fn verify_remote_report(&self, report: &[u8]) -> Result<ReportClaims, BackendError>;
}
