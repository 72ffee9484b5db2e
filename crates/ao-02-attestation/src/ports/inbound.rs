//! Inbound ports (driving side - API)

use crate::error::Result;
use async_trait::async_trait;

/// Primary API: bind an attestation report to application data
#[async_trait]
pub trait ReportVerifier: Send + Sync {
    /// Verify that `report` is authentic, was produced by the trusted
    /// enclave, and commits to `bound_data`.
    async fn verify(&self, report: &[u8], bound_data: &[u8]) -> Result<()>;
}
