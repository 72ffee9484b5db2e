//! # Attestation Verifier Service
//!
//! Implements [`ReportVerifier`] on top of an [`AttestationBackend`].
//!
//! The backend establishes that the report is authentic hardware evidence;
//! this service then binds it to application data and to the expected
//! enclave identity. Both must pass.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use oracle_telemetry::{ATTESTATION_DEGRADED_TCB, ATTESTATION_DURATION, ATTESTATION_VERIFICATIONS};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::domain::{ReportClaims, VerificationPolicy};
use crate::error::{AttestationError, BackendError, Result};
use crate::ports::{AttestationBackend, ReportVerifier};

/// Verifies reports against a [`VerificationPolicy`].
pub struct AttestationVerifier<B: AttestationBackend + ?Sized> {
    backend: Arc<B>,
    policy: VerificationPolicy,
}

impl<B: AttestationBackend + ?Sized> AttestationVerifier<B> {
    /// Create a verifier.
    pub fn new(backend: Arc<B>, policy: VerificationPolicy) -> Self {
        Self { backend, policy }
    }

    /// The policy in force.
    pub fn policy(&self) -> &VerificationPolicy {
        &self.policy
    }

    /// Verify `report` against `bound_data` and an explicit signer identity.
    ///
    /// All other policy fields apply unchanged.
    pub async fn verify_for_signer(
        &self,
        report: &[u8],
        bound_data: &[u8],
        trusted_signer: &[u8],
    ) -> Result<()> {
        let started = Instant::now();
        let result = self.check(report, bound_data, trusted_signer).await;
        ATTESTATION_DURATION.observe(started.elapsed().as_secs_f64());

        match &result {
            Ok(()) => {
                ATTESTATION_VERIFICATIONS.with_label_values(&["valid"]).inc();
                debug!(
                    latency_ms = started.elapsed().as_millis() as u64,
                    "[ao-02] Attestation report verified"
                );
            }
            Err(e) => {
                ATTESTATION_VERIFICATIONS.with_label_values(&[e.label()]).inc();
            }
        }
        result
    }

    async fn claims(&self, report: &[u8]) -> Result<ReportClaims> {
        match self.backend.verify_remote_report(report).await {
            Ok(claims) => Ok(claims),
            Err(BackendError::TcbLevelInvalid { claims, status })
                if status.is_degraded() && self.policy.accept_degraded_tcb =>
            {
                warn!(
                    status = %status,
                    "[ao-02] Accepting report with degraded TCB: {}",
                    status.explain()
                );
                ATTESTATION_DEGRADED_TCB.inc();
                Ok(*claims)
            }
            Err(BackendError::TcbLevelInvalid { status, .. }) => {
                Err(AttestationError::DegradedTcb { status })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn check(&self, report: &[u8], bound_data: &[u8], trusted_signer: &[u8]) -> Result<()> {
        let claims = self.claims(report).await?;

        let hash = Sha256::digest(bound_data);
        if !claims.data.starts_with(hash.as_slice()) {
            return Err(AttestationError::BindingMismatch {
                expected: hex::encode(hash),
            });
        }

        if claims.security_version < self.policy.min_security_version {
            return Err(AttestationError::StaleEnclave {
                actual: claims.security_version,
                minimum: self.policy.min_security_version,
            });
        }

        let product = claims.product();
        if product != Some(self.policy.product_id) {
            return Err(AttestationError::WrongProduct {
                expected: self.policy.product_id,
                actual: product,
            });
        }

        if claims.signer_id != trusted_signer {
            return Err(AttestationError::UntrustedSigner {
                actual: hex::encode(&claims.signer_id),
            });
        }

        if claims.debug && !self.policy.allow_debug_enclave {
            return Err(AttestationError::DebugEnclave);
        }

        Ok(())
    }
}

#[async_trait]
impl<B: AttestationBackend + ?Sized> ReportVerifier for AttestationVerifier<B> {
    async fn verify(&self, report: &[u8], bound_data: &[u8]) -> Result<()> {
        self.verify_for_signer(report, bound_data, &self.policy.trusted_signer)
            .await
    }
}
