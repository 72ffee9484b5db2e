//! Synthetic enclave and backend
//!
//! A software stand-in for enclave hardware, for development networks and
//! tests. Reports are `AOSYNTH1 || bincode(claims)`; they carry no
//! hardware signature, so the backend only checks structure.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::{ReportClaims, TcbStatus, REPORT_DATA_SIZE};
use crate::error::BackendError;
use crate::ports::AttestationBackend;

/// Prefix identifying a synthetic report.
pub const SYNTHETIC_REPORT_MAGIC: &[u8; 8] = b"AOSYNTH1";

/// Produces reports the way the oracle enclave does: the report data is the
/// SHA-256 of the response payload, zero-padded to 64 bytes.
#[derive(Clone, Debug)]
pub struct SyntheticEnclave {
    signer: Vec<u8>,
    unique_id: Vec<u8>,
    product_id: u16,
    security_version: u32,
    debug: bool,
    tcb_status: TcbStatus,
}

impl SyntheticEnclave {
    /// Up-to-date production enclave with product id 1 and security version 1.
    pub fn new(signer: impl Into<Vec<u8>>) -> Self {
        Self {
            signer: signer.into(),
            unique_id: vec![0u8; 32],
            product_id: 1,
            security_version: 1,
            debug: false,
            tcb_status: TcbStatus::UpToDate,
        }
    }

    /// Override the product id.
    pub fn with_product_id(mut self, product_id: u16) -> Self {
        self.product_id = product_id;
        self
    }

    /// Override the security version.
    pub fn with_security_version(mut self, security_version: u32) -> Self {
        self.security_version = security_version;
        self
    }

    /// Run in debug mode.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Report a platform TCB status.
    pub fn with_tcb_status(mut self, status: TcbStatus) -> Self {
        self.tcb_status = status;
        self
    }

    /// Signer identity of this enclave.
    pub fn signer(&self) -> &[u8] {
        &self.signer
    }

    /// Produce a report bound to `payload`.
    pub fn attest(&self, payload: &[u8]) -> Result<Vec<u8>, BackendError> {
        let mut data = vec![0u8; REPORT_DATA_SIZE];
        data[..32].copy_from_slice(&Sha256::digest(payload));
        self.attest_data(data)
    }

    /// Produce a report with arbitrary report data.
    pub fn attest_data(&self, data: Vec<u8>) -> Result<Vec<u8>, BackendError> {
        let claims = ReportClaims {
            data,
            security_version: self.security_version,
            product_id: ReportClaims::encode_product_id(self.product_id),
            signer_id: self.signer.clone(),
            unique_id: self.unique_id.clone(),
            debug: self.debug,
            tcb_status: self.tcb_status,
        };
        let body =
            bincode::serialize(&claims).map_err(|e| BackendError::MalformedReport(e.to_string()))?;

        let mut report = Vec::with_capacity(SYNTHETIC_REPORT_MAGIC.len() + body.len());
        report.extend_from_slice(SYNTHETIC_REPORT_MAGIC);
        report.extend_from_slice(&body);
        Ok(report)
    }
}

/// Backend accepting reports from [`SyntheticEnclave`].
#[derive(Debug)]
pub struct SyntheticBackend {
    available: AtomicBool,
}

impl Default for SyntheticBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticBackend {
    /// Create an available backend.
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the backend going down or coming back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

#[async_trait]
impl AttestationBackend for SyntheticBackend {
    async fn verify_remote_report(&self, report: &[u8]) -> Result<ReportClaims, BackendError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("synthetic backend offline".into()));
        }

        let body = report
            .strip_prefix(SYNTHETIC_REPORT_MAGIC.as_slice())
            .ok_or_else(|| BackendError::MalformedReport("not a synthetic report".into()))?;
        let claims: ReportClaims =
            bincode::deserialize(body).map_err(|e| BackendError::MalformedReport(e.to_string()))?;

        match claims.tcb_status {
            TcbStatus::UpToDate => Ok(claims),
            status if status.is_degraded() => Err(BackendError::TcbLevelInvalid {
                claims: Box::new(claims),
                status,
            }),
            status => Err(BackendError::Rejected(format!("TCB status {status}"))),
        }
    }
}
