//! Report claims and TCB status
//!
//! The structured view of an attestation report once its authenticity has
//! been established by a backend.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the report-data field of an SGX report.
pub const REPORT_DATA_SIZE: usize = 64;

/// Size of an enclave measurement (MRSIGNER / MRENCLAVE).
pub const MEASUREMENT_SIZE: usize = 32;

/// Size of the product-id field carried in the claims.
pub const PRODUCT_ID_SIZE: usize = 16;

/// Trusted-computing-base freshness as assessed by the verification backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TcbStatus {
    /// Platform is fully patched.
    UpToDate,
    /// Platform firmware or microcode is outdated.
    OutOfDate,
    /// Platform configuration needs attention.
    ConfigurationNeeded,
    /// Outdated and needs configuration.
    OutOfDateConfigurationNeeded,
    /// Software mitigations are required.
    SWHardeningNeeded,
    /// Configuration and software mitigations are required.
    ConfigurationAndSWHardeningNeeded,
    /// Platform keys were revoked.
    Revoked,
    /// Status could not be determined.
    Unknown,
}

impl TcbStatus {
    /// Statuses that the `accept_degraded_tcb` policy may tolerate.
    ///
    /// `Revoked` and `Unknown` are never tolerated.
    pub fn is_degraded(self) -> bool {
        matches!(
            self,
            Self::OutOfDate
                | Self::ConfigurationNeeded
                | Self::OutOfDateConfigurationNeeded
                | Self::SWHardeningNeeded
                | Self::ConfigurationAndSWHardeningNeeded
        )
    }

    /// Human-readable explanation for operator logs.
    pub fn explain(self) -> &'static str {
        match self {
            Self::UpToDate => "The platform is up to date.",
            Self::OutOfDate => "The platform needs a firmware or microcode update.",
            Self::ConfigurationNeeded => "The platform needs additional configuration (e.g. BIOS settings).",
            Self::OutOfDateConfigurationNeeded => {
                "The platform needs an update and additional configuration."
            }
            Self::SWHardeningNeeded => {
                "The platform is up to date but the enclave must apply software mitigations."
            }
            Self::ConfigurationAndSWHardeningNeeded => {
                "The platform needs additional configuration and software mitigations."
            }
            Self::Revoked => "The platform keys have been revoked.",
            Self::Unknown => "The TCB level could not be determined.",
        }
    }

    /// Parse the status names used by DCAP verification services.
    pub fn from_service_name(name: &str) -> Self {
        match name {
            "UpToDate" | "UP_TO_DATE" | "OK" => Self::UpToDate,
            "OutOfDate" | "OUT_OF_DATE" => Self::OutOfDate,
            "ConfigurationNeeded" | "CONFIGURATION_NEEDED" => Self::ConfigurationNeeded,
            "OutOfDateConfigurationNeeded" | "OUT_OF_DATE_CONFIGURATION_NEEDED" => {
                Self::OutOfDateConfigurationNeeded
            }
            "SWHardeningNeeded" | "SW_HARDENING_NEEDED" => Self::SWHardeningNeeded,
            "ConfigurationAndSWHardeningNeeded" | "CONFIGURATION_AND_SW_HARDENING_NEEDED" => {
                Self::ConfigurationAndSWHardeningNeeded
            }
            "Revoked" | "REVOKED" => Self::Revoked,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for TcbStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Claims extracted from an authenticated attestation report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportClaims {
    /// Report data chosen by the enclave. Starts with the binding hash.
    pub data: Vec<u8>,
    /// Enclave security version (ISV SVN).
    pub security_version: u32,
    /// Product identifier; the first two bytes are the little-endian ISV product id.
    pub product_id: Vec<u8>,
    /// Enclave signer identity (MRSIGNER).
    pub signer_id: Vec<u8>,
    /// Enclave code identity (MRENCLAVE).
    pub unique_id: Vec<u8>,
    /// Whether the enclave runs in debug mode.
    pub debug: bool,
    /// Platform TCB status.
    pub tcb_status: TcbStatus,
}

impl ReportClaims {
    /// ISV product id, if the field is long enough to carry one.
    pub fn product(&self) -> Option<u16> {
        match self.product_id.as_slice() {
            [lo, hi, ..] => Some(u16::from_le_bytes([*lo, *hi])),
            _ => None,
        }
    }

    /// Encode an ISV product id into the claims' product-id field.
    pub fn encode_product_id(product: u16) -> Vec<u8> {
        let mut field = vec![0u8; PRODUCT_ID_SIZE];
        field[..2].copy_from_slice(&product.to_le_bytes());
        field
    }
}
