//! Adapters for the attestation backend port

pub mod dcap;
pub mod synthetic;

pub use dcap::{DcapServiceBackend, DEFAULT_REQUEST_TIMEOUT};
pub use synthetic::{SyntheticBackend, SyntheticEnclave, SYNTHETIC_REPORT_MAGIC};
