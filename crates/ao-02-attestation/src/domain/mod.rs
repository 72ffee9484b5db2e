//! Domain layer for attestation verification
//!
//! Pure logic: report claims, the verification policy and SGX quote parsing.

pub mod claims;
pub mod policy;
pub mod quote;

pub use claims::{ReportClaims, TcbStatus, MEASUREMENT_SIZE, REPORT_DATA_SIZE};
pub use policy::{PolicyError, VerificationPolicy, DEFAULT_MIN_SECURITY_VERSION, DEFAULT_PRODUCT_ID};
