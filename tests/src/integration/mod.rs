//! Cross-crate flows.

pub mod price_propagation;
pub mod tampering;
