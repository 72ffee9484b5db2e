//! Domain layer for the oracle report producer

pub mod outcome;
pub mod source;

pub use outcome::ExtensionOutcome;
pub use source::OracleSource;
