//! Adapters for the oracle connection ports

pub mod grpc;
pub mod memory;

pub use grpc::{GrpcOracleClient, PRICES_PATH, REPORT_TRAILER};
pub use memory::{StallingOracle, StaticOracle};
