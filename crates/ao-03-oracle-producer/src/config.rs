//! Producer and oracle-client configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Overall deadline for one extension round.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Interval of the background oracle health query.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Connection establishment timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// What to do when a report fails verification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log, count and return an empty extension for this round.
    #[default]
    DropRound,
    /// Return the error to the sequencer.
    Halt,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "drop_round" | "drop" => Ok(Self::DropRound),
            "halt" => Ok(Self::Halt),
            other => Err(format!("unknown attestation failure policy: {other}")),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DropRound => write!(f, "drop_round"),
            Self::Halt => write!(f, "halt"),
        }
    }
}

/// Configuration of the report producer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProducerConfig {
    /// Deadline covering query, verification and framing.
    pub query_timeout: Duration,
    /// Behaviour on verification failure.
    pub on_attestation_failure: FailurePolicy,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            on_attestation_failure: FailurePolicy::DropRound,
        }
    }
}

/// Configuration of the gRPC oracle client and its refresh task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleClientConfig {
    /// Oracle endpoint, e.g. `http://127.0.0.1:8080`.
    pub address: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Background health-query interval.
    pub refresh_interval: Duration,
}

impl Default for OracleClientConfig {
    fn default() -> Self {
        Self {
            address: "http://localhost:8080".to_string(),
            request_timeout: DEFAULT_QUERY_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}
