//! # Runtime Configuration
//!
//! TOML file layout, defaults and validation for the sequencer runtime.
//!
//! ```toml
//! batch_time = "2s"
//! db_path = "/var/lib/sequencer"
//!
//! [server]
//! host = "localhost"
//! port = 50051
//! rollup_id = "rollupId"
//!
//! [da]
//! address = "http://localhost:26658"
//! namespace = "00000000000000000000000000000000000000000000000000"
//!
//! [metrics]
//! enabled = true
//! address = "0.0.0.0:8080"
//!
//! [oracle]
//! address = "http://20.4.69.13:8080"
//! query_timeout_ms = 3000
//!
//! [attestation]
//! trusted_signer = "36d6f8cd12953b56d764ea4ce9fcff4526ae150c580cc8026b2ec9bb106d131e"
//! backend = "dcap"
//! dcap_url = "http://localhost:8090/verify"
//!
//! [producer]
//! on_attestation_failure = "drop_round"
//! ```
//!
//! Every section is optional. Invalid values are fatal at startup.

use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use ao_02_attestation::domain::DEFAULT_MIN_SECURITY_VERSION;
use ao_02_attestation::{PolicyError, VerificationPolicy};
use ao_03_oracle_producer::{FailurePolicy, OracleClientConfig, ProducerConfig};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Configuration errors. All of them stop the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },

    /// Config file is not valid TOML for this layout.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// No trusted signer configured.
    #[error("attestation.trusted_signer is required")]
    MissingSigner,

    /// Trusted signer is not 32 hex-encoded bytes.
    #[error("invalid attestation.trusted_signer: {0}")]
    InvalidSigner(#[from] PolicyError),

    /// DA namespace is not valid hex.
    #[error("invalid da.namespace: {0}")]
    InvalidNamespace(#[from] hex::FromHexError),

    /// DCAP backend selected without a service URL.
    #[error("attestation.dcap_url is required for the dcap backend")]
    MissingDcapUrl,

    /// Duration string could not be parsed.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// Socket address could not be parsed.
    #[error("invalid address {0}")]
    InvalidAddress(String),

    /// Value out of range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Sequencing server settings.
    pub server: ServerConfig,
    /// Data-availability layer settings.
    pub da: DaConfig,
    /// Local database path.
    pub db_path: String,
    /// Interval between batches.
    #[serde(deserialize_with = "deserialize_duration")]
    pub batch_time: Duration,
    /// Metrics endpoint.
    pub metrics: MetricsConfig,
    /// Oracle connection.
    pub oracle: OracleSection,
    /// Attestation policy and backend.
    pub attestation: AttestationSection,
    /// Producer behaviour.
    pub producer: ProducerSection,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            da: DaConfig::default(),
            db_path: String::new(),
            batch_time: Duration::from_secs(2),
            metrics: MetricsConfig::default(),
            oracle: OracleSection::default(),
            attestation: AttestationSection::default(),
            producer: ProducerSection::default(),
        }
    }
}

/// Sequencing server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen host.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Listen on all interfaces instead of `host`.
    pub listen_all: bool,
    /// Rollup identifier.
    pub rollup_id: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 50051,
            listen_all: false,
            rollup_id: "rollupId".to_string(),
        }
    }
}

impl ServerConfig {
    /// `host:port`, or `0.0.0.0:port` when listening on all interfaces.
    pub fn listen_address(&self) -> String {
        let host = if self.listen_all {
            "0.0.0.0"
        } else {
            self.host.as_str()
        };
        format!("{host}:{}", self.port)
    }
}

/// Data-availability layer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DaConfig {
    /// DA node address.
    pub address: String,
    /// Hex-encoded namespace.
    pub namespace: String,
    /// DA auth token.
    pub auth_token: String,
}

impl Default for DaConfig {
    fn default() -> Self {
        Self {
            address: "http://localhost:26658".to_string(),
            namespace: String::new(),
            auth_token: String::new(),
        }
    }
}

impl DaConfig {
    /// Decoded namespace bytes.
    pub fn namespace_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(hex::decode(self.namespace.trim())?)
    }
}

/// Metrics endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Serve `/metrics`.
    pub enabled: bool,
    /// Listen address; `:8080` means all interfaces.
    pub address: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: "0.0.0.0:8080".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Parsed listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let address = self.address.trim();
        let address = if address.starts_with(':') {
            format!("0.0.0.0{address}")
        } else {
            address.to_string()
        };
        address
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.address.clone()))
    }
}

/// Oracle connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OracleSection {
    /// gRPC endpoint of the oracle.
    pub address: String,
    /// Deadline of one extension round.
    pub query_timeout_ms: u64,
    /// Background health-query interval.
    pub refresh_interval_ms: u64,
    /// Connection establishment timeout.
    pub connect_timeout_ms: u64,
    /// The oracle attaches a report trailer to its responses.
    pub side_channel: bool,
}

impl Default for OracleSection {
    fn default() -> Self {
        Self {
            address: "http://20.4.69.13:8080".to_string(),
            query_timeout_ms: 3000,
            refresh_interval_ms: 5000,
            connect_timeout_ms: 2000,
            side_channel: true,
        }
    }
}

/// Attestation backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Remote DCAP verification service.
    #[default]
    Dcap,
    /// In-process synthetic backend, for local networks and tests.
    Synthetic,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dcap" => Ok(Self::Dcap),
            "synthetic" => Ok(Self::Synthetic),
            other => Err(format!("unknown attestation backend: {other}")),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dcap => write!(f, "dcap"),
            Self::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Attestation policy and backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AttestationSection {
    /// Hex-encoded trusted enclave signer (32 bytes).
    pub trusted_signer: Option<String>,
    /// Expected enclave product id.
    pub product_id: u16,
    /// Minimum enclave security version.
    pub min_security_version: u32,
    /// Accept reports whose TCB level is out of date.
    pub accept_degraded_tcb: bool,
    /// Accept debug-mode enclaves.
    pub allow_debug_enclave: bool,
    /// Verification backend.
    pub backend: BackendKind,
    /// DCAP verification service URL.
    pub dcap_url: Option<String>,
    /// Timeout of one DCAP service request.
    pub request_timeout_ms: u64,
}

impl Default for AttestationSection {
    fn default() -> Self {
        Self {
            trusted_signer: None,
            product_id: ao_02_attestation::domain::DEFAULT_PRODUCT_ID,
            min_security_version: DEFAULT_MIN_SECURITY_VERSION,
            accept_degraded_tcb: false,
            allow_debug_enclave: false,
            backend: BackendKind::Dcap,
            dcap_url: None,
            request_timeout_ms: 2000,
        }
    }
}

/// Producer settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProducerSection {
    /// Behaviour on verification failure.
    pub on_attestation_failure: FailurePolicy,
    /// Byte budget handed to `head`; 0 means no limit.
    pub max_bytes: u64,
}

impl RuntimeConfig {
    /// Load and parse a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every value that would otherwise fail later at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.da.namespace_bytes()?;
        self.verification_policy()?;

        if self.attestation.backend == BackendKind::Dcap && self.attestation.dcap_url.is_none() {
            return Err(ConfigError::MissingDcapUrl);
        }
        if self.batch_time.is_zero() {
            return Err(ConfigError::Invalid {
                field: "batch_time",
                reason: "must be greater than zero".into(),
            });
        }
        if self.oracle.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "oracle.query_timeout_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.oracle.refresh_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "oracle.refresh_interval_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.metrics.enabled {
            self.metrics.socket_addr()?;
        }
        Ok(())
    }

    /// Verification policy built from the attestation section.
    pub fn verification_policy(&self) -> Result<VerificationPolicy, ConfigError> {
        let signer = self
            .attestation
            .trusted_signer
            .as_deref()
            .ok_or(ConfigError::MissingSigner)?;
        if self.attestation.min_security_version < DEFAULT_MIN_SECURITY_VERSION {
            return Err(ConfigError::Invalid {
                field: "attestation.min_security_version",
                reason: format!("must be at least {DEFAULT_MIN_SECURITY_VERSION}"),
            });
        }

        let mut policy = VerificationPolicy::from_hex_signer(signer)?
            .with_accept_degraded_tcb(self.attestation.accept_degraded_tcb)
            .with_allow_debug_enclave(self.attestation.allow_debug_enclave);
        policy.product_id = self.attestation.product_id;
        policy.min_security_version = self.attestation.min_security_version;
        Ok(policy)
    }

    /// Producer configuration.
    pub fn producer_config(&self) -> ProducerConfig {
        ProducerConfig {
            query_timeout: Duration::from_millis(self.oracle.query_timeout_ms),
            on_attestation_failure: self.producer.on_attestation_failure,
        }
    }

    /// gRPC oracle client configuration.
    pub fn oracle_client_config(&self) -> OracleClientConfig {
        OracleClientConfig {
            address: self.oracle.address.clone(),
            request_timeout: Duration::from_millis(self.oracle.query_timeout_ms),
            connect_timeout: Duration::from_millis(self.oracle.connect_timeout_ms),
            refresh_interval: Duration::from_millis(self.oracle.refresh_interval_ms),
        }
    }
}

/// Parse `"2s"`, `"500ms"`, `"1m"` or a bare number of seconds.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    let invalid = || ConfigError::InvalidDuration(s.to_string());

    let (number, unit) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => s.split_at(idx),
        None => (s, "s"),
    };
    let value: f64 = number.parse().map_err(|_| invalid())?;
    let secs = match unit {
        "ms" => value / 1000.0,
        "s" => value,
        "m" => value * 60.0,
        _ => return Err(invalid()),
    };
    Duration::try_from_secs_f64(secs).map_err(|_| invalid())
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
        Raw::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use ao_02_attestation::REFERENCE_ORACLE_SIGNER as SIGNER;

    fn valid() -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.attestation.trusted_signer = Some(SIGNER.to_string());
        config.attestation.dcap_url = Some("http://localhost:8090/verify".to_string());
        config
    }

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.server.listen_address(), "localhost:50051");
        assert_eq!(config.server.rollup_id, "rollupId");
        assert_eq!(config.batch_time, Duration::from_secs(2));
        assert!(!config.metrics.enabled);
        assert_eq!(config.oracle.query_timeout_ms, 3000);
        assert!(!config.attestation.accept_degraded_tcb);
        assert_eq!(config.producer.on_attestation_failure, FailurePolicy::DropRound);
    }

    #[test]
    fn test_listen_all() {
        let server = ServerConfig {
            listen_all: true,
            ..ServerConfig::default()
        };
        assert_eq!(server.listen_address(), "0.0.0.0:50051");
    }

    #[test]
    fn test_parse_file() {
        let config = RuntimeConfig::parse(
            r#"
            batch_time = "500ms"

            [server]
            port = 9000

            [attestation]
            trusted_signer = "36d6f8cd12953b56d764ea4ce9fcff4526ae150c580cc8026b2ec9bb106d131e"
            backend = "synthetic"
            accept_degraded_tcb = true

            [producer]
            on_attestation_failure = "halt"
            "#,
        )
        .unwrap();

        assert_eq!(config.batch_time, Duration::from_millis(500));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.attestation.backend, BackendKind::Synthetic);
        assert_eq!(config.producer.on_attestation_failure, FailurePolicy::Halt);
        config.validate().unwrap();
        assert!(config.verification_policy().unwrap().accept_degraded_tcb);
    }

    #[test]
    fn test_batch_time_as_seconds() {
        let config = RuntimeConfig::parse("batch_time = 5").unwrap();
        assert_eq!(config.batch_time, Duration::from_secs(5));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "db_path = \"/tmp/db\"").unwrap();
        let config = RuntimeConfig::load(file.path()).unwrap();
        assert_eq!(config.db_path, "/tmp/db");
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            RuntimeConfig::load("/nonexistent/sequencer.toml"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(matches!(
            RuntimeConfig::parse("[producer]\non_attestation_failure = \"panic\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_signer_required() {
        let mut config = valid();
        config.attestation.trusted_signer = None;
        assert!(matches!(config.validate(), Err(ConfigError::MissingSigner)));
    }

    #[test]
    fn test_bad_signer() {
        let mut config = valid();
        config.attestation.trusted_signer = Some("zz".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSigner(PolicyError::InvalidHex(_)))
        ));

        config.attestation.trusted_signer = Some("abcd".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSigner(PolicyError::InvalidSignerLength(_)))
        ));
    }

    #[test]
    fn test_bad_namespace() {
        let mut config = valid();
        config.da.namespace = "xyz".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNamespace(_))
        ));

        config.da.namespace = "00ff".into();
        config.validate().unwrap();
        assert_eq!(config.da.namespace_bytes().unwrap(), vec![0x00, 0xff]);
    }

    #[test]
    fn test_security_version_floor() {
        let mut config = valid();
        config.attestation.min_security_version = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "attestation.min_security_version",
                ..
            })
        ));
        assert!(config.verification_policy().is_err());

        config.attestation.min_security_version = 3;
        config.validate().unwrap();
        assert_eq!(config.verification_policy().unwrap().min_security_version, 3);
    }

    #[test]
    fn test_dcap_requires_url() {
        let mut config = valid();
        config.attestation.dcap_url = None;
        assert!(matches!(config.validate(), Err(ConfigError::MissingDcapUrl)));
    }

    #[test]
    fn test_metrics_address() {
        let mut config = valid();
        config.metrics.enabled = true;
        config.metrics.address = ":8080".into();
        assert_eq!(
            config.metrics.socket_addr().unwrap(),
            "0.0.0.0:8080".parse().unwrap()
        );
        config.validate().unwrap();

        config.metrics.address = "not-an-address".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
        assert!(parse_duration("2h").is_err());
        assert!(parse_duration("fast").is_err());
    }

    #[test]
    fn test_derived_configs() {
        let config = valid();
        assert_eq!(config.producer_config().query_timeout, Duration::from_secs(3));
        let client = config.oracle_client_config();
        assert_eq!(client.address, config.oracle.address);
        assert_eq!(client.refresh_interval, Duration::from_secs(5));
    }
}
