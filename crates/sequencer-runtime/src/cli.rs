//! Command-line flags
//!
//! Every flag is optional and overrides the matching config-file value.

use std::path::PathBuf;
use std::time::Duration;

use ao_03_oracle_producer::FailurePolicy;
use clap::Parser;

use crate::config::{parse_duration, BackendKind, ConfigError, RuntimeConfig};

/// Sequencer with attested oracle price extensions
#[derive(Parser, Debug, Default)]
#[command(name = "sequencer-runtime")]
#[command(about = "Sequencer runtime with attested oracle price extensions", long_about = None)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Sequencing server host
    #[arg(long)]
    pub host: Option<String>,

    /// Sequencing server port
    #[arg(long)]
    pub port: Option<u16>,

    /// Listen on all interfaces
    #[arg(long)]
    pub listen_all: bool,

    /// Rollup identifier
    #[arg(long)]
    pub rollup_id: Option<String>,

    /// Interval between batches, e.g. "2s" or "500ms"
    #[arg(long, value_parser = parse_duration_arg)]
    pub batch_time: Option<Duration>,

    /// DA node address
    #[arg(long)]
    pub da_address: Option<String>,

    /// Hex-encoded DA namespace
    #[arg(long)]
    pub da_namespace: Option<String>,

    /// DA auth token
    #[arg(long)]
    pub da_auth_token: Option<String>,

    /// Local database path
    #[arg(long)]
    pub db_path: Option<String>,

    /// Serve Prometheus metrics
    #[arg(long)]
    pub metrics: bool,

    /// Metrics listen address
    #[arg(long)]
    pub metrics_address: Option<String>,

    /// Oracle gRPC endpoint
    #[arg(long)]
    pub oracle_address: Option<String>,

    /// Hex-encoded trusted enclave signer
    #[arg(long)]
    pub trusted_signer: Option<String>,

    /// Attestation backend: dcap or synthetic
    #[arg(long)]
    pub attestation_backend: Option<BackendKind>,

    /// DCAP verification service URL
    #[arg(long)]
    pub dcap_url: Option<String>,

    /// Verification failure policy: drop_round or halt
    #[arg(long)]
    pub on_attestation_failure: Option<FailurePolicy>,
}

fn parse_duration_arg(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

impl Cli {
    /// Load the config file (or defaults) and apply flag overrides.
    pub fn resolve(&self) -> Result<RuntimeConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RuntimeConfig::load(path)?,
            None => RuntimeConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Overwrite config values with the flags that were given.
    pub fn apply(&self, config: &mut RuntimeConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.listen_all {
            config.server.listen_all = true;
        }
        if let Some(rollup_id) = &self.rollup_id {
            config.server.rollup_id = rollup_id.clone();
        }
        if let Some(batch_time) = self.batch_time {
            config.batch_time = batch_time;
        }
        if let Some(address) = &self.da_address {
            config.da.address = address.clone();
        }
        if let Some(namespace) = &self.da_namespace {
            config.da.namespace = namespace.clone();
        }
        if let Some(token) = &self.da_auth_token {
            config.da.auth_token = token.clone();
        }
        if let Some(db_path) = &self.db_path {
            config.db_path = db_path.clone();
        }
        if self.metrics {
            config.metrics.enabled = true;
        }
        if let Some(address) = &self.metrics_address {
            config.metrics.address = address.clone();
        }
        if let Some(address) = &self.oracle_address {
            config.oracle.address = address.clone();
        }
        if let Some(signer) = &self.trusted_signer {
            config.attestation.trusted_signer = Some(signer.clone());
        }
        if let Some(backend) = self.attestation_backend {
            config.attestation.backend = backend;
        }
        if let Some(url) = &self.dcap_url {
            config.attestation.dcap_url = Some(url.clone());
        }
        if let Some(policy) = self.on_attestation_failure {
            config.producer.on_attestation_failure = policy;
        }
    }
}
