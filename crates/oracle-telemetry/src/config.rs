//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and trace export.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name for traces and logs
    pub service_name: String,

    /// OpenTelemetry OTLP endpoint. Trace export is disabled when unset.
    pub otlp_endpoint: Option<String>,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Deployment name attached to exported traces (devnet, testnet, ...)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "attested-oracle".to_string(),
            otlp_endpoint: None,
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            network: "devnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTEL_SERVICE_NAME`: Service name (default: attested-oracle)
    /// - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: unset, no export)
    /// - `AO_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `AO_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `AO_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `AO_NETWORK`: Deployment name (default: devnet)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "attested-oracle".to_string()),

            otlp_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            log_level: env::var("AO_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("AO_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),

            json_logs: env::var("AO_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            network: env::var("AO_NETWORK").unwrap_or_else(|_| "devnet".to_string()),
        }
    }

    /// Configuration for a named component, e.g. `("03", "oracle-producer")`.
    pub fn for_component(component_id: &str, component_name: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = format!("ao-{}-{}", component_id, component_name);
        config
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
