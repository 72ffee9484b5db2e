//! Runtime wiring
//!
//! Builds the attestation backend, oracle connection, producer and batch
//! driver from a validated [`RuntimeConfig`], then runs them until the
//! shutdown signal flips to `true`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use ao_02_attestation::{
    AttestationBackend, AttestationVerifier, DcapServiceBackend, SyntheticBackend,
};
use ao_03_oracle_producer::{
    BatchExtender, BatchSink, GrpcOracleClient, OracleBatchExtender, OracleReportProducer,
    OracleSource, OracleTask,
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::{BackendKind, RuntimeConfig};
use crate::driver::BatchDriver;
use crate::metrics_server;
use crate::sink::LoggingBatchSink;

/// The sequencer-side process.
pub struct SequencerRuntime {
    config: RuntimeConfig,
    source: OracleSource,
    extender: Arc<dyn BatchExtender>,
    sink: Arc<dyn BatchSink>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl SequencerRuntime {
    /// Build the runtime from configuration: gRPC oracle client, configured
    /// attestation backend and the logging batch sink.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;

        let backend = build_backend(&config)?;
        let client = GrpcOracleClient::new(&config.oracle_client_config())
            .context("failed to create oracle client")?;
        let client = Arc::new(client);
        let source = if config.oracle.side_channel {
            OracleSource::with_side_channel(client)
        } else {
            warn!("[runtime] Oracle side channel disabled, batches will carry no oracle data");
            OracleSource::plain(client)
        };
        let sink = Arc::new(LoggingBatchSink::new(config.server.rollup_id.clone()));

        Self::with_components(config, source, backend, sink)
    }

    /// Build the runtime around externally supplied components.
    pub fn with_components(
        config: RuntimeConfig,
        source: OracleSource,
        backend: Arc<dyn AttestationBackend>,
        sink: Arc<dyn BatchSink>,
    ) -> Result<Self> {
        let policy = config
            .verification_policy()
            .context("invalid attestation policy")?;
        let verifier = Arc::new(AttestationVerifier::new(backend, policy));
        let producer = Arc::new(OracleReportProducer::new(
            source.clone(),
            verifier,
            config.producer_config(),
        ));
        let extender: Arc<dyn BatchExtender> = Arc::new(OracleBatchExtender::new(producer));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            source,
            extender,
            sink,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Handle that stops the runtime when `true` is sent.
    pub fn shutdown_handle(&self) -> watch::Sender<bool> {
        self.shutdown_tx.clone()
    }

    /// Signal every task to stop.
    pub fn shutdown(&self) {
        info!("[runtime] Initiating graceful shutdown...");
        let _ = self.shutdown_tx.send(true);
    }

    /// Run until shutdown, or until the producer halts.
    pub async fn run(self) -> Result<()> {
        self.log_startup();

        let metrics_handle = if self.config.metrics.enabled {
            let addr = self.config.metrics.socket_addr()?;
            let listener = metrics_server::bind(addr)
                .await
                .with_context(|| format!("failed to bind metrics server on {addr}"))?;
            Some(tokio::spawn(metrics_server::serve(
                listener,
                self.shutdown_rx.clone(),
            )))
        } else {
            None
        };

        let oracle_task = OracleTask::new(
            self.source.clone(),
            Duration::from_millis(self.config.oracle.refresh_interval_ms),
            Duration::from_millis(self.config.oracle.query_timeout_ms),
            self.shutdown_rx.clone(),
        )
        .spawn();

        let driver = BatchDriver::new(
            Arc::clone(&self.extender),
            Arc::clone(&self.sink),
            self.config.batch_time,
            self.config.producer.max_bytes,
            self.shutdown_rx.clone(),
        );
        let driven = driver.run().await;

        // Stop the remaining tasks whichever way the driver ended.
        let _ = self.shutdown_tx.send(true);
        let _ = oracle_task.await;
        if let Some(handle) = metrics_handle {
            match handle.await {
                Ok(Err(e)) => warn!(error = %e, "[runtime] Metrics server error"),
                Err(e) => warn!(error = %e, "[runtime] Metrics server task failed"),
                Ok(Ok(())) => {}
            }
        }

        driven.context("batch extension halted")?;
        info!("[runtime] Shutdown complete");
        Ok(())
    }

    fn log_startup(&self) {
        let config = &self.config;
        info!("===========================================");
        info!("  Sequencer Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("  Attested oracle price extensions");
        info!("===========================================");
        info!(
            listen = %config.server.listen_address(),
            rollup_id = %config.server.rollup_id,
            "[runtime] Sequencing server"
        );
        info!(
            da_address = %config.da.address,
            namespace = %config.da.namespace,
            db_path = %config.db_path,
            "[runtime] Data availability"
        );
        info!(
            oracle = %config.oracle.address,
            side_channel = self.source.supports_side_channel(),
            backend = %config.attestation.backend,
            on_attestation_failure = %config.producer.on_attestation_failure,
            batch_time_ms = config.batch_time.as_millis() as u64,
            "[runtime] Oracle extension"
        );
        if config.attestation.accept_degraded_tcb {
            warn!("[runtime] Degraded TCB levels are accepted");
        }
        if config.attestation.allow_debug_enclave {
            warn!("[runtime] Debug enclaves are accepted");
        }
    }
}

/// Attestation backend selected by the configuration.
pub fn build_backend(config: &RuntimeConfig) -> Result<Arc<dyn AttestationBackend>> {
    match config.attestation.backend {
        BackendKind::Dcap => {
            let url = config
                .attestation
                .dcap_url
                .clone()
                .context("attestation.dcap_url is required for the dcap backend")?;
            let backend = DcapServiceBackend::new(
                url,
                Duration::from_millis(config.attestation.request_timeout_ms),
            )
            .context("failed to create DCAP backend")?;
            Ok(Arc::new(backend))
        }
        BackendKind::Synthetic => {
            warn!("[runtime] Using the synthetic attestation backend; reports are not hardware-backed");
            Ok(Arc::new(SyntheticBackend::new()))
        }
    }
}
