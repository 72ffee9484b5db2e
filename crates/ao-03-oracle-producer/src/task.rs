//! Background oracle connection task
//!
//! Starts the connection once, then periodically issues a health query.
//! A failed query marks the connection down and triggers a reconnect.
//! The task exits when the shutdown signal flips to `true`.

use std::time::Duration;

use oracle_telemetry::ORACLE_CONNECTION_UP;
use shared_types::QueryPricesRequest;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::OracleSource;

/// Owned background refresh loop for one oracle connection.
pub struct OracleTask {
    source: OracleSource,
    refresh_interval: Duration,
    query_timeout: Duration,
    shutdown: watch::Receiver<bool>,
}

impl OracleTask {
    /// Create a task; nothing runs until [`OracleTask::spawn`].
    pub fn new(
        source: OracleSource,
        refresh_interval: Duration,
        query_timeout: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            source,
            refresh_interval,
            query_timeout,
            shutdown,
        }
    }

    /// Run the loop on the Tokio runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run the loop until shutdown.
    pub async fn run(mut self) {
        let mut connected = self.connect().await;
        let mut ticker = tokio::time::interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        info!("[ao-03] Oracle task shutting down");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if !connected {
                        connected = self.connect().await;
                        continue;
                    }
                    connected = self.health_check().await;
                }
            }
        }

        ORACLE_CONNECTION_UP.set(0.0);
    }

    async fn connect(&self) -> bool {
        match self.source.start().await {
            Ok(()) => {
                ORACLE_CONNECTION_UP.set(1.0);
                true
            }
            Err(e) => {
                warn!(error = %e, "[ao-03] Oracle connection failed, will retry");
                ORACLE_CONNECTION_UP.set(0.0);
                false
            }
        }
    }

    async fn health_check(&self) -> bool {
        let query = self.source.prices(QueryPricesRequest::default());
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(Ok(response)) => {
                debug!(pairs = response.prices.len(), "[ao-03] Oracle healthy");
                ORACLE_CONNECTION_UP.set(1.0);
                true
            }
            Ok(Err(e)) => {
                warn!(error = %e, "[ao-03] Oracle health query failed, reconnecting");
                ORACLE_CONNECTION_UP.set(0.0);
                self.connect().await
            }
            Err(_) => {
                warn!("[ao-03] Oracle health query timed out, reconnecting");
                ORACLE_CONNECTION_UP.set(0.0);
                self.connect().await
            }
        }
    }
}
