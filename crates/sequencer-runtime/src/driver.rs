//! Batch-extension driver
//!
//! Calls `head`/`tail` once per batch interval and hands the result to the
//! sink. Stops when the shutdown signal flips to `true`, or with an error
//! when the extender halts. Recoverable extender errors cost one batch its
//! oracle extension; critical ones stop the driver.

use std::sync::Arc;
use std::time::Duration;

use ao_03_oracle_producer::{BatchExtender, BatchExtension, BatchSink, OracleError};
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Periodic driver of the batch extension hook.
pub struct BatchDriver {
    extender: Arc<dyn BatchExtender>,
    sink: Arc<dyn BatchSink>,
    batch_time: Duration,
    max_bytes: u64,
    shutdown: watch::Receiver<bool>,
}

impl BatchDriver {
    /// Create a driver; nothing runs until [`BatchDriver::run`].
    pub fn new(
        extender: Arc<dyn BatchExtender>,
        sink: Arc<dyn BatchSink>,
        batch_time: Duration,
        max_bytes: u64,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            extender,
            sink,
            batch_time,
            max_bytes,
            shutdown,
        }
    }

    /// Run until shutdown. Returns the error that halted the producer.
    pub async fn run(mut self) -> Result<(), OracleError> {
        let mut ticker = tokio::time::interval(self.batch_time);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        info!(batch_time_ms = self.batch_time.as_millis() as u64, "[runtime] Batch driver started");

        loop {
            tokio::select! {
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        info!("[runtime] Batch driver shutting down");
                        return Ok(());
                    }
                }
                _ = ticker.tick() => {
                    self.build_batch().await?;
                }
            }
        }
    }

    /// One batch cycle.
    pub async fn build_batch(&self) -> Result<(), OracleError> {
        let head = match self.extender.head(self.max_bytes).await {
            Ok(head) => head,
            Err(e) if e.is_critical() => {
                error!(error = %e, "[runtime] Batch extension halted");
                return Err(e);
            }
            Err(e) => {
                warn!(error = %e, "[runtime] Batch goes out without oracle extension");
                Vec::new()
            }
        };
        let tail = self.extender.tail(self.max_bytes).await?;

        match self.sink.submit(BatchExtension { head, tail }).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "[runtime] Batch sink rejected extension");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "[runtime] Batch sink failed");
                Err(e)
            }
        }
    }
}
