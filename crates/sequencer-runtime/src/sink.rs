//! Batch sinks
//!
//! Stand-ins for the sequencer that consumes batch extensions. The logging
//! sink is the default; the recording sink keeps everything for tests.

use async_trait::async_trait;
use ao_03_oracle_producer::{BatchExtension, BatchSink, OracleError, Result};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Sink that logs every extension it receives.
#[derive(Debug, Clone)]
pub struct LoggingBatchSink {
    rollup_id: String,
}

impl LoggingBatchSink {
    /// Create a sink tagging its logs with `rollup_id`.
    pub fn new(rollup_id: impl Into<String>) -> Self {
        Self {
            rollup_id: rollup_id.into(),
        }
    }
}

#[async_trait]
impl BatchSink for LoggingBatchSink {
    async fn submit(&self, extension: BatchExtension) -> Result<()> {
        if extension.is_empty() {
            debug!(rollup_id = %self.rollup_id, "[runtime] Batch without oracle extension");
            return Ok(());
        }
        let preview = &extension.head[..extension.head.len().min(16)];
        info!(
            rollup_id = %self.rollup_id,
            head_bytes = extension.head.len(),
            tail_bytes = extension.tail.len(),
            head_prefix = %hex::encode(preview),
            "[runtime] Batch extended"
        );
        Ok(())
    }
}

/// Sink that stores every extension in submission order.
#[derive(Debug, Default)]
pub struct RecordingBatchSink {
    batches: Mutex<Vec<BatchExtension>>,
    reject: bool,
}

impl RecordingBatchSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that refuses every extension.
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    /// Extensions received so far.
    pub fn batches(&self) -> Vec<BatchExtension> {
        self.batches.lock().clone()
    }

    /// Number of extensions received.
    pub fn len(&self) -> usize {
        self.batches.lock().len()
    }

    /// True when nothing was received.
    pub fn is_empty(&self) -> bool {
        self.batches.lock().is_empty()
    }
}

#[async_trait]
impl BatchSink for RecordingBatchSink {
    async fn submit(&self, extension: BatchExtension) -> Result<()> {
        if self.reject {
            return Err(OracleError::Sink("sequencer unavailable".into()));
        }
        self.batches.lock().push(extension);
        Ok(())
    }
}
