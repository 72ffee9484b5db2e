//! Inbound ports (driving side - API)

use crate::error::Result;
use async_trait::async_trait;

/// Primary API: batch extension capability consumed by the sequencer
///
/// Both calls run once per batch-building cycle and return within the
/// producer's deadline. An empty vector means "no extension".
#[async_trait]
pub trait BatchExtender: Send + Sync {
    /// Bytes to place at the start of the batch.
    async fn head(&self, max_bytes: u64) -> Result<Vec<u8>>;

    /// Bytes to place at the end of the batch.
    async fn tail(&self, max_bytes: u64) -> Result<Vec<u8>>;
}
