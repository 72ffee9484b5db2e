//! Inbound ports (driving side - API)

use crate::error::Result;
use shared_types::{BlockContext, FinalizeBlockRequest, PreBlockResponse};

/// Primary API: block pre-processing hook called by the execution runtime
///
/// Called exactly once per height, before any state mutation that depends
/// on updated prices.
pub trait PreBlocker: Send + Sync {
    /// Process the block. `request` is `None` when the runtime delivered no
    /// finalize-block request, which is an error.
    fn pre_block(
        &self,
        ctx: &BlockContext,
        request: Option<&FinalizeBlockRequest>,
    ) -> Result<PreBlockResponse>;
}
