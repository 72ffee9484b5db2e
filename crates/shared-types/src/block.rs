//! # Block Execution Types
//!
//! The slice of the execution runtime's block context that the pre-block
//! hook needs: the height and time of the block being finalized, the mode
//! it is executing in, and the ordered transactions of the batch.

use chrono::{DateTime, Utc};

/// Mode the execution runtime is running the block in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecMode {
    /// Transaction validity check (mempool admission).
    Check,
    /// Re-check after a commit.
    ReCheck,
    /// Simulation (gas estimation, queries).
    Simulate,
    /// Proposal preparation.
    PrepareProposal,
    /// Proposal processing.
    ProcessProposal,
    /// Block finalization. The only mode that records metrics.
    #[default]
    Finalize,
}

/// Execution context for the block being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockContext {
    /// Height of the block.
    pub height: u64,
    /// Header time of the block.
    pub time: DateTime<Utc>,
    /// Execution mode.
    pub mode: ExecMode,
}

impl BlockContext {
    /// Create a finalize-mode context.
    pub fn finalize(height: u64, time: DateTime<Utc>) -> Self {
        Self {
            height,
            time,
            mode: ExecMode::Finalize,
        }
    }

    /// Whether metrics should be recorded for this context.
    pub fn is_finalize(&self) -> bool {
        self.mode == ExecMode::Finalize
    }
}

/// Request delivered by the execution runtime when finalizing a block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FinalizeBlockRequest {
    /// Height of the block.
    pub height: u64,
    /// Ordered transactions. Slot 0 carries the framed oracle payload.
    pub txs: Vec<Vec<u8>>,
}

/// Response returned by the pre-block hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreBlockResponse {
    /// Set when an upstream hook changed consensus parameters.
    pub consensus_params_changed: bool,
}
