//! What one commit pass did

use shared_types::{CurrencyPair, QuotePrice};

/// Result of a commit pass over the registered pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Prices written, in registration order.
    pub committed: Vec<(CurrencyPair, QuotePrice)>,
    /// Registered pairs the payload did not quote.
    pub absent: Vec<CurrencyPair>,
    /// Registered pairs quoted with a negative price.
    pub negative: Vec<CurrencyPair>,
}

impl CommitSummary {
    /// True when nothing was written.
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}
