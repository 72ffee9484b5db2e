//! Outbound ports (driven side - SPI)

use crate::error::StoreError;
use shared_types::{BlockContext, CurrencyPair, PreBlockResponse, QuotePrice};

/// Port: Chain-state price store
///
/// Calls happen on the block-execution path, one height at a time.
pub trait PriceStore: Send + Sync {
    /// All currency pairs registered in chain state.
    fn currency_pairs(&self) -> Result<Vec<CurrencyPair>, StoreError>;

    /// Store the price for a registered pair.
    fn set_price(&self, pair: &CurrencyPair, price: QuotePrice) -> Result<(), StoreError>;
}

/// Port: Hook that must run before prices are written
///
/// Typically the module manager's own pre-block step, which may apply
/// state migrations that change the schema prices are written into.
pub trait UpgradeHook: Send + Sync {
    /// Run the hook for the block.
    fn pre_block(&self, ctx: &BlockContext) -> Result<PreBlockResponse, String>;
}

/// Hook that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopUpgradeHook;

impl UpgradeHook for NoopUpgradeHook {
    fn pre_block(&self, _ctx: &BlockContext) -> Result<PreBlockResponse, String> {
        Ok(PreBlockResponse::default())
    }
}
