//! In-memory price store

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use shared_types::{CurrencyPair, QuotePrice};

use crate::error::StoreError;
use crate::ports::PriceStore;

/// Price store backed by ordered maps.
///
/// Registered pairs are returned in sorted order, which keeps commit passes
/// deterministic.
#[derive(Debug, Default)]
pub struct InMemoryPriceStore {
    pairs: RwLock<BTreeSet<CurrencyPair>>,
    prices: RwLock<BTreeMap<CurrencyPair, QuotePrice>>,
    fail_writes: AtomicBool,
}

impl InMemoryPriceStore {
    /// Empty store with no registered pairs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the given pairs registered.
    pub fn with_pairs(pairs: impl IntoIterator<Item = CurrencyPair>) -> Self {
        let store = Self::new();
        store.pairs.write().extend(pairs);
        store
    }

    /// Register a pair.
    pub fn register(&self, pair: CurrencyPair) {
        self.pairs.write().insert(pair);
    }

    /// Current price of a pair.
    pub fn price(&self, pair: &CurrencyPair) -> Option<QuotePrice> {
        self.prices.read().get(pair).cloned()
    }

    /// Snapshot of all stored prices.
    pub fn prices(&self) -> BTreeMap<CurrencyPair, QuotePrice> {
        self.prices.read().clone()
    }

    /// Make every subsequent write fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl PriceStore for InMemoryPriceStore {
    fn currency_pairs(&self) -> Result<Vec<CurrencyPair>, StoreError> {
        Ok(self.pairs.read().iter().cloned().collect())
    }

    fn set_price(&self, pair: &CurrencyPair, price: QuotePrice) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        if !self.pairs.read().contains(pair) {
            return Err(StoreError::Rejected {
                pair: pair.to_string(),
                reason: "currency pair not registered".into(),
            });
        }
        self.prices.write().insert(pair.clone(), price);
        Ok(())
    }
}
