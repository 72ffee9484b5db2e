//! # Block Price Committer Service
//!
//! Pre-block hook writing oracle prices into chain state.
//!
//! ## Pass
//!
//! 1. Reject a missing request.
//! 2. Run the upgrade hook, so migrations apply before price writes.
//! 3. No transactions, or an empty transaction 0 (a batch without an
//!    oracle extension): nothing to do.
//! 4. Decode transaction 0 and parse every entry; any malformed entry
//!    fails the block.
//! 5. For each registered pair: skip if absent, skip if negative, otherwise
//!    write a `QuotePrice` stamped with the block height and time. A write
//!    failure aborts the pass.
//!
//! Metrics are recorded only in finalize mode: latency for every outcome,
//! price gauges only on success.

use std::sync::Arc;
use std::time::Instant;

use num::Signed;
use oracle_telemetry::{ORACLE_PRICE, PREBLOCK_DURATION, PRICES_COMMITTED, PRICES_SKIPPED};
use shared_types::{BlockContext, FinalizeBlockRequest, PreBlockResponse, QuotePrice};
use tracing::{debug, error};

use crate::domain::{decode_oracle_tx, parse_prices, CommitSummary};
use crate::error::{CommitError, Result};
use crate::ports::{PreBlocker, PriceStore, UpgradeHook};

/// Commits oracle prices carried in the first transaction of a block.
pub struct BlockPriceCommitter<S: PriceStore + ?Sized, H: UpgradeHook + ?Sized> {
    store: Arc<S>,
    hook: Arc<H>,
}

impl<S: PriceStore + ?Sized, H: UpgradeHook + ?Sized> BlockPriceCommitter<S, H> {
    /// Create a committer.
    pub fn new(store: Arc<S>, hook: Arc<H>) -> Self {
        Self { store, hook }
    }

    /// Commit the prices in `txs` for the block in `ctx`.
    ///
    /// Pure function of the block contents and the registered pairs: running
    /// it twice for the same block stores the same prices.
    pub fn commit_prices(&self, ctx: &BlockContext, txs: &[Vec<u8>]) -> Result<CommitSummary> {
        let mut summary = CommitSummary::default();

        let Some(oracle_tx) = txs.first() else {
            debug!(height = ctx.height, "[ao-04] No transactions in block, nothing to commit");
            return Ok(summary);
        };
        if oracle_tx.is_empty() {
            debug!(height = ctx.height, "[ao-04] Empty oracle transaction, no price update");
            return Ok(summary);
        }

        let response = decode_oracle_tx(oracle_tx)?;
        let prices = parse_prices(&response.prices)?;

        for pair in self.store.currency_pairs()? {
            let Some(price) = prices.get(&pair) else {
                debug!(currency_pair = %pair, "[ao-04] No price for currency pair");
                summary.absent.push(pair);
                continue;
            };

            if price.is_negative() {
                error!(currency_pair = %pair, price = %price, "[ao-04] Price is negative");
                summary.negative.push(pair);
                continue;
            }

            let Some(magnitude) = price.to_biguint() else {
                summary.negative.push(pair);
                continue;
            };
            let quote = QuotePrice {
                price: magnitude,
                block_height: ctx.height,
                block_timestamp: ctx.time,
            };

            self.store
                .set_price(&pair, quote.clone())
                .inspect_err(|e| {
                    error!(currency_pair = %pair, error = %e, "[ao-04] Failed to set price");
                })?;
            debug!(currency_pair = %pair, quote_price = %quote.price, "[ao-04] Set price");
            summary.committed.push((pair, quote));
        }

        Ok(summary)
    }

    fn record(&self, ctx: &BlockContext, started: Instant, result: &Result<CommitSummary>) {
        if !ctx.is_finalize() {
            return;
        }

        let latency = started.elapsed();
        let status = if result.is_ok() { "success" } else { "failure" };
        PREBLOCK_DURATION
            .with_label_values(&[status])
            .observe(latency.as_secs_f64());
        debug!(
            height = ctx.height,
            latency_ms = latency.as_millis() as u64,
            "[ao-04] Finished executing the pre-block hook"
        );

        if let Ok(summary) = result {
            for (pair, quote) in &summary.committed {
                ORACLE_PRICE
                    .with_label_values(&[&pair.to_string()])
                    .set(quote.approximate());
            }
            PRICES_COMMITTED.inc_by(summary.committed.len() as f64);
            PRICES_SKIPPED
                .with_label_values(&["absent"])
                .inc_by(summary.absent.len() as f64);
            PRICES_SKIPPED
                .with_label_values(&["negative"])
                .inc_by(summary.negative.len() as f64);
        }
    }
}

impl<S: PriceStore + ?Sized, H: UpgradeHook + ?Sized> PreBlocker for BlockPriceCommitter<S, H> {
    fn pre_block(
        &self,
        ctx: &BlockContext,
        request: Option<&FinalizeBlockRequest>,
    ) -> Result<PreBlockResponse> {
        let Some(request) = request else {
            error!(height = ctx.height, "[ao-04] Received nil finalize-block request");
            return Err(CommitError::MissingRequest { height: ctx.height });
        };

        let response = self.hook.pre_block(ctx).map_err(CommitError::Hook)?;

        let started = Instant::now();
        debug!(height = request.height, "[ao-04] Executing the pre-finalize block hook");
        let result = self.commit_prices(ctx, &request.txs);
        self.record(ctx, started, &result);

        if let Err(e) = &result {
            if e.is_payload_error() {
                error!(
                    height = ctx.height,
                    reason = e.label(),
                    error = %e,
                    "[ao-04] Block carries a malformed oracle transaction"
                );
            } else {
                error!(
                    height = ctx.height,
                    reason = e.label(),
                    error = %e,
                    "[ao-04] Failed to commit oracle prices"
                );
            }
        }

        result.map(|_| response)
    }
}
