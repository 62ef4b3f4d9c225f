//! Engine façade: owns the base loot index, the active price set and the
//! valuation cache. Strictly pull-based; callers trigger recomputation by
//! calling [`Valuator::valuate`] and drive invalidation explicitly when the
//! catalog or the price set changes.

use super::cache::{ValuationCache, ValuationKey, YieldKey};
use super::config::RunConfig;
use super::pipeline::{
    compute_item_yields, passes_activity_filters, price_and_rank, ActivityValuation,
};
use crate::catalog::index::LootIndex;
use crate::catalog::types::{ActivityId, Catalog, PriceList};
use std::sync::Arc;
use tracing::info;

pub struct Valuator {
    index: LootIndex,
    prices: PriceList,
    cache: ValuationCache,
}

impl Valuator {
    pub fn new(catalog: &Catalog, prices: PriceList) -> Self {
        Self {
            index: LootIndex::build(catalog),
            prices,
            cache: ValuationCache::new(),
        }
    }

    pub fn index(&self) -> &LootIndex {
        &self.index
    }

    pub fn prices(&self) -> &PriceList {
        &self.prices
    }

    /// Swaps in a freshly built index and drops every cached value. The new
    /// index is built completely before it replaces the old one, so no
    /// caller ever observes a partial index.
    pub fn rebuild_index(&mut self, catalog: &Catalog) {
        self.index = LootIndex::build(catalog);
        self.cache.clear_all();
        info!("catalog reloaded, valuation cache invalidated");
    }

    /// Replaces the price set (server switch). Only the priced cache layer
    /// is dropped; rate and quantity work is reused as-is.
    pub fn set_prices(&mut self, prices: PriceList) {
        self.prices = prices;
        self.cache.clear_priced();
        info!(
            "price set replaced (version {}), priced layer invalidated",
            self.prices.version()
        );
    }

    /// Values one activity under the given configuration.
    ///
    /// Returns `None` for an activity id with no index entry — a normal,
    /// expected outcome, not a fault. Repeated calls with an equivalent
    /// configuration return the same shared valuation without rerunning the
    /// pipeline.
    pub fn valuate(
        &self,
        activity_id: ActivityId,
        config: &RunConfig,
    ) -> Option<Arc<ActivityValuation>> {
        let loot = self.index.get(activity_id)?;
        let fingerprint = config.fingerprint();

        let yields = self.cache.yields_or_compute(
            YieldKey {
                activity_id,
                config: fingerprint.clone(),
            },
            || compute_item_yields(loot, config),
        );

        let key = ValuationKey {
            activity_id,
            config: fingerprint,
            filters: config.filter_fingerprint(),
            price_version: self.prices.version(),
        };
        Some(self.cache.valuation_or_compute(key, || {
            price_and_rank(activity_id, loot.level, &yields, &self.prices, config)
        }))
    }

    /// Values every activity in catalog order and applies the
    /// activity-level filters (minimum total, level ranges).
    pub fn valuate_all(&self, config: &RunConfig) -> Vec<Arc<ActivityValuation>> {
        self.index
            .activities()
            .filter_map(|loot| self.valuate(loot.activity_id, config))
            .filter(|valuation| {
                passes_activity_filters(valuation.level, valuation.total_value, config)
            })
            .collect()
    }

    /// (yield entries, valuation entries) currently cached.
    pub fn cache_entry_counts(&self) -> (usize, usize) {
        (
            self.cache.yield_entry_count(),
            self.cache.valuation_entry_count(),
        )
    }
}
