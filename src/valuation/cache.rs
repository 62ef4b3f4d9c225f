//! Two-level memoization for the valuation pipeline.
//!
//! The yields layer caches the price-independent work (eligibility, rate
//! adjustment, quantity projection) so a server switch only re-prices. The
//! valuation layer caches the final ranked breakdown, keyed additionally by
//! the item thresholds and the price snapshot version, so a stale price set
//! can never satisfy a lookup.

use super::config::{ConfigFingerprint, FilterFingerprint};
use super::pipeline::{ActivityValuation, ItemYield};
use crate::catalog::types::ActivityId;
use crate::core::constants::{VALUATION_CACHE_CAPACITY, YIELD_CACHE_CAPACITY};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct YieldKey {
    pub activity_id: ActivityId,
    pub config: ConfigFingerprint,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValuationKey {
    pub activity_id: ActivityId,
    pub config: ConfigFingerprint,
    pub filters: FilterFingerprint,
    pub price_version: i64,
}

pub struct ValuationCache {
    yields: Mutex<LruCache<YieldKey, Arc<Vec<ItemYield>>>>,
    valuations: Mutex<LruCache<ValuationKey, Arc<ActivityValuation>>>,
}

impl ValuationCache {
    pub fn new() -> Self {
        Self::with_capacity(YIELD_CACHE_CAPACITY, VALUATION_CACHE_CAPACITY)
    }

    pub fn with_capacity(yield_entries: usize, valuation_entries: usize) -> Self {
        Self {
            yields: Mutex::new(LruCache::new(
                NonZeroUsize::new(yield_entries).unwrap_or(NonZeroUsize::MIN),
            )),
            valuations: Mutex::new(LruCache::new(
                NonZeroUsize::new(valuation_entries).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    /// Price-independent layer. Identical keys return the same shared value
    /// without invoking `compute` again. The lock is held across the compute,
    /// which keeps the read-if-absent-then-write sequence atomic.
    pub fn yields_or_compute(
        &self,
        key: YieldKey,
        compute: impl FnOnce() -> Vec<ItemYield>,
    ) -> Arc<Vec<ItemYield>> {
        let mut cache = self.yields.lock();
        if let Some(hit) = cache.get(&key) {
            debug!("yield cache hit for activity {}", key.activity_id);
            return Arc::clone(hit);
        }
        debug!("yield cache miss for activity {}", key.activity_id);
        let value = Arc::new(compute());
        cache.put(key, Arc::clone(&value));
        value
    }

    /// Price-dependent layer.
    pub fn valuation_or_compute(
        &self,
        key: ValuationKey,
        compute: impl FnOnce() -> ActivityValuation,
    ) -> Arc<ActivityValuation> {
        let mut cache = self.valuations.lock();
        if let Some(hit) = cache.get(&key) {
            debug!("valuation cache hit for activity {}", key.activity_id);
            return Arc::clone(hit);
        }
        debug!("valuation cache miss for activity {}", key.activity_id);
        let value = Arc::new(compute());
        cache.put(key, Arc::clone(&value));
        value
    }

    /// Catalog reload: every cached value is derived from the old index.
    pub fn clear_all(&self) {
        self.yields.lock().clear();
        self.valuations.lock().clear();
        info!("valuation cache cleared (both layers)");
    }

    /// Price reload: only the priced layer depends on the price set; the
    /// rate/quantity work stays valid and is reused.
    pub fn clear_priced(&self) {
        self.valuations.lock().clear();
        info!("valuation cache cleared (priced layer only)");
    }

    pub fn yield_entry_count(&self) -> usize {
        self.yields.lock().len()
    }

    pub fn valuation_entry_count(&self) -> usize {
        self.valuations.lock().len()
    }
}

impl Default for ValuationCache {
    fn default() -> Self {
        Self::new()
    }
}
