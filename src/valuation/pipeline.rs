//! The valuation pipeline: quantity projection, per-item aggregation,
//! pricing, filtering and ranking, and the activity-level rollup.

use super::config::RunConfig;
use super::rates::{adjust_rate, boost_is_eligible, is_eligible};
use crate::catalog::index::{ActivityLoot, BaseLootRecord, RateBoost};
use crate::catalog::types::{ActivityId, ItemId, PriceList, Rarity};
use crate::core::constants::LEVEL_RANGES;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Price-independent aggregate for one item in one activity. This is the
/// value cached across server switches: everything except the price column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemYield {
    pub item_id: ItemId,
    /// Effective drop rate, capped at 1 across all drop sources.
    pub rate: f64,
    /// Expected quantity over the whole evaluation period.
    pub quantity: f64,
    pub rarity: Rarity,
    pub stele: u8,
    pub stele_intervention: u8,
}

/// One ranked row of an activity's breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedItemYield {
    pub item_id: ItemId,
    pub rate: f64,
    pub quantity: f64,
    pub rarity: Rarity,
    pub stele: u8,
    pub stele_intervention: u8,
    pub unit_price: i64,
    /// floor(unit_price * quantity), never negative.
    pub subtotal: i64,
}

impl ComputedItemYield {
    /// Stele annotation for display, e.g. ", st. 2, st.i. 1"; empty when the
    /// item has no stele requirements.
    pub fn stele_summary(&self) -> String {
        let mut parts = Vec::new();
        if self.stele > 0 {
            parts.push(format!("st. {}", self.stele));
        }
        if self.stele_intervention > 0 {
            parts.push(format!("st.i. {}", self.stele_intervention));
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!(", {}", parts.join(", "))
        }
    }
}

/// The final per-activity result: ranked item breakdown plus total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityValuation {
    pub activity_id: ActivityId,
    pub level: u32,
    pub items: Vec<ComputedItemYield>,
    pub total_value: i64,
}

/// Expected quantity contributed by one drop source over the evaluation
/// period. Legendary items drop once per team, so they skip the player
/// multiplier; rifts traverse every completed wave.
pub fn project_quantity(
    record: &BaseLootRecord,
    effective_rate: f64,
    players: u32,
    config: &RunConfig,
) -> f64 {
    let base = record.quantity * record.monster_count as f64;
    let per_run = if record.rarity.single_drop_per_team() {
        base
    } else {
        base * players as f64
    };
    let wave_factor = if config.is_rift {
        config.waves_completed.max(1) as f64
    } else {
        1.0
    };
    per_run * config.cycles as f64 * wave_factor * effective_rate
}

/// Activity-wide rate multiplier from the eligible rate boosts:
/// sum of adjusted proc rate times the granted percent.
pub fn bonus_rate_multiplier(boosts: &[RateBoost], config: &RunConfig) -> f64 {
    boosts
        .iter()
        .filter(|boost| boost_is_eligible(boost, config))
        .map(|boost| adjust_rate(boost.rate, config) * boost.percent / 100.0)
        .sum()
}

/// Aggregates all eligible drop sources of an activity into one record per
/// item, in first-appearance order (ranking happens after pricing).
///
/// Rates from multiple sources of the same item add up and are capped at 1.
/// That is a deliberate simplification carried over from the game data's
/// conventions, not an independent-event union.
pub fn compute_item_yields(loot: &ActivityLoot, config: &RunConfig) -> Vec<ItemYield> {
    let bonus = bonus_rate_multiplier(&loot.rate_boosts, config);

    let mut order: Vec<ItemId> = Vec::new();
    let mut per_item: HashMap<ItemId, ItemYield> = HashMap::new();

    for record in loot.records.iter().filter(|r| is_eligible(r, config)) {
        let effective_rate = (adjust_rate(record.rate, config) * (1.0 + bonus)).min(1.0);
        let quantity = project_quantity(record, effective_rate, loot.players, config);

        let entry = per_item.entry(record.item_id).or_insert_with(|| {
            order.push(record.item_id);
            ItemYield {
                item_id: record.item_id,
                rate: 0.0,
                quantity: 0.0,
                rarity: record.rarity,
                stele: record.stele,
                stele_intervention: record.stele_intervention,
            }
        });
        entry.quantity += quantity;
        entry.rate = (entry.rate + effective_rate).min(1.0);
    }

    order
        .into_iter()
        .filter_map(|item_id| per_item.remove(&item_id))
        .collect()
}

/// Prices the aggregated yields, drops rows under the item thresholds and
/// ranks the rest by subtotal, then rate, then quantity (all descending).
pub fn price_and_rank(
    activity_id: ActivityId,
    level: u32,
    yields: &[ItemYield],
    prices: &PriceList,
    config: &RunConfig,
) -> ActivityValuation {
    let min_rate = config.min_drop_rate_percent.max(0.0) / 100.0;

    let mut items: Vec<ComputedItemYield> = yields
        .iter()
        .map(|y| {
            let unit_price = prices.price_of(y.item_id);
            let subtotal = (unit_price as f64 * y.quantity).floor().max(0.0) as i64;
            ComputedItemYield {
                item_id: y.item_id,
                rate: y.rate,
                quantity: y.quantity,
                rarity: y.rarity,
                stele: y.stele,
                stele_intervention: y.stele_intervention,
                unit_price,
                subtotal,
            }
        })
        .filter(|item| item.subtotal >= config.min_item_profit && item.rate >= min_rate)
        .collect();

    items.sort_by(|a, b| {
        b.subtotal
            .cmp(&a.subtotal)
            .then(b.rate.total_cmp(&a.rate))
            .then(b.quantity.total_cmp(&a.quantity))
    });

    let total_value = items.iter().map(|item| item.subtotal).sum();

    ActivityValuation {
        activity_id,
        level,
        items,
        total_value,
    }
}

/// Activity-level result filter: an empty level-range selection hides
/// everything; otherwise the total must clear the threshold and, unless all
/// ranges are selected, the activity level must fall inside a selected one.
pub fn passes_activity_filters(level: u32, total_value: i64, config: &RunConfig) -> bool {
    if config.level_ranges.is_empty() {
        return false;
    }
    if total_value < config.min_activity_total {
        return false;
    }
    if config.level_ranges.len() < LEVEL_RANGES.len() {
        let in_range = config.level_ranges.iter().any(|&index| {
            LEVEL_RANGES
                .get(index)
                .map_or(false, |&(min, max)| level >= min && level <= max)
        });
        if !in_range {
            return false;
        }
    }
    true
}
