//! Drop-rate adjustment and loot eligibility.
//!
//! Both are pure functions over (catalog record, run configuration); the
//! pipeline applies them to every drop source before aggregation.

use super::config::RunConfig;
use crate::catalog::index::{BaseLootRecord, RateBoost};
use crate::catalog::types::Rarity;
use crate::core::constants::{
    HIGH_RARITY_MIN_STASIS, INTERVENTION_RATE_MULTIPLIER, RIFT_LEGENDARY_WAVES,
    RIFT_ULTIMATE_LEGENDARY_WAVES, STASIS_BONUS_MODULATED, STASIS_BONUS_NON_MODULATED,
};

/// Stasis drop-rate factor. Level 0 and out-of-table levels yield 0:
/// nothing drops below the minimum stasis.
pub fn stasis_factor(stasis: u8, modulated: bool) -> f64 {
    let table = if modulated {
        &STASIS_BONUS_MODULATED
    } else {
        &STASIS_BONUS_NON_MODULATED
    };
    table.get(stasis as usize).copied().unwrap_or(0.0)
}

/// Adjusts a base drop rate for the run configuration.
///
/// Rift rates accrue a per-wave bonus and are deliberately NOT capped here:
/// the aggregator caps them after the activity-wide rate boost applies.
/// Dungeon rates are capped at 1 immediately.
pub fn adjust_rate(base_rate: f64, config: &RunConfig) -> f64 {
    let booster = config.booster_bonus();

    if config.is_rift {
        let wave_multiplier =
            1.0 + (config.final_wave() - 1) as f64 * config.wave_bonus_percent() / 100.0;
        return base_rate * wave_multiplier * booster;
    }

    let stasis = stasis_factor(config.stasis, config.is_modulated);
    let intervention = if config.intervention {
        INTERVENTION_RATE_MULTIPLIER
    } else {
        1.0
    };
    (base_rate * stasis * booster * intervention).min(1.0)
}

fn gates_pass(
    stele: u8,
    stele_intervention: u8,
    stasis_requirement: Option<u8>,
    rarity: Rarity,
    config: &RunConfig,
) -> bool {
    if config.is_rift {
        // Stele and stasis gating does not apply to rifts; only
        // legendary-and-above loot is locked behind a wave threshold.
        if rarity.rift_wave_gated() {
            let required = if config.is_ultimate {
                RIFT_ULTIMATE_LEGENDARY_WAVES
            } else {
                RIFT_LEGENDARY_WAVES
            };
            return config.waves_completed >= required;
        }
        return true;
    }

    if stele > config.steles {
        return false;
    }
    // Without an active intervention only requirement-free rows qualify
    if !config.intervention && stele_intervention > 0 {
        return false;
    }
    if stele_intervention > config.stele_intervention {
        return false;
    }
    if let Some(required) = stasis_requirement {
        if config.stasis < required {
            return false;
        }
    }
    if rarity.requires_high_stasis() && config.stasis < HIGH_RARITY_MIN_STASIS {
        return false;
    }

    true
}

/// Whether a loot record can drop at all under this configuration.
/// Ineligible records are excluded from aggregation entirely, not rated 0.
pub fn is_eligible(record: &BaseLootRecord, config: &RunConfig) -> bool {
    gates_pass(
        record.stele,
        record.stele_intervention,
        record.stasis,
        record.rarity,
        config,
    )
}

/// Rate boosts obey the same gating as ordinary loot rows.
pub fn boost_is_eligible(boost: &RateBoost, config: &RunConfig) -> bool {
    gates_pass(
        boost.stele,
        boost.stele_intervention,
        boost.stasis,
        Rarity::Unrated,
        config,
    )
}
