//! Run configuration: the full set of user-chosen modifiers for one run,
//! passed by value into every valuation call. The engine holds no ambient
//! configuration state.

use crate::core::constants::{
    DEFAULT_BOOSTER_BONUS, DEFAULT_SERVER, DEFAULT_STASIS, LEVEL_RANGES, OGREST_BOOSTER_BONUS,
    OGREST_SERVERS, RIFT_LEGENDARY_WAVES, RIFT_ULTIMATE_LEGENDARY_WAVES,
    RIFT_ULTIMATE_WAVE_BONUS_PERCENT, RIFT_WAVE_BONUS_PERCENT,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub is_rift: bool,
    pub is_ultimate: bool,
    pub stasis: u8,
    pub steles: u8,
    pub stele_intervention: u8,
    pub is_modulated: bool,
    pub is_booster: bool,
    pub intervention: bool,
    pub server: String,
    /// Rift wave the run starts on (1-based).
    pub starting_wave: u32,
    pub waves_completed: u32,
    /// How many times the activity repeats over the evaluation period.
    pub cycles: u32,
    pub min_item_profit: i64,
    pub min_drop_rate_percent: f64,
    pub min_activity_total: i64,
    /// Indices into [`LEVEL_RANGES`]; empty selection hides every activity.
    pub level_ranges: Vec<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            is_rift: false,
            is_ultimate: false,
            stasis: DEFAULT_STASIS,
            steles: 0,
            stele_intervention: 0,
            is_modulated: true,
            is_booster: true,
            intervention: false,
            server: DEFAULT_SERVER.to_string(),
            starting_wave: 1,
            waves_completed: 0,
            cycles: 1,
            min_item_profit: 0,
            min_drop_rate_percent: 0.0,
            min_activity_total: 0,
            level_ranges: (0..LEVEL_RANGES.len()).collect(),
        }
    }
}

impl RunConfig {
    /// Default dungeon run.
    pub fn dungeon() -> Self {
        Self::default()
    }

    /// Default rift run: starts at wave 1 with enough waves completed to
    /// unlock legendary loot (4 for ultimate rifts, 9 otherwise).
    pub fn rift(is_ultimate: bool) -> Self {
        Self {
            is_rift: true,
            is_ultimate,
            waves_completed: if is_ultimate {
                RIFT_ULTIMATE_LEGENDARY_WAVES
            } else {
                RIFT_LEGENDARY_WAVES
            },
            ..Self::default()
        }
    }

    /// Booster multiplier resolved for this server family; 1.0 when off.
    pub fn booster_bonus(&self) -> f64 {
        if !self.is_booster {
            return 1.0;
        }
        if OGREST_SERVERS.contains(&self.server.as_str()) {
            OGREST_BOOSTER_BONUS
        } else {
            DEFAULT_BOOSTER_BONUS
        }
    }

    /// The wave the run ends on. A starting wave of 0 counts as 1.
    pub fn final_wave(&self) -> u32 {
        self.starting_wave.max(1) + self.waves_completed
    }

    /// Rate bonus percent granted per completed rift wave.
    pub fn wave_bonus_percent(&self) -> f64 {
        if self.is_ultimate {
            RIFT_ULTIMATE_WAVE_BONUS_PERCENT
        } else {
            RIFT_WAVE_BONUS_PERCENT
        }
    }

    /// Canonical cache key over the fields that feed the rate/eligibility/
    /// quantity pipeline. Per-kind: a dungeon key carries no wave fields and
    /// a rift key no stasis or stele fields, so irrelevant edits never miss.
    /// The booster multiplier is stored resolved, so servers sharing a
    /// booster family share entries. Display fields never enter the key.
    pub fn fingerprint(&self) -> ConfigFingerprint {
        let booster_pct = (self.booster_bonus() * 100.0).round() as u16;
        if self.is_rift {
            ConfigFingerprint::Rift {
                ultimate: self.is_ultimate,
                starting_wave: self.starting_wave.max(1),
                waves_completed: self.waves_completed,
                booster_pct,
                cycles: self.cycles,
            }
        } else {
            ConfigFingerprint::Dungeon {
                stasis: self.stasis,
                steles: self.steles,
                stele_intervention: self.stele_intervention,
                modulated: self.is_modulated,
                intervention: self.intervention,
                booster_pct,
                cycles: self.cycles,
            }
        }
    }

    /// Fixed-point key over the item-level thresholds that shape the ranked,
    /// filtered item list (and therefore the cached priced valuation).
    pub fn filter_fingerprint(&self) -> FilterFingerprint {
        FilterFingerprint {
            min_item_profit: self.min_item_profit,
            min_drop_rate_milli: (self.min_drop_rate_percent.max(0.0) * 1000.0).round() as u64,
        }
    }

    /// Compact human label for this configuration.
    /// Dungeon: "M S10 ST4 STI2 B". Rift: "V1+10→V11 +80%".
    pub fn summary(&self) -> String {
        if self.is_rift {
            let start = self.starting_wave.max(1);
            let final_wave = self.final_wave();
            let bonus = (final_wave - 1) as f64 * self.wave_bonus_percent();
            return format!(
                "V{}+{}→V{} +{}%",
                start, self.waves_completed, final_wave, bonus as u32
            );
        }

        let mut parts = vec![
            if self.is_modulated { "M" } else { "NM" }.to_string(),
            format!("S{}", self.stasis),
        ];
        if self.steles > 0 {
            parts.push(format!("ST{}", self.steles));
        }
        if self.stele_intervention > 0 {
            parts.push(format!("STI{}", self.stele_intervention));
        }
        if self.is_booster {
            parts.push("B".to_string());
        }
        parts.join(" ")
    }
}

/// Price-independent pipeline cache key. See [`RunConfig::fingerprint`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigFingerprint {
    Dungeon {
        stasis: u8,
        steles: u8,
        stele_intervention: u8,
        modulated: bool,
        intervention: bool,
        booster_pct: u16,
        cycles: u32,
    },
    Rift {
        ultimate: bool,
        starting_wave: u32,
        waves_completed: u32,
        booster_pct: u16,
        cycles: u32,
    },
}

/// Item-threshold part of the priced-layer cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterFingerprint {
    pub min_item_profit: i64,
    /// Minimum drop rate in thousandths of a percent.
    pub min_drop_rate_milli: u64,
}

/// How many runs fit in one hour for a given run duration, rounded down.
/// Returns 0 for a zero-minute duration.
pub fn iterations_per_hour(minutes: u32) -> u32 {
    if minutes == 0 {
        return 0;
    }
    60 / minutes
}
