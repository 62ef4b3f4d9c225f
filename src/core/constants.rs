// Drop-rate stasis modulation
// Index = stasis level (0-10). Level 0 means the run pays out nothing.
pub const STASIS_BONUS_MODULATED: [f64; 11] = [
    0.0, 0.60, 1.00, 1.40, 2.50, 4.00, 5.50, 6.00, 6.50, 6.80, 7.10,
];
pub const STASIS_BONUS_NON_MODULATED: [f64; 11] = [
    0.0, 0.60, 1.00, 1.20, 1.60, 1.88, 2.00, 2.05, 2.10, 2.15, 2.20,
];
pub const MAX_STASIS: u8 = 10;

// Booster bonus by server family
pub const OGREST_SERVERS: [&str; 2] = ["ogrest", "neo-ogrest"];
pub const OGREST_BOOSTER_BONUS: f64 = 1.50;
pub const DEFAULT_BOOSTER_BONUS: f64 = 1.25;

// Dungeon intervention
pub const INTERVENTION_RATE_MULTIPLIER: f64 = 1.10;

// Rift wave progression
pub const RIFT_WAVE_BONUS_PERCENT: f64 = 8.0;
pub const RIFT_ULTIMATE_WAVE_BONUS_PERCENT: f64 = 18.0;
// Waves required before legendary-or-better loot becomes available
pub const RIFT_LEGENDARY_WAVES: u32 = 9;
pub const RIFT_ULTIMATE_LEGENDARY_WAVES: u32 = 4;

// Rarity gating
pub const HIGH_RARITY_MIN_STASIS: u8 = 3;

// Team sizes when the catalog does not specify one
pub const DUNGEON_DEFAULT_PLAYERS: u32 = 3;
pub const RIFT_DEFAULT_PLAYERS: u32 = 4;

// Catalog sentinel: loot rows with this item id are a percentage drop-rate
// bonus for the whole activity, not a tradeable item. The index builder
// converts them into structured rate boosts.
pub const BONUS_RATE_ITEM_ID: u32 = 99999;

// Level brackets selectable in the activity filter: (min, max) inclusive
pub const LEVEL_RANGES: [(u32, u32); 8] = [
    (1, 35),
    (36, 65),
    (66, 95),
    (96, 125),
    (126, 155),
    (156, 185),
    (186, 215),
    (216, 245),
];

// Run configuration defaults
pub const DEFAULT_STASIS: u8 = 3;
pub const DEFAULT_SERVER: &str = "pandora";
pub const DEFAULT_RUN_MINUTES: u32 = 10;

// Valuation cache capacities (entries, per layer)
pub const YIELD_CACHE_CAPACITY: usize = 512;
pub const VALUATION_CACHE_CAPACITY: usize = 512;
