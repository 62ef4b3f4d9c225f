use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type ActivityId = u32;
pub type ItemId = u32;
pub type MonsterId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    Dungeon,
    Rift,
}

/// A farmable game instance: a dungeon or a wave-based rift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub level: u32,
    pub kind: ActivityKind,
    #[serde(default)]
    pub is_ultimate: bool,
    /// Team size; 0 means "use the default for this activity kind".
    #[serde(default)]
    pub players: u32,
}

impl Activity {
    pub fn is_dungeon(&self) -> bool {
        self.kind == ActivityKind::Dungeon
    }
}

/// Item quality tier. Tiers 0 and 1 both display as common; the gating and
/// scaling rules key off tier 4+ (stasis gate), tier 5 (one drop per team)
/// and tier 5+ (rift wave gate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Unrated = 0,
    Common = 1,
    Unusual = 2,
    Rare = 3,
    Mythical = 4,
    Legendary = 5,
    Relic = 6,
    Souvenir = 7,
}

impl Rarity {
    /// Maps a raw catalog tier to a rarity; unknown tiers fall back to Unrated.
    pub fn from_tier(tier: u8) -> Self {
        match tier {
            1 => Rarity::Common,
            2 => Rarity::Unusual,
            3 => Rarity::Rare,
            4 => Rarity::Mythical,
            5 => Rarity::Legendary,
            6 => Rarity::Relic,
            7 => Rarity::Souvenir,
            _ => Rarity::Unrated,
        }
    }

    pub fn tier(self) -> u8 {
        self as u8
    }

    /// Returns the display name for this rarity tier.
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Unrated | Rarity::Common => "Common",
            Rarity::Unusual => "Unusual",
            Rarity::Rare => "Rare",
            Rarity::Mythical => "Mythical",
            Rarity::Legendary => "Legendary",
            Rarity::Relic => "Relic",
            Rarity::Souvenir => "Souvenir",
        }
    }

    /// Returns the display color (hex) for this rarity tier.
    pub fn color(&self) -> &'static str {
        match self {
            Rarity::Unrated | Rarity::Common => "#FFFFFF",
            Rarity::Unusual => "#00EE8C",
            Rarity::Rare => "#FF913C",
            Rarity::Mythical => "#FFDF78",
            Rarity::Legendary => "#6A42A2",
            Rarity::Relic => "#8DC6E1",
            Rarity::Souvenir => "#FF88B8",
        }
    }

    /// Mythical and above only drop in dungeons running stasis 3+.
    pub fn requires_high_stasis(self) -> bool {
        self > Rarity::Rare
    }

    /// Legendary items drop once per team, regardless of team size.
    pub fn single_drop_per_team(self) -> bool {
        self == Rarity::Legendary
    }

    /// Legendary and above are locked behind a rift wave threshold.
    pub fn rift_wave_gated(self) -> bool {
        self >= Rarity::Legendary
    }
}

impl Default for Rarity {
    fn default() -> Self {
        Rarity::Unrated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub rarity: Rarity,
}

/// One monster species appearing in an activity, with its head count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterGroup {
    pub monster_id: MonsterId,
    pub count: u32,
}

/// One row of a monster's loot table. Missing numeric fields default to 0
/// and a missing stasis requirement means "no record-level requirement".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTableRow {
    pub item_id: ItemId,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub stele: u8,
    #[serde(default)]
    pub stele_intervention: u8,
    #[serde(default)]
    pub stasis: Option<u8>,
}

/// The static game catalog, already parsed and resident in memory.
/// Retrieval and file parsing happen outside the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub activities: Vec<Activity>,
    pub items: Vec<Item>,
    /// Activity id -> monster composition.
    #[serde(default)]
    pub monster_groups: HashMap<ActivityId, Vec<MonsterGroup>>,
    /// Monster id -> loot table rows.
    #[serde(default)]
    pub loot_tables: HashMap<MonsterId, Vec<LootTableRow>>,
}

impl Catalog {
    /// Item id -> rarity lookup used while building the loot index.
    pub fn rarity_map(&self) -> HashMap<ItemId, Rarity> {
        self.items.iter().map(|item| (item.id, item.rarity)).collect()
    }
}

/// Normalized item-id -> unit-price mapping for one server, stamped with the
/// price snapshot time. The timestamp doubles as the cache version token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceList {
    prices: HashMap<ItemId, i64>,
    updated_at: DateTime<Utc>,
}

impl PriceList {
    pub fn new(prices: HashMap<ItemId, i64>, updated_at: DateTime<Utc>) -> Self {
        Self { prices, updated_at }
    }

    /// Normalizes the pair-list shape some price feeds use. Later entries for
    /// the same item win, matching a plain map insert.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ItemId, i64)>, updated_at: DateTime<Utc>) -> Self {
        Self {
            prices: pairs.into_iter().collect(),
            updated_at,
        }
    }

    /// Unit price for an item; unknown items are valued at zero.
    pub fn price_of(&self, item_id: ItemId) -> i64 {
        self.prices.get(&item_id).copied().unwrap_or(0)
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Version token for cache keys.
    pub fn version(&self) -> i64 {
        self.updated_at.timestamp()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl Default for PriceList {
    fn default() -> Self {
        Self {
            prices: HashMap::new(),
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Unrated < Rarity::Common);
        assert!(Rarity::Common < Rarity::Unusual);
        assert!(Rarity::Rare < Rarity::Mythical);
        assert!(Rarity::Legendary < Rarity::Relic);
        assert!(Rarity::Relic < Rarity::Souvenir);
    }

    #[test]
    fn test_rarity_from_tier_round_trips() {
        for tier in 0..=7u8 {
            assert_eq!(Rarity::from_tier(tier).tier(), tier);
        }
    }

    #[test]
    fn test_rarity_from_unknown_tier_defaults_to_unrated() {
        assert_eq!(Rarity::from_tier(8), Rarity::Unrated);
        assert_eq!(Rarity::from_tier(255), Rarity::Unrated);
    }

    #[test]
    fn test_rarity_gating_thresholds() {
        // High-stasis gate applies strictly above Rare
        assert!(!Rarity::Rare.requires_high_stasis());
        assert!(Rarity::Mythical.requires_high_stasis());
        assert!(Rarity::Souvenir.requires_high_stasis());

        // Only Legendary is a one-per-team drop
        assert!(Rarity::Legendary.single_drop_per_team());
        assert!(!Rarity::Mythical.single_drop_per_team());
        assert!(!Rarity::Relic.single_drop_per_team());

        // Wave gate covers Legendary and above
        assert!(!Rarity::Mythical.rift_wave_gated());
        assert!(Rarity::Legendary.rift_wave_gated());
        assert!(Rarity::Souvenir.rift_wave_gated());
    }

    #[test]
    fn test_rarity_display_metadata() {
        assert_eq!(Rarity::Unrated.name(), "Common");
        assert_eq!(Rarity::Common.name(), "Common");
        assert_eq!(Rarity::Legendary.name(), "Legendary");
        assert_eq!(Rarity::Common.color(), "#FFFFFF");
        assert_eq!(Rarity::Legendary.color(), "#6A42A2");
    }

    #[test]
    fn test_price_list_unknown_item_is_zero() {
        let prices = PriceList::default();
        assert_eq!(prices.price_of(42), 0);
    }

    #[test]
    fn test_price_list_from_pairs_last_entry_wins() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let prices = PriceList::from_pairs([(1, 100), (2, 50), (1, 75)], at);
        assert_eq!(prices.price_of(1), 75);
        assert_eq!(prices.price_of(2), 50);
        assert_eq!(prices.len(), 2);
    }

    #[test]
    fn test_price_list_version_is_snapshot_timestamp() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let prices = PriceList::new(HashMap::new(), at);
        assert_eq!(prices.version(), at.timestamp());
        // Two snapshots taken at different times must carry distinct tokens
        let later = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
        assert_ne!(prices.version(), PriceList::new(HashMap::new(), later).version());
    }

    #[test]
    fn test_loot_table_row_missing_fields_default() {
        let row: LootTableRow = serde_json::from_str(r#"{"item_id": 7}"#).unwrap();
        assert_eq!(row.rate, 0.0);
        assert_eq!(row.quantity, 0.0);
        assert_eq!(row.stele, 0);
        assert_eq!(row.stele_intervention, 0);
        assert_eq!(row.stasis, None);
    }

    #[test]
    fn test_catalog_rarity_map() {
        let catalog = Catalog {
            items: vec![
                Item { id: 1, rarity: Rarity::Rare },
                Item { id: 2, rarity: Rarity::Legendary },
            ],
            ..Catalog::default()
        };
        let map = catalog.rarity_map();
        assert_eq!(map.get(&1), Some(&Rarity::Rare));
        assert_eq!(map.get(&2), Some(&Rarity::Legendary));
        assert_eq!(map.get(&3), None);
    }
}
