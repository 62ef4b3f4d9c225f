//! Base loot index: the per-activity flattening of "which monsters appear,
//! how many" with "what each monster drops". Built once per catalog load and
//! reused across every run configuration.

use super::types::{ActivityId, ActivityKind, Catalog, ItemId, Rarity};
use crate::core::constants::{BONUS_RATE_ITEM_ID, DUNGEON_DEFAULT_PLAYERS, RIFT_DEFAULT_PLAYERS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// One flattened (activity, monster, loot-table row) drop source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLootRecord {
    pub item_id: ItemId,
    pub rate: f64,
    /// Base quantity per monster.
    pub quantity: f64,
    pub monster_count: u32,
    pub stele: u8,
    pub stele_intervention: u8,
    pub stasis: Option<u8>,
    pub rarity: Rarity,
}

/// Activity-wide percentage drop-rate bonus, recovered from the catalog's
/// bonus pseudo-item rows. Kept separate from tradeable loot so the pipeline
/// never has to recognize a sentinel item id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateBoost {
    pub source_item_id: ItemId,
    pub rate: f64,
    /// Rate bonus in percent granted when this boost procs.
    pub percent: f64,
    pub stele: u8,
    pub stele_intervention: u8,
    pub stasis: Option<u8>,
}

/// Everything the valuation pipeline needs to know about one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLoot {
    pub activity_id: ActivityId,
    pub level: u32,
    pub kind: ActivityKind,
    pub is_ultimate: bool,
    pub players: u32,
    pub records: Vec<BaseLootRecord>,
    pub rate_boosts: Vec<RateBoost>,
}

/// Immutable per-catalog loot index. Rebuilding produces a whole new value
/// that the owner swaps in, so readers never observe a partial index.
#[derive(Debug, Clone, Default)]
pub struct LootIndex {
    entries: HashMap<ActivityId, ActivityLoot>,
    /// Catalog order, for deterministic whole-catalog sweeps.
    order: Vec<ActivityId>,
    /// Reverse lookup: which activities can drop a given item.
    item_activities: HashMap<ItemId, Vec<ActivityId>>,
}

impl LootIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let rarities = catalog.rarity_map();
        let mut entries = HashMap::new();
        let mut order = Vec::with_capacity(catalog.activities.len());
        let mut item_activities: HashMap<ItemId, Vec<ActivityId>> = HashMap::new();

        for activity in &catalog.activities {
            let groups = catalog
                .monster_groups
                .get(&activity.id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            let mut records = Vec::new();
            let mut rate_boosts = Vec::new();

            for group in groups {
                let rows = catalog
                    .loot_tables
                    .get(&group.monster_id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                // A zero head count in the data still means the monster shows up
                let monster_count = group.count.max(1);

                for row in rows {
                    if row.item_id == BONUS_RATE_ITEM_ID {
                        rate_boosts.push(RateBoost {
                            source_item_id: row.item_id,
                            rate: row.rate,
                            percent: row.quantity,
                            stele: row.stele,
                            stele_intervention: row.stele_intervention,
                            stasis: row.stasis,
                        });
                        continue;
                    }

                    records.push(BaseLootRecord {
                        item_id: row.item_id,
                        rate: row.rate,
                        quantity: row.quantity,
                        monster_count,
                        stele: row.stele,
                        stele_intervention: row.stele_intervention,
                        stasis: row.stasis,
                        rarity: rarities.get(&row.item_id).copied().unwrap_or_default(),
                    });

                    let dropping = item_activities.entry(row.item_id).or_default();
                    if dropping.last() != Some(&activity.id) {
                        dropping.push(activity.id);
                    }
                }
            }

            let players = if activity.players > 0 {
                activity.players
            } else if activity.is_dungeon() {
                DUNGEON_DEFAULT_PLAYERS
            } else {
                RIFT_DEFAULT_PLAYERS
            };

            order.push(activity.id);
            entries.insert(
                activity.id,
                ActivityLoot {
                    activity_id: activity.id,
                    level: activity.level,
                    kind: activity.kind,
                    is_ultimate: activity.is_ultimate,
                    players,
                    records,
                    rate_boosts,
                },
            );
        }

        info!(
            "loot index built: {} activities, {} distinct items",
            order.len(),
            item_activities.len()
        );

        Self {
            entries,
            order,
            item_activities,
        }
    }

    pub fn get(&self, activity_id: ActivityId) -> Option<&ActivityLoot> {
        self.entries.get(&activity_id)
    }

    /// Activities in catalog order.
    pub fn activities(&self) -> impl Iterator<Item = &ActivityLoot> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Which activities can drop the given item, in catalog order.
    pub fn activities_dropping(&self, item_id: ItemId) -> &[ActivityId] {
        self.item_activities
            .get(&item_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{Activity, Item, LootTableRow, MonsterGroup};

    fn test_catalog() -> Catalog {
        Catalog {
            activities: vec![
                Activity {
                    id: 10,
                    level: 50,
                    kind: ActivityKind::Dungeon,
                    is_ultimate: false,
                    players: 0,
                },
                Activity {
                    id: 20,
                    level: 200,
                    kind: ActivityKind::Rift,
                    is_ultimate: true,
                    players: 0,
                },
            ],
            items: vec![
                Item { id: 1, rarity: Rarity::Rare },
                Item { id: 2, rarity: Rarity::Legendary },
            ],
            monster_groups: [
                (
                    10,
                    vec![
                        MonsterGroup { monster_id: 100, count: 4 },
                        MonsterGroup { monster_id: 101, count: 1 },
                    ],
                ),
                (20, vec![MonsterGroup { monster_id: 100, count: 0 }]),
            ]
            .into_iter()
            .collect(),
            loot_tables: [
                (
                    100,
                    vec![
                        LootTableRow {
                            item_id: 1,
                            rate: 0.5,
                            quantity: 2.0,
                            stele: 0,
                            stele_intervention: 0,
                            stasis: None,
                        },
                        LootTableRow {
                            item_id: BONUS_RATE_ITEM_ID,
                            rate: 0.3,
                            quantity: 10.0,
                            stele: 0,
                            stele_intervention: 0,
                            stasis: None,
                        },
                    ],
                ),
                (
                    101,
                    vec![LootTableRow {
                        item_id: 2,
                        rate: 0.01,
                        quantity: 1.0,
                        stele: 2,
                        stele_intervention: 0,
                        stasis: Some(4),
                    }],
                ),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn test_build_flattens_monster_loot() {
        let index = LootIndex::build(&test_catalog());
        let dungeon = index.get(10).unwrap();

        assert_eq!(dungeon.records.len(), 2);
        let rare = &dungeon.records[0];
        assert_eq!(rare.item_id, 1);
        assert_eq!(rare.monster_count, 4);
        assert_eq!(rare.rarity, Rarity::Rare);
        let legendary = &dungeon.records[1];
        assert_eq!(legendary.item_id, 2);
        assert_eq!(legendary.monster_count, 1);
        assert_eq!(legendary.stasis, Some(4));
        assert_eq!(legendary.rarity, Rarity::Legendary);
    }

    #[test]
    fn test_build_splits_bonus_rows_into_rate_boosts() {
        let index = LootIndex::build(&test_catalog());
        let dungeon = index.get(10).unwrap();

        assert_eq!(dungeon.rate_boosts.len(), 1);
        let boost = &dungeon.rate_boosts[0];
        assert_eq!(boost.source_item_id, BONUS_RATE_ITEM_ID);
        assert_eq!(boost.percent, 10.0);
        // The pseudo-item must never surface as a droppable record
        assert!(dungeon.records.iter().all(|r| r.item_id != BONUS_RATE_ITEM_ID));
    }

    #[test]
    fn test_build_applies_player_defaults() {
        let index = LootIndex::build(&test_catalog());
        assert_eq!(index.get(10).unwrap().players, DUNGEON_DEFAULT_PLAYERS);
        assert_eq!(index.get(20).unwrap().players, RIFT_DEFAULT_PLAYERS);
    }

    #[test]
    fn test_build_keeps_explicit_player_count() {
        let mut catalog = test_catalog();
        catalog.activities[0].players = 6;
        let index = LootIndex::build(&catalog);
        assert_eq!(index.get(10).unwrap().players, 6);
    }

    #[test]
    fn test_zero_monster_count_counts_as_one() {
        let index = LootIndex::build(&test_catalog());
        let rift = index.get(20).unwrap();
        assert_eq!(rift.records[0].monster_count, 1);
    }

    #[test]
    fn test_missing_mapping_yields_empty_loot_list() {
        let mut catalog = test_catalog();
        catalog.monster_groups.remove(&10);
        let index = LootIndex::build(&catalog);

        let dungeon = index.get(10).unwrap();
        assert!(dungeon.records.is_empty());
        assert!(dungeon.rate_boosts.is_empty());
    }

    #[test]
    fn test_unknown_item_rarity_defaults_to_unrated() {
        let mut catalog = test_catalog();
        catalog.items.clear();
        let index = LootIndex::build(&catalog);
        assert!(index
            .get(10)
            .unwrap()
            .records
            .iter()
            .all(|r| r.rarity == Rarity::Unrated));
    }

    #[test]
    fn test_unknown_activity_is_absent() {
        let index = LootIndex::build(&test_catalog());
        assert!(index.get(999).is_none());
    }

    #[test]
    fn test_activities_iterates_in_catalog_order() {
        let index = LootIndex::build(&test_catalog());
        let ids: Vec<_> = index.activities().map(|a| a.activity_id).collect();
        assert_eq!(ids, vec![10, 20]);
    }

    #[test]
    fn test_reverse_item_lookup() {
        let index = LootIndex::build(&test_catalog());
        // Item 1 drops from monster 100, present in both activities
        assert_eq!(index.activities_dropping(1), &[10, 20]);
        // Item 2 only drops in the dungeon
        assert_eq!(index.activities_dropping(2), &[10]);
        // The bonus pseudo-item is not a droppable item
        assert!(index.activities_dropping(BONUS_RATE_ITEM_ID).is_empty());
        assert!(index.activities_dropping(555).is_empty());
    }

    #[test]
    fn test_build_is_idempotent() {
        let catalog = test_catalog();
        let a = LootIndex::build(&catalog);
        let b = LootIndex::build(&catalog);
        assert_eq!(a.len(), b.len());
        assert_eq!(a.get(10), b.get(10));
        assert_eq!(a.get(20), b.get(20));
    }
}
