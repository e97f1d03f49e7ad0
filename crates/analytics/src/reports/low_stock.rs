//! Low-stock detection.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::ItemId;
use valuation::{IntegrityWarning, ItemReplay};

/// Per-item reorder levels, supplied by the caller.
///
/// Reorder points are item-catalog metadata, not ledger data, so the
/// caller passes them in per request. Items without an entry never produce
/// a signal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReorderLevels(HashMap<ItemId, i64>);

impl ReorderLevels {
    /// Creates an empty set of levels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reorder level for an item.
    pub fn set(&mut self, item_id: ItemId, level: i64) {
        self.0.insert(item_id, level);
    }

    /// Chaining setter for building levels inline.
    pub fn with(mut self, item_id: ItemId, level: i64) -> Self {
        self.set(item_id, level);
        self
    }

    /// The configured level for an item, if any.
    pub fn level_for(&self, item_id: ItemId) -> Option<i64> {
        self.0.get(&item_id).copied()
    }

    /// Number of items with a configured level.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no level is configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ItemId, i64)> for ReorderLevels {
    fn from_iter<I: IntoIterator<Item = (ItemId, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<HashMap<ItemId, i64>> for ReorderLevels {
    fn from(levels: HashMap<ItemId, i64>) -> Self {
        Self(levels)
    }
}

/// An item whose stock has fallen below its reorder level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockEntry {
    /// The item needing reorder.
    pub item_id: ItemId,

    /// Units on hand, from replay.
    pub quantity_on_hand: i64,

    /// The level it fell below.
    pub reorder_level: i64,
}

/// Items needing reorder at a point in time.
///
/// The comparison is strict: an item sitting exactly at its reorder level
/// is not low. Quantity always comes from replay, never from a cached
/// stock field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockReport {
    /// The instant stock levels were judged at.
    pub as_of: DateTime<Utc>,

    /// Items below their level, sorted by quantity ascending.
    pub entries: Vec<LowStockEntry>,

    /// Items that could not be judged because their ledger went negative.
    pub warnings: Vec<IntegrityWarning>,
}

impl LowStockReport {
    /// Builds the report from per-item replay outcomes and the caller's
    /// reorder levels.
    pub fn from_replays(
        as_of: DateTime<Utc>,
        replays: &[ItemReplay],
        levels: &ReorderLevels,
    ) -> Self {
        let mut entries = Vec::new();
        let mut warnings = Vec::new();

        for replay in replays {
            if let Some(warning) = replay.warning() {
                warnings.push(warning.clone());
                continue;
            }
            let Some(level) = levels.level_for(replay.item_id) else {
                continue;
            };
            let quantity = replay.state().quantity_on_hand;
            if quantity < level {
                entries.push(LowStockEntry {
                    item_id: replay.item_id,
                    quantity_on_hand: quantity,
                    reorder_level: level,
                });
            }
        }

        entries.sort_by_key(|entry| entry.quantity_on_hand);

        Self {
            as_of,
            entries,
            warnings,
        }
    }
}
