//! Ledger activity per item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::ItemId;
use ledger::StockEvent;
use valuation::item_runs;

/// Ledger event count for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemActivity {
    /// The item.
    pub item_id: ItemId,

    /// Events recorded for the item up to the report's `as_of`.
    pub events: u64,
}

/// Which items the ledger writes to most.
///
/// A pure volume measure over the raw ledger: every event counts, even
/// those of items whose replay would be flagged. Activity measures write
/// traffic, not valuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityReport {
    /// Upper bound of the count.
    pub as_of: DateTime<Utc>,

    /// Items sorted by event count descending.
    pub items: Vec<ItemActivity>,
}

impl ActivityReport {
    /// Counts events per item in an ordered slice.
    pub fn build(as_of: DateTime<Utc>, events: &[StockEvent]) -> Self {
        let mut items: Vec<ItemActivity> = item_runs(events)
            .filter_map(|run| {
                let first = run.first()?;
                Some(ItemActivity {
                    item_id: first.item_id,
                    events: run.len() as u64,
                })
            })
            .collect();
        // Stable sort: equally active items stay in item order
        items.sort_by(|a, b| b.events.cmp(&a.events));

        Self { as_of, items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ledger::StockChangeReason;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap()
    }

    fn event(item: ItemId, day: u32, delta: i64) -> StockEvent {
        StockEvent::builder()
            .item_id(item)
            .timestamp(Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap())
            .quantity_change(delta)
            .reason(StockChangeReason::Adjustment)
            .build()
    }

    #[test]
    fn counts_events_per_item_most_active_first() {
        let quiet = ItemId::from_uuid(uuid::Uuid::from_u128(1));
        let busy = ItemId::from_uuid(uuid::Uuid::from_u128(2));
        let events = vec![
            event(quiet, 1, 5),
            event(busy, 1, 5),
            event(busy, 2, -1),
            event(busy, 3, -1),
        ];

        let report = ActivityReport::build(as_of(), &events);

        assert_eq!(report.items.len(), 2);
        assert_eq!(report.items[0].item_id, busy);
        assert_eq!(report.items[0].events, 3);
        assert_eq!(report.items[1].item_id, quiet);
        assert_eq!(report.items[1].events, 1);
    }

    #[test]
    fn oversold_items_still_count() {
        let item = ItemId::new();
        let report = ActivityReport::build(as_of(), &[event(item, 1, -3)]);

        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].events, 1);
    }

    #[test]
    fn empty_ledger_has_no_activity() {
        let report = ActivityReport::build(as_of(), &[]);
        assert!(report.items.is_empty());
    }
}
