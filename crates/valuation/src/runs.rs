//! Group-by-consecutive-item streaming fold.
//!
//! Retrieval hands back events in replay order (item-major), so a whole
//! fleet can be replayed in one pass holding a single item's running state
//! at a time, with no per-item grouping map and no memory proportional to
//! the fleet size.

use std::iter::Peekable;

use crate::replay::{CostingConfig, ItemReplay, ItemReplayer};
use ledger::StockEvent;

/// Iterator that folds an item-major event stream into per-item outcomes.
///
/// Each `next()` drains one run of consecutive events sharing an `item_id`
/// and yields that item's [`ItemReplay`]. The input must already be in
/// replay order; an item whose events are split across non-adjacent runs
/// would be yielded once per run.
pub struct ItemReplays<I>
where
    I: Iterator<Item = StockEvent>,
{
    events: Peekable<I>,
    config: CostingConfig,
}

impl<I> ItemReplays<I>
where
    I: Iterator<Item = StockEvent>,
{
    /// Wraps an ordered event iterator.
    pub fn new(events: I, config: CostingConfig) -> Self {
        Self {
            events: events.peekable(),
            config,
        }
    }
}

impl<I> Iterator for ItemReplays<I>
where
    I: Iterator<Item = StockEvent>,
{
    type Item = ItemReplay;

    fn next(&mut self) -> Option<ItemReplay> {
        let first = self.events.next()?;
        let mut replayer = ItemReplayer::new(first.item_id, self.config);
        replayer.apply(&first);

        while let Some(event) = self.events.next_if(|e| e.item_id == replayer.item_id()) {
            replayer.apply(&event);
        }

        Some(replayer.finish())
    }
}

/// Replays every item in an ordered event slice.
pub fn replay_all(events: &[StockEvent], config: CostingConfig) -> Vec<ItemReplay> {
    ItemReplays::new(events.iter().cloned(), config).collect()
}

/// Splits an ordered event slice into runs of consecutive events sharing an
/// `item_id`.
///
/// For consumers that need to see every intermediate state (daily series,
/// movement buckets) rather than just the final [`ItemReplay`]: walk each
/// run with an [`ItemReplayer`] and observe the state after each event.
pub fn item_runs(events: &[StockEvent]) -> impl Iterator<Item = &[StockEvent]> {
    let mut rest = events;
    std::iter::from_fn(move || {
        let first = rest.first()?;
        let len = rest
            .iter()
            .take_while(|e| e.item_id == first.item_id)
            .count();
        let (run, tail) = rest.split_at(len);
        rest = tail;
        Some(run)
    })
}
