use std::cmp::Ordering;
use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_core::Stream;

use common::ItemId;

use crate::{LedgerQuery, Result, StockEvent};

/// A stream of ledger events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StockEvent>> + Send>>;

/// Read interface over the append-only stock ledger.
///
/// The valuation engine only ever consumes this interface; appending is the
/// concern of whatever records stock movements. All implementations must be
/// thread-safe (Send + Sync), must return events in replay order (see
/// [`replay_order`]), and must serve each call from a single immutable
/// snapshot of the ledger: events appended after the call starts must not
/// appear mid-iteration.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Retrieves all events matching the query, in replay order.
    async fn events_up_to(&self, query: LedgerQuery) -> Result<Vec<StockEvent>>;

    /// Streams events matching the query, in the same order as
    /// [`events_up_to`](Self::events_up_to). Preferred for fleet-wide
    /// replays over large ledgers.
    async fn stream_events(&self, query: LedgerQuery) -> Result<EventStream>;
}

/// Extension trait providing convenience methods for ledger stores.
#[async_trait]
pub trait LedgerStoreExt: LedgerStore {
    /// Retrieves one item's full history up to `as_of`.
    async fn item_history(&self, item_id: ItemId, as_of: DateTime<Utc>) -> Result<Vec<StockEvent>> {
        self.events_up_to(LedgerQuery::up_to(as_of).item(item_id))
            .await
    }
}

// Blanket implementation for all LedgerStore implementations
impl<T: LedgerStore + ?Sized> LedgerStoreExt for T {}

/// Replay order: `item_id` ascending, then `(timestamp, sequence)`
/// ascending.
///
/// Item-major ordering lets the replay engine process one item's full
/// history contiguously in a single pass, without grouping events in
/// memory; the sequence breaks timestamp ties deterministically.
pub fn replay_order(a: &StockEvent, b: &StockEvent) -> Ordering {
    a.item_id
        .cmp(&b.item_id)
        .then(a.timestamp.cmp(&b.timestamp))
        .then(a.sequence.cmp(&b.sequence))
}
