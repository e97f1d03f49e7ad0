use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    LedgerQuery, Result, Sequence, StockEvent,
    store::{EventStream, LedgerStore, replay_order},
};

/// In-memory ledger implementation.
///
/// Backs tests, benches, and embeddings that have no external store. The
/// ledger is append-only: events are cloned out on read and never handed
/// out mutably. Clones share the same backing storage, like the database
/// pools they stand in for.
#[derive(Clone, Default)]
pub struct InMemoryLedger {
    events: Arc<RwLock<Vec<StockEvent>>>,
}

impl InMemoryLedger {
    /// Creates a new empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one event, assigning the next insertion sequence.
    ///
    /// Any sequence already on the event is replaced; sequences are global
    /// across items and strictly increasing, which is what breaks
    /// timestamp ties during replay. Returns the event as stored.
    pub async fn append(&self, mut event: StockEvent) -> StockEvent {
        let mut store = self.events.write().await;
        event.sequence = Sequence::new(store.len() as i64 + 1);
        store.push(event.clone());
        event
    }

    /// Appends a batch of events in order, assigning sequences.
    pub async fn append_all(&self, events: Vec<StockEvent>) -> Vec<StockEvent> {
        let mut store = self.events.write().await;
        let mut stored = Vec::with_capacity(events.len());
        for mut event in events {
            event.sequence = Sequence::new(store.len() as i64 + 1);
            store.push(event.clone());
            stored.push(event);
        }
        stored
    }

    /// Returns the total number of events in the ledger.
    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }

    /// Clears the ledger.
    pub async fn clear(&self) {
        self.events.write().await.clear();
    }

    async fn snapshot(&self, query: LedgerQuery) -> Vec<StockEvent> {
        let store = self.events.read().await;
        let mut events: Vec<_> = store
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();
        events.sort_by(replay_order);
        events
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn events_up_to(&self, query: LedgerQuery) -> Result<Vec<StockEvent>> {
        Ok(self.snapshot(query).await)
    }

    async fn stream_events(&self, query: LedgerQuery) -> Result<EventStream> {
        use futures_util::stream;

        // The snapshot is taken eagerly; appends after this point are not
        // visible to the returned stream.
        let events = self.snapshot(query).await;
        let stream = stream::iter(events.into_iter().map(Ok));
        Ok(Box::pin(stream))
    }
}
