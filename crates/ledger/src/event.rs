use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{ItemId, SupplierId};

/// Unique identifier for a ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an event ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for EventId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<EventId> for Uuid {
    fn from(id: EventId) -> Self {
        id.0
    }
}

/// Global insertion sequence number, assigned by the ledger on append.
///
/// Two events can share a timestamp; the sequence breaks the tie so replay
/// order is fully deterministic. Sequences start at 1 and increase
/// monotonically across the whole ledger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Sequence(i64);

impl Sequence {
    /// Creates a sequence from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the unassigned sequence (0), the value an event carries
    /// before the ledger has accepted it.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the first assigned sequence (1).
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next sequence.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw sequence value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Sequence {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Sequence> for i64 {
    fn from(sequence: Sequence) -> Self {
        sequence.0
    }
}

/// Why a stock level changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockChangeReason {
    /// Opening balance when an item enters the system.
    InitialStock,

    /// Inbound purchase from a supplier.
    Purchase,

    /// Outbound sale to a customer.
    Sold,

    /// Manual correction, either direction.
    Adjustment,

    /// Stocktake correction after a physical count.
    Audit,

    /// Return movement: inbound from a customer, outbound to a supplier.
    Return,

    /// Loss, damage, theft, or expiry.
    Shrinkage,

    /// Catch-all manual edit outside the flows above.
    ManualUpdate,
}

impl StockChangeReason {
    /// Returns the wire name of the reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            StockChangeReason::InitialStock => "INITIAL_STOCK",
            StockChangeReason::Purchase => "PURCHASE",
            StockChangeReason::Sold => "SOLD",
            StockChangeReason::Adjustment => "ADJUSTMENT",
            StockChangeReason::Audit => "AUDIT",
            StockChangeReason::Return => "RETURN",
            StockChangeReason::Shrinkage => "SHRINKAGE",
            StockChangeReason::ManualUpdate => "MANUAL_UPDATE",
        }
    }
}

impl std::fmt::Display for StockChangeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One immutable entry in the stock ledger.
///
/// Events are created once, appended, and never updated or deleted; the
/// full ordered sequence for an item, replayed from zero, is the source of
/// truth for that item's quantity and cost basis. The type exposes no
/// mutation API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEvent {
    /// Unique identifier for this event.
    pub event_id: EventId,

    /// The item whose stock level changed.
    pub item_id: ItemId,

    /// The item's supplier at the time of the event, denormalized onto the
    /// event so supplier-scoped queries never join through the item.
    pub supplier_id: Option<SupplierId>,

    /// When the change happened.
    pub timestamp: DateTime<Utc>,

    /// Insertion sequence, assigned by the ledger on append. Breaks
    /// timestamp ties.
    pub sequence: Sequence,

    /// Signed quantity delta: positive is inbound, negative is outbound.
    pub quantity_change: i64,

    /// Unit price for inbound events that establish new cost basis.
    /// Absent on pure outbound events and on inbound with unknown cost.
    pub price_at_change: Option<Decimal>,

    /// Why the stock level changed.
    pub reason: StockChangeReason,
}

impl StockEvent {
    /// Creates a new stock event builder.
    pub fn builder() -> StockEventBuilder {
        StockEventBuilder::default()
    }
}

/// Builder for constructing stock events.
#[derive(Debug, Default)]
pub struct StockEventBuilder {
    event_id: Option<EventId>,
    item_id: Option<ItemId>,
    supplier_id: Option<SupplierId>,
    timestamp: Option<DateTime<Utc>>,
    sequence: Option<Sequence>,
    quantity_change: Option<i64>,
    price_at_change: Option<Decimal>,
    reason: Option<StockChangeReason>,
}

impl StockEventBuilder {
    /// Sets the event ID. If not set, a new ID will be generated.
    pub fn event_id(mut self, id: EventId) -> Self {
        self.event_id = Some(id);
        self
    }

    /// Sets the item the event belongs to.
    pub fn item_id(mut self, id: ItemId) -> Self {
        self.item_id = Some(id);
        self
    }

    /// Sets the denormalized supplier.
    pub fn supplier_id(mut self, id: SupplierId) -> Self {
        self.supplier_id = Some(id);
        self
    }

    /// Sets the timestamp. If not set, the current time will be used.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the insertion sequence. Ledger implementations replace this on
    /// append; setting it directly is only useful when feeding the replay
    /// engine without a store.
    pub fn sequence(mut self, sequence: Sequence) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Sets the signed quantity delta.
    pub fn quantity_change(mut self, delta: i64) -> Self {
        self.quantity_change = Some(delta);
        self
    }

    /// Sets the unit price establishing new cost basis.
    pub fn price_at_change(mut self, price: Decimal) -> Self {
        self.price_at_change = Some(price);
        self
    }

    /// Sets the change reason.
    pub fn reason(mut self, reason: StockChangeReason) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Builds the stock event.
    ///
    /// # Panics
    ///
    /// Panics if required fields (item_id, quantity_change, reason) are not
    /// set.
    pub fn build(self) -> StockEvent {
        StockEvent {
            event_id: self.event_id.unwrap_or_default(),
            item_id: self.item_id.expect("item_id is required"),
            supplier_id: self.supplier_id,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            sequence: self.sequence.unwrap_or_default(),
            quantity_change: self.quantity_change.expect("quantity_change is required"),
            price_at_change: self.price_at_change,
            reason: self.reason.expect("reason is required"),
        }
    }

    /// Tries to build the stock event, returning None if required fields are
    /// missing.
    pub fn try_build(self) -> Option<StockEvent> {
        Some(StockEvent {
            event_id: self.event_id.unwrap_or_default(),
            item_id: self.item_id?,
            supplier_id: self.supplier_id,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            sequence: self.sequence.unwrap_or_default(),
            quantity_change: self.quantity_change?,
            price_at_change: self.price_at_change,
            reason: self.reason?,
        })
    }
}
