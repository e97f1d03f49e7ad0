//! Append-only stock event ledger.
//!
//! The ledger is the source of truth for all stock levels: every change is
//! an immutable [`StockEvent`], and current state is always derived by
//! replaying an item's events in order, never read from a mutable field.
//! This crate provides:
//! - [`StockEvent`] and its builder, plus the [`StockChangeReason`] taxonomy
//! - [`LedgerQuery`] for point-in-time, item, and supplier scoped reads
//! - [`LedgerStore`], the async read interface valuation consumes
//! - [`InMemoryLedger`], the reference implementation

pub mod error;
pub mod event;
pub mod memory;
pub mod query;
pub mod store;

pub use common::{ItemId, SupplierId};
pub use error::{LedgerError, Result};
pub use event::{EventId, Sequence, StockChangeReason, StockEvent, StockEventBuilder};
pub use memory::InMemoryLedger;
pub use query::LedgerQuery;
pub use store::{EventStream, LedgerStore, LedgerStoreExt, replay_order};
