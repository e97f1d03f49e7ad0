//! Weighted-average-cost replay over the stock ledger.
//!
//! This crate is the pure computational core of valuation:
//! - [`ItemReplayer`] folds one item's ordered events into running
//!   `(quantity_on_hand, weighted_average_cost)` state
//! - [`ItemReplays`] streams per-item outcomes off an item-major event
//!   iterator, one run at a time
//! - outcomes are tagged ([`ReplayOutcome`]): clean replays are
//!   `Consistent`, ledgers that go negative are `Inconsistent` with an
//!   [`IntegrityWarning`] and keep replaying fail-soft
//!
//! Everything here is synchronous and deterministic; fetching events is the
//! store's job, and reporting on top of replays lives in the analytics
//! crate.

pub mod replay;
pub mod runs;

pub use replay::{
    CostingConfig, IntegrityWarning, ItemReplay, ItemReplayer, ReplayOutcome, ReplayState,
    replay_item,
};
pub use runs::{ItemReplays, item_runs, replay_all};
