//! Per-item weighted-average-cost replay.
//!
//! An item's state is never stored; it is derived by folding the item's
//! ordered ledger events from `quantity = 0, wac = 0`. The fold is pure and
//! deterministic: the same event sequence always produces the same state,
//! which is what makes valuation reproducible and auditable.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use common::{ItemId, SupplierId};
use ledger::{EventId, StockEvent};

/// Rounding policy for cost-basis arithmetic.
///
/// Weighted-average cost is rounded half-up to `scale` decimal places once
/// per blend, never accumulated at a higher intermediate precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostingConfig {
    /// Decimal places kept on the weighted average cost.
    pub scale: u32,
}

impl CostingConfig {
    /// The default cost scale (4 decimal places).
    pub const DEFAULT_SCALE: u32 = 4;

    /// Creates a config with the given scale.
    pub fn new(scale: u32) -> Self {
        Self { scale }
    }

    /// Rounds a cost value to this config's scale, half-up.
    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.scale, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl Default for CostingConfig {
    fn default() -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
        }
    }
}

/// Running state of one item's replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReplayState {
    /// Units currently on hand.
    pub quantity_on_hand: i64,

    /// Weighted average cost per unit. Recalculated only on priced inbound
    /// events; outbound events leave it unchanged.
    pub weighted_average_cost: Decimal,
}

impl ReplayState {
    /// The value of the stock on hand: `quantity × wac`.
    pub fn total_value(&self) -> Decimal {
        Decimal::from(self.quantity_on_hand) * self.weighted_average_cost
    }
}

/// Evidence that an item's ledger cannot be replayed cleanly.
///
/// Raised when an outbound event drives the running quantity negative,
/// typically a missing INITIAL_STOCK event or an out-of-order insert
/// upstream. Only the first offending event is recorded; the replay keeps
/// going so one bad item never blocks a fleet-wide report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityWarning {
    /// The item whose ledger is inconsistent.
    pub item_id: ItemId,

    /// The first event that drove the quantity negative.
    pub event_id: EventId,

    /// When that event happened.
    pub timestamp: DateTime<Utc>,

    /// The negative quantity observed immediately after the event, kept for
    /// diagnosis.
    pub quantity_on_hand: i64,
}

impl std::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "item {} went to quantity {} at event {}",
            self.item_id, self.quantity_on_hand, self.event_id
        )
    }
}

/// Tagged per-item replay outcome.
///
/// Aggregations sum `Consistent` states and report `Inconsistent` items in
/// a warnings list; they never fail the whole report over one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayOutcome {
    /// The ledger replayed cleanly.
    Consistent(ReplayState),

    /// Replay observed an impossible quantity. The final state is kept for
    /// diagnosis but must not enter aggregate sums.
    Inconsistent {
        warning: IntegrityWarning,
        state: ReplayState,
    },
}

/// The result of replaying one item's full event history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReplay {
    /// The item replayed.
    pub item_id: ItemId,

    /// Supplier on the item's most recent event that carried one. Used to
    /// attribute the item in per-supplier rollups.
    pub supplier_id: Option<SupplierId>,

    /// Whether the ledger replayed cleanly, and the final state either way.
    pub outcome: ReplayOutcome,

    /// How many events were folded.
    pub events_applied: usize,
}

impl ItemReplay {
    /// The final state, consistent or not.
    pub fn state(&self) -> ReplayState {
        match &self.outcome {
            ReplayOutcome::Consistent(state) => *state,
            ReplayOutcome::Inconsistent { state, .. } => *state,
        }
    }

    /// The integrity warning, if the replay was flagged.
    pub fn warning(&self) -> Option<&IntegrityWarning> {
        match &self.outcome {
            ReplayOutcome::Consistent(_) => None,
            ReplayOutcome::Inconsistent { warning, .. } => Some(warning),
        }
    }

    /// Whether the ledger replayed cleanly.
    pub fn is_consistent(&self) -> bool {
        matches!(self.outcome, ReplayOutcome::Consistent(_))
    }
}

/// Stepwise replay of a single item's events.
///
/// `apply` must be fed the item's events in `(timestamp, sequence)` order;
/// the final outcome comes from `finish`. The fold is pure and must stay
/// that way: given the same events in the same order it always produces the
/// same `ItemReplay`.
#[derive(Debug, Clone)]
pub struct ItemReplayer {
    item_id: ItemId,
    config: CostingConfig,
    state: ReplayState,
    supplier_id: Option<SupplierId>,
    warning: Option<IntegrityWarning>,
    events_applied: usize,
}

impl ItemReplayer {
    /// Starts a replay for one item from the empty state.
    pub fn new(item_id: ItemId, config: CostingConfig) -> Self {
        Self {
            item_id,
            config,
            state: ReplayState::default(),
            supplier_id: None,
            warning: None,
            events_applied: 0,
        }
    }

    /// The item being replayed.
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// The running state after the events applied so far.
    pub fn state(&self) -> ReplayState {
        self.state
    }

    /// The integrity warning, if one has been raised so far.
    pub fn warning(&self) -> Option<&IntegrityWarning> {
        self.warning.as_ref()
    }

    /// Folds one event into the running state.
    ///
    /// Priced inbound blends the incoming cost into the weighted average:
    /// `wac = (quantity × wac + delta × price) / (quantity + delta)`,
    /// rounded once at the configured scale. Unpriced inbound raises the
    /// quantity and leaves the basis unchanged (an unknown cost must not
    /// dilute the average toward zero). Outbound lowers the quantity and
    /// never touches the basis.
    pub fn apply(&mut self, event: &StockEvent) {
        debug_assert_eq!(event.item_id, self.item_id, "event fed to wrong replayer");

        if event.supplier_id.is_some() {
            self.supplier_id = event.supplier_id;
        }

        let delta = event.quantity_change;
        if delta > 0
            && let Some(price) = event.price_at_change
        {
            let new_quantity = self.state.quantity_on_hand + delta;
            // The guard is only reachable once the quantity has gone
            // negative; state is diagnostic after a flag, so the basis
            // stays put rather than dividing by a non-positive quantity.
            if new_quantity > 0 {
                let current_value = self.state.total_value();
                let incoming_value = Decimal::from(delta) * price;
                self.state.weighted_average_cost =
                    self.config
                        .round((current_value + incoming_value) / Decimal::from(new_quantity));
            }
            self.state.quantity_on_hand = new_quantity;
        } else {
            self.state.quantity_on_hand += delta;
        }

        if self.state.quantity_on_hand < 0 && self.warning.is_none() {
            self.warning = Some(IntegrityWarning {
                item_id: self.item_id,
                event_id: event.event_id,
                timestamp: event.timestamp,
                quantity_on_hand: self.state.quantity_on_hand,
            });
        }

        self.events_applied += 1;
    }

    /// Finishes the replay, producing the tagged outcome.
    pub fn finish(self) -> ItemReplay {
        let outcome = match self.warning {
            None => ReplayOutcome::Consistent(self.state),
            Some(warning) => ReplayOutcome::Inconsistent {
                warning,
                state: self.state,
            },
        };
        ItemReplay {
            item_id: self.item_id,
            supplier_id: self.supplier_id,
            outcome,
            events_applied: self.events_applied,
        }
    }
}

/// Replays one item's ordered events from the empty state.
pub fn replay_item<'a>(
    item_id: ItemId,
    events: impl IntoIterator<Item = &'a StockEvent>,
    config: CostingConfig,
) -> ItemReplay {
    let mut replayer = ItemReplayer::new(item_id, config);
    for event in events {
        replayer.apply(event);
    }
    replayer.finish()
}
