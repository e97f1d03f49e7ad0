//! Point-in-time valuation report.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use common::ItemId;
use valuation::{IntegrityWarning, ItemReplay};

/// Valuation of one item at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationSnapshot {
    /// The item valued.
    pub item_id: ItemId,

    /// The instant the valuation is for.
    pub as_of: DateTime<Utc>,

    /// Units on hand after replaying every event up to `as_of`.
    pub quantity_on_hand: i64,

    /// Weighted average cost per unit.
    pub weighted_average_cost: Decimal,

    /// `quantity_on_hand × weighted_average_cost`.
    pub total_value: Decimal,
}

/// Point-in-time valuation across every matching item.
///
/// Items whose ledger replayed inconsistently contribute nothing to
/// `snapshots` or `total_value`; they appear in `warnings` instead, so a
/// single bad ledger never distorts or blocks the fleet figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationReport {
    /// The instant the valuation is for.
    pub as_of: DateTime<Utc>,

    /// One snapshot per consistently replayed item, in item order.
    pub snapshots: Vec<ValuationSnapshot>,

    /// Sum of the snapshots' `total_value`.
    pub total_value: Decimal,

    /// Items excluded from the totals because their ledger went negative.
    pub warnings: Vec<IntegrityWarning>,
}

impl ValuationReport {
    /// Assembles the report from per-item replay outcomes.
    pub fn from_replays(as_of: DateTime<Utc>, replays: &[ItemReplay]) -> Self {
        let mut snapshots = Vec::new();
        let mut warnings = Vec::new();
        let mut total_value = Decimal::ZERO;

        for replay in replays {
            match replay.warning() {
                Some(warning) => warnings.push(warning.clone()),
                None => {
                    let state = replay.state();
                    let value = state.total_value();
                    total_value += value;
                    snapshots.push(ValuationSnapshot {
                        item_id: replay.item_id,
                        as_of,
                        quantity_on_hand: state.quantity_on_hand,
                        weighted_average_cost: state.weighted_average_cost,
                        total_value: value,
                    });
                }
            }
        }

        Self {
            as_of,
            snapshots,
            total_value,
            warnings,
        }
    }
}
