//! Per-supplier stock rollup.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use common::SupplierId;
use valuation::{IntegrityWarning, ItemReplay};

/// Current stock attributed to one supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierStock {
    /// The supplier.
    pub supplier_id: SupplierId,

    /// Units on hand across the supplier's items.
    pub quantity: i64,

    /// Value of those units at each item's weighted average cost.
    pub total_value: Decimal,
}

/// Stock grouped by supplier at a point in time.
///
/// An item is attributed to the supplier on its most recent event that
/// carried one, so historical re-sourcing moves the whole item to the new
/// supplier. Items with no supplier anywhere in their history are omitted
/// from the grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierStockReport {
    /// The instant stock levels were taken at.
    pub as_of: DateTime<Utc>,

    /// Rows sorted by quantity descending.
    pub rows: Vec<SupplierStock>,

    /// Items excluded from the rollup because their ledger went negative.
    pub warnings: Vec<IntegrityWarning>,
}

impl SupplierStockReport {
    /// Assembles the rollup from per-item replay outcomes.
    pub fn from_replays(as_of: DateTime<Utc>, replays: &[ItemReplay]) -> Self {
        let mut totals: BTreeMap<SupplierId, (i64, Decimal)> = BTreeMap::new();
        let mut warnings = Vec::new();

        for replay in replays {
            if let Some(warning) = replay.warning() {
                warnings.push(warning.clone());
                continue;
            }
            let Some(supplier_id) = replay.supplier_id else {
                continue;
            };
            let state = replay.state();
            let entry = totals.entry(supplier_id).or_insert((0, Decimal::ZERO));
            entry.0 += state.quantity_on_hand;
            entry.1 += state.total_value();
        }

        let mut rows: Vec<SupplierStock> = totals
            .into_iter()
            .map(|(supplier_id, (quantity, total_value))| SupplierStock {
                supplier_id,
                quantity,
                total_value,
            })
            .collect();
        // Rows start in supplier order, so equal quantities stay deterministic
        rows.sort_by(|a, b| b.quantity.cmp(&a.quantity));

        Self {
            as_of,
            rows,
            warnings,
        }
    }
}
