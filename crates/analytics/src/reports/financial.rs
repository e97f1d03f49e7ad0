//! WAC-costed financial summary over a window.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledger::{StockChangeReason, StockEvent};
use valuation::{CostingConfig, IntegrityWarning, ItemReplayer, item_runs};

use crate::window::ReportWindow;

/// A quantity of stock and its value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Net units through the bucket.
    pub quantity: i64,

    /// Net value of those units, costed per event.
    pub value: Decimal,
}

impl Bucket {
    fn add(&mut self, quantity: i64, value: Decimal) {
        self.quantity += quantity;
        self.value += value;
    }

    fn subtract(&mut self, quantity: i64, value: Decimal) {
        self.quantity -= quantity;
        self.value -= value;
    }

    fn merge(&mut self, other: Bucket) {
        self.quantity += other.quantity;
        self.value += other.value;
    }
}

/// Stock movements over a window, costed at weighted average cost.
///
/// Every in-window movement lands in exactly one bucket, classified by
/// reason and direction:
/// - inbound RETURN → `returns_in`; every other inbound → `purchases`
/// - outbound RETURN → a `purchases` reversal (stock sent back to the
///   supplier)
/// - outbound SHRINKAGE → `write_offs`
/// - every other outbound → `cost_of_goods_sold`
///
/// Inbound is costed at the event's own price when it has one and at the
/// item's running average otherwise; outbound is issued at the average in
/// effect when the event applies. `opening` and `ending` are the stock
/// positions at the window's bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Costing method the summary was built under. Always `"WAC"`.
    pub method: String,

    /// First day of the reporting window.
    pub from: NaiveDate,

    /// Last day of the reporting window.
    pub to: NaiveDate,

    /// Stock position when the window opened.
    pub opening: Bucket,

    /// Net receipts: purchases and other inbound, minus returns to the
    /// supplier.
    pub purchases: Bucket,

    /// Customer returns received back into stock.
    pub returns_in: Bucket,

    /// Stock issued to customers and other outbound movements.
    pub cost_of_goods_sold: Bucket,

    /// Shrinkage written off.
    pub write_offs: Bucket,

    /// Stock position when the window closed.
    pub ending: Bucket,

    /// Items excluded from every bucket because their ledger went negative.
    pub warnings: Vec<IntegrityWarning>,
}

impl FinancialSummary {
    /// Costing method reported in every summary.
    pub const METHOD: &'static str = "WAC";

    /// Builds the summary from an ordered event slice covering everything
    /// up to the window's end. Events before the window are replayed to
    /// establish each item's opening position but bucket nothing.
    pub fn build(events: &[StockEvent], window: ReportWindow, config: CostingConfig) -> Self {
        let mut summary = Self {
            method: Self::METHOD.to_owned(),
            from: window.from(),
            to: window.to(),
            opening: Bucket::default(),
            purchases: Bucket::default(),
            returns_in: Bucket::default(),
            cost_of_goods_sold: Bucket::default(),
            write_offs: Bucket::default(),
            ending: Bucket::default(),
            warnings: Vec::new(),
        };

        let start = window.start_bound();

        for run in item_runs(events) {
            let Some(first) = run.first() else { continue };
            let mut replayer = ItemReplayer::new(first.item_id, config);

            let mut opening = Bucket::default();
            let mut purchases = Bucket::default();
            let mut returns_in = Bucket::default();
            let mut cost_of_goods_sold = Bucket::default();
            let mut write_offs = Bucket::default();
            let mut opened = false;

            for event in run {
                if !opened && event.timestamp >= start {
                    let state = replayer.state();
                    opening.add(state.quantity_on_hand, state.total_value());
                    opened = true;
                }

                let cost_basis = replayer.state().weighted_average_cost;
                replayer.apply(event);

                if event.timestamp < start {
                    continue;
                }

                let delta = event.quantity_change;
                if delta > 0 {
                    let unit_cost = event.price_at_change.unwrap_or(cost_basis);
                    let value = Decimal::from(delta) * unit_cost;
                    match event.reason {
                        StockChangeReason::Return => returns_in.add(delta, value),
                        _ => purchases.add(delta, value),
                    }
                } else {
                    let issued = -delta;
                    let value = Decimal::from(issued) * cost_basis;
                    match event.reason {
                        StockChangeReason::Return => purchases.subtract(issued, value),
                        StockChangeReason::Shrinkage => write_offs.add(issued, value),
                        _ => cost_of_goods_sold.add(issued, value),
                    }
                }
            }

            if !opened {
                // Every event predates the window; the item just sits on
                // its opening position the whole time
                let state = replayer.state();
                opening.add(state.quantity_on_hand, state.total_value());
            }

            let replay = replayer.finish();
            if let Some(warning) = replay.warning() {
                summary.warnings.push(warning.clone());
                continue;
            }

            let ending = replay.state();
            summary.opening.merge(opening);
            summary.purchases.merge(purchases);
            summary.returns_in.merge(returns_in);
            summary.cost_of_goods_sold.merge(cost_of_goods_sold);
            summary.write_offs.merge(write_offs);
            summary
                .ending
                .add(ending.quantity_on_hand, ending.total_value());
        }

        summary
    }
}
