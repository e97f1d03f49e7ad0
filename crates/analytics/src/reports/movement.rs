//! Monthly stock movement rollup.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use ledger::StockEvent;
use valuation::{CostingConfig, IntegrityWarning, ItemReplayer, item_runs};

use crate::window::ReportWindow;

/// Units moved in and out during one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyMovement {
    /// The month, formatted `YYYY-MM`.
    pub month: String,

    /// Units received: the sum of positive quantity deltas.
    pub stock_in: i64,

    /// Units issued: the sum of negative quantity delta magnitudes.
    pub stock_out: i64,
}

/// Stock movement per month over a window.
///
/// A quantity-only rollup; cost basis plays no part. Months appear only
/// when at least one event fell inside them, in calendar order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementReport {
    /// First day of the reporting window.
    pub from: NaiveDate,

    /// Last day of the reporting window.
    pub to: NaiveDate,

    /// Event-bearing months inside the window, ascending.
    pub months: Vec<MonthlyMovement>,

    /// Items excluded from the rollup because their ledger went negative.
    pub warnings: Vec<IntegrityWarning>,
}

impl MovementReport {
    /// Builds the rollup from an ordered event slice covering everything up
    /// to the window's end. The full history is still replayed per item so
    /// consistency is judged on the whole ledger, but only events inside
    /// the window are bucketed.
    pub fn build(events: &[StockEvent], window: ReportWindow, config: CostingConfig) -> Self {
        let mut buckets: BTreeMap<(i32, u32), (i64, i64)> = BTreeMap::new();
        let mut warnings = Vec::new();

        for run in item_runs(events) {
            let Some(first) = run.first() else { continue };
            let mut replayer = ItemReplayer::new(first.item_id, config);
            let mut item_buckets: Vec<((i32, u32), (i64, i64))> = Vec::new();

            for event in run {
                replayer.apply(event);
                if !window.contains(event.timestamp) {
                    continue;
                }

                let key = (event.timestamp.year(), event.timestamp.month());
                let delta = event.quantity_change;
                match item_buckets.last_mut() {
                    Some((month, (stock_in, stock_out))) if *month == key => {
                        if delta > 0 {
                            *stock_in += delta;
                        } else {
                            *stock_out += -delta;
                        }
                    }
                    _ => {
                        let bucket = if delta > 0 { (delta, 0) } else { (0, -delta) };
                        item_buckets.push((key, bucket));
                    }
                }
            }

            let replay = replayer.finish();
            if let Some(warning) = replay.warning() {
                warnings.push(warning.clone());
                continue;
            }

            for (key, (stock_in, stock_out)) in item_buckets {
                let entry = buckets.entry(key).or_insert((0, 0));
                entry.0 += stock_in;
                entry.1 += stock_out;
            }
        }

        let months = buckets
            .into_iter()
            .map(|((year, month), (stock_in, stock_out))| MonthlyMovement {
                month: format!("{year:04}-{month:02}"),
                stock_in,
                stock_out,
            })
            .collect();

        Self {
            from: window.from(),
            to: window.to(),
            months,
            warnings,
        }
    }
}
