//! Daily fleet stock value series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledger::StockEvent;
use valuation::{CostingConfig, IntegrityWarning, ItemReplayer, item_runs};

use crate::window::ReportWindow;

/// Fleet stock value at the end of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockValuePoint {
    /// The UTC day.
    pub date: NaiveDate,

    /// Fleet value at the end of that day.
    pub total_value: Decimal,
}

/// Total stock value over time.
///
/// One point per day inside the window on which at least one event
/// occurred. Each point carries the cumulative fleet value at that day's
/// end, not the day's delta, so the series charts directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockValueSeries {
    /// First day of the reporting window.
    pub from: NaiveDate,

    /// Last day of the reporting window.
    pub to: NaiveDate,

    /// Event-bearing days inside the window, ascending.
    pub points: Vec<StockValuePoint>,

    /// Items excluded from every point because their ledger went negative.
    pub warnings: Vec<IntegrityWarning>,
}

impl StockValueSeries {
    /// Builds the series from an ordered event slice covering everything up
    /// to the window's end. Events before the window shape the value the
    /// series opens at but emit no point of their own.
    pub fn build(events: &[StockEvent], window: ReportWindow, config: CostingConfig) -> Self {
        // Per-day value deltas summed across consistent items; a prefix sum
        // over the sorted days then yields the cumulative fleet value.
        let mut day_deltas: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        let mut warnings = Vec::new();

        for run in item_runs(events) {
            let Some(first) = run.first() else { continue };
            let mut replayer = ItemReplayer::new(first.item_id, config);
            let mut value_by_day: Vec<(NaiveDate, Decimal)> = Vec::new();

            for event in run {
                replayer.apply(event);
                let day = event.timestamp.date_naive();
                let value = replayer.state().total_value();
                match value_by_day.last_mut() {
                    Some(entry) if entry.0 == day => entry.1 = value,
                    _ => value_by_day.push((day, value)),
                }
            }

            let replay = replayer.finish();
            if let Some(warning) = replay.warning() {
                warnings.push(warning.clone());
                continue;
            }

            let mut previous = Decimal::ZERO;
            for (day, value) in value_by_day {
                *day_deltas.entry(day).or_insert(Decimal::ZERO) += value - previous;
                previous = value;
            }
        }

        let mut points = Vec::new();
        let mut running = Decimal::ZERO;
        for (day, delta) in day_deltas {
            running += delta;
            if window.contains_day(day) {
                points.push(StockValuePoint {
                    date: day,
                    total_value: running,
                });
            }
        }

        Self {
            from: window.from(),
            to: window.to(),
            points,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use common::ItemId;
    use ledger::StockChangeReason;
    use rust_decimal_macros::dec;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn event_at(item: ItemId, day: u32, hour: u32, delta: i64, price: Option<Decimal>) -> StockEvent {
        let mut builder = StockEvent::builder()
            .item_id(item)
            .timestamp(ts(day, hour))
            .quantity_change(delta)
            .reason(if delta > 0 {
                StockChangeReason::Purchase
            } else {
                StockChangeReason::Sold
            });
        if let Some(price) = price {
            builder = builder.price_at_change(price);
        }
        builder.build()
    }

    fn event(item: ItemId, day: u32, delta: i64, price: Option<Decimal>) -> StockEvent {
        event_at(item, day, 12, delta, price)
    }

    fn june(from: u32, to: u32) -> ReportWindow {
        ReportWindow::new(day(from), day(to)).unwrap()
    }

    #[test]
    fn one_point_per_event_bearing_day_with_cumulative_value() {
        let item_a = ItemId::from_uuid(uuid::Uuid::from_u128(1));
        let item_b = ItemId::from_uuid(uuid::Uuid::from_u128(2));
        let events = vec![
            event(item_a, 1, 10, Some(dec!(2.00))),
            event(item_a, 3, -4, None),
            event(item_b, 1, 5, Some(dec!(1.00))),
        ];

        let series = StockValueSeries::build(&events, june(1, 30), CostingConfig::default());

        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].date, day(1));
        assert_eq!(series.points[0].total_value, dec!(25.00));
        assert_eq!(series.points[1].date, day(3));
        assert_eq!(series.points[1].total_value, dec!(17.00));
        assert!(series.warnings.is_empty());
    }

    #[test]
    fn events_before_window_shape_opening_value_without_a_point() {
        let item_a = ItemId::from_uuid(uuid::Uuid::from_u128(1));
        let item_b = ItemId::from_uuid(uuid::Uuid::from_u128(2));
        let events = vec![
            event(item_a, 1, 10, Some(dec!(2.00))),
            event(item_a, 3, -4, None),
            event(item_b, 1, 5, Some(dec!(1.00))),
        ];

        let series = StockValueSeries::build(&events, june(2, 4), CostingConfig::default());

        // Day 1 falls outside the window but its 25.00 carries into day 3
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].date, day(3));
        assert_eq!(series.points[0].total_value, dec!(17.00));
    }

    #[test]
    fn same_day_events_collapse_to_end_of_day_value() {
        let item = ItemId::new();
        let purchase = event_at(item, 1, 9, 10, Some(dec!(2.00)));
        let sale = event_at(item, 1, 17, -4, None);

        let series =
            StockValueSeries::build(&[purchase, sale], june(1, 30), CostingConfig::default());

        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].total_value, dec!(12.00));
    }

    #[test]
    fn inconsistent_item_contributes_to_no_day() {
        let item_a = ItemId::from_uuid(uuid::Uuid::from_u128(1));
        let item_b = ItemId::from_uuid(uuid::Uuid::from_u128(2));
        let events = vec![
            event(item_a, 1, 10, Some(dec!(2.00))),
            event(item_b, 1, -3, None),
        ];

        let series = StockValueSeries::build(&events, june(1, 30), CostingConfig::default());

        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].total_value, dec!(20.00));
        assert_eq!(series.warnings.len(), 1);
        assert_eq!(series.warnings[0].item_id, item_b);
    }

    #[test]
    fn empty_ledger_yields_empty_series() {
        let series = StockValueSeries::build(&[], june(1, 30), CostingConfig::default());
        assert!(series.points.is_empty());
        assert!(series.warnings.is_empty());
        assert_eq!(series.from, day(1));
        assert_eq!(series.to, day(30));
    }
}
