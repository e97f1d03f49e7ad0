//! Property tests for report building: determinism, total/snapshot
//! agreement, window containment, and quantity conservation across the
//! financial buckets.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use analytics::{FinancialSummary, MovementReport, ReportWindow, StockValueSeries, ValuationReport};
use common::ItemId;
use ledger::{Sequence, StockChangeReason, StockEvent, replay_order};
use valuation::{CostingConfig, replay_all};

/// One generated stock movement against one of a small pool of items.
/// Prices are in cents so arbitrary values stay well inside `Decimal`
/// range.
#[derive(Debug, Clone)]
struct FleetMovement {
    item: usize,
    delta: i64,
    price_cents: Option<u32>,
}

fn arb_fleet() -> impl Strategy<Value = Vec<FleetMovement>> {
    prop::collection::vec(
        (0usize..4, -20i64..=50, prop::option::of(1u32..=100_000)).prop_map(
            |(item, delta, price_cents)| FleetMovement {
                item,
                delta: if delta == 0 { 1 } else { delta },
                price_cents: if delta > 0 { price_cents } else { None },
            },
        ),
        0..64,
    )
}

/// Spreads movements over the first quarter of 2024 and sorts them into
/// replay order, the shape a store hands back.
fn fleet_events(movements: &[FleetMovement]) -> Vec<StockEvent> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut events: Vec<_> = movements
        .iter()
        .enumerate()
        .map(|(i, movement)| {
            let mut builder = StockEvent::builder()
                .item_id(ItemId::from_uuid(uuid::Uuid::from_u128(movement.item as u128 + 1)))
                .timestamp(start + Duration::hours(i as i64 * 13))
                .sequence(Sequence::new(i as i64 + 1))
                .quantity_change(movement.delta)
                .reason(if movement.delta > 0 {
                    StockChangeReason::Purchase
                } else {
                    StockChangeReason::Sold
                });
            if let Some(cents) = movement.price_cents {
                builder = builder.price_at_change(Decimal::new(i64::from(cents), 2));
            }
            builder.build()
        })
        .collect();
    events.sort_by(replay_order);
    events
}

fn quarter() -> ReportWindow {
    ReportWindow::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn valuation_total_is_the_sum_of_its_snapshots(movements in arb_fleet()) {
        let events = fleet_events(&movements);
        let as_of = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();

        let replays = replay_all(&events, CostingConfig::default());
        let report = ValuationReport::from_replays(as_of, &replays);

        let sum: Decimal = report.snapshots.iter().map(|s| s.total_value).sum();
        prop_assert_eq!(report.total_value, sum);
    }

    #[test]
    fn every_item_is_a_snapshot_or_a_warning(movements in arb_fleet()) {
        let events = fleet_events(&movements);
        let as_of = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();

        let replays = replay_all(&events, CostingConfig::default());
        let report = ValuationReport::from_replays(as_of, &replays);

        let mut items: Vec<_> = events.iter().map(|e| e.item_id).collect();
        items.dedup();
        prop_assert_eq!(report.snapshots.len() + report.warnings.len(), items.len());
    }

    #[test]
    fn report_building_is_deterministic(movements in arb_fleet()) {
        let events = fleet_events(&movements);
        let window = quarter();
        let config = CostingConfig::default();

        prop_assert_eq!(
            StockValueSeries::build(&events, window, config),
            StockValueSeries::build(&events, window, config)
        );
        prop_assert_eq!(
            MovementReport::build(&events, window, config),
            MovementReport::build(&events, window, config)
        );
        prop_assert_eq!(
            FinancialSummary::build(&events, window, config),
            FinancialSummary::build(&events, window, config)
        );
    }

    #[test]
    fn series_points_stay_inside_the_window_and_ascend(movements in arb_fleet()) {
        let events = fleet_events(&movements);
        let window = quarter();

        let series = StockValueSeries::build(&events, window, CostingConfig::default());

        for pair in series.points.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
        }
        for point in &series.points {
            prop_assert!(window.contains_day(point.date));
        }
    }

    #[test]
    fn movement_totals_are_non_negative_and_ordered(movements in arb_fleet()) {
        let events = fleet_events(&movements);

        let report = MovementReport::build(&events, quarter(), CostingConfig::default());

        for pair in report.months.windows(2) {
            prop_assert!(pair[0].month < pair[1].month);
        }
        for month in &report.months {
            prop_assert!(month.stock_in >= 0);
            prop_assert!(month.stock_out >= 0);
        }
    }

    #[test]
    fn financial_quantities_balance(movements in arb_fleet()) {
        let events = fleet_events(&movements);

        let summary = FinancialSummary::build(&events, quarter(), CostingConfig::default());

        // Every event timestamp is inside the window, so consistent items
        // open at zero and the bucket quantities must conserve exactly.
        let derived = summary.opening.quantity + summary.purchases.quantity
            + summary.returns_in.quantity
            - summary.cost_of_goods_sold.quantity
            - summary.write_offs.quantity;
        prop_assert_eq!(derived, summary.ending.quantity);
    }
}
