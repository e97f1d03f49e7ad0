//! Unit price trend for one item.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use common::ItemId;
use ledger::StockEvent;

use crate::window::ReportWindow;

/// One observed unit cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// When the cost was established.
    pub timestamp: DateTime<Utc>,

    /// The unit price the inbound batch was received at.
    pub price: Decimal,
}

/// Unit price of one item over time.
///
/// A price trend reflects cost-basis changes, not quantity movements: only
/// priced inbound events produce a point, and the point carries the
/// event's own `price_at_change`, not the post-blend running average.
/// Outbound and unpriced events contribute nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTrendReport {
    /// The item whose prices are charted.
    pub item_id: ItemId,

    /// First day of the reporting window.
    pub from: NaiveDate,

    /// Last day of the reporting window.
    pub to: NaiveDate,

    /// Priced inbound events inside the window, in time order.
    pub points: Vec<PricePoint>,
}

impl PriceTrendReport {
    /// Builds the trend from the item's ordered events.
    pub fn build(item_id: ItemId, events: &[StockEvent], window: ReportWindow) -> Self {
        let points = events
            .iter()
            .filter(|event| window.contains(event.timestamp))
            .filter_map(|event| {
                if event.quantity_change <= 0 {
                    return None;
                }
                let price = event.price_at_change?;
                Some(PricePoint {
                    timestamp: event.timestamp,
                    price,
                })
            })
            .collect();

        Self {
            item_id,
            from: window.from(),
            to: window.to(),
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ledger::StockChangeReason;
    use rust_decimal_macros::dec;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn june() -> ReportWindow {
        ReportWindow::new(day(1), day(30)).unwrap()
    }

    fn inbound(item: ItemId, day: u32, quantity: i64, price: Decimal) -> StockEvent {
        StockEvent::builder()
            .item_id(item)
            .timestamp(ts(day))
            .quantity_change(quantity)
            .price_at_change(price)
            .reason(StockChangeReason::Purchase)
            .build()
    }

    fn outbound(item: ItemId, day: u32, quantity: i64) -> StockEvent {
        StockEvent::builder()
            .item_id(item)
            .timestamp(ts(day))
            .quantity_change(-quantity)
            .reason(StockChangeReason::Sold)
            .build()
    }

    #[test]
    fn emits_one_point_per_priced_inbound_event() {
        let item = ItemId::new();
        let events = vec![
            inbound(item, 1, 10, dec!(2.00)),
            outbound(item, 2, 4),
            inbound(item, 3, 5, dec!(3.00)),
        ];

        let report = PriceTrendReport::build(item, &events, june());

        assert_eq!(report.points.len(), 2);
        assert_eq!(report.points[0].timestamp, ts(1));
        assert_eq!(report.points[0].price, dec!(2.00));
        assert_eq!(report.points[1].timestamp, ts(3));
        // The batch price, not the blended 2.4545 average
        assert_eq!(report.points[1].price, dec!(3.00));
    }

    #[test]
    fn unpriced_inbound_emits_no_point() {
        let item = ItemId::new();
        let unpriced = StockEvent::builder()
            .item_id(item)
            .timestamp(ts(5))
            .quantity_change(5)
            .reason(StockChangeReason::Return)
            .build();

        let report = PriceTrendReport::build(item, &[unpriced], june());
        assert!(report.points.is_empty());
    }

    #[test]
    fn events_outside_the_window_are_skipped() {
        let item = ItemId::new();
        let events = vec![
            inbound(item, 1, 10, dec!(2.00)),
            inbound(item, 20, 5, dec!(3.00)),
        ];
        let narrow = ReportWindow::new(day(10), day(30)).unwrap();

        let report = PriceTrendReport::build(item, &events, narrow);

        assert_eq!(report.points.len(), 1);
        assert_eq!(report.points[0].price, dec!(3.00));
    }

    #[test]
    fn empty_history_yields_empty_trend() {
        let item = ItemId::new();
        let report = PriceTrendReport::build(item, &[], june());

        assert_eq!(report.item_id, item);
        assert_eq!(report.from, day(1));
        assert_eq!(report.to, day(30));
        assert!(report.points.is_empty());
    }
}
