use chrono::{DateTime, Utc};

use common::{ItemId, SupplierId};

use crate::StockEvent;

/// Builder for ledger queries.
///
/// Every query is upper-bounded in time (valuation is always "as of" a
/// point in time); item and supplier filters are optional. The supplier
/// filter matches the denormalized `supplier_id` on each event directly,
/// so it tolerates historical item/supplier reassignment.
#[derive(Debug, Clone, Copy)]
pub struct LedgerQuery {
    /// Upper time bound, inclusive.
    pub as_of: DateTime<Utc>,

    /// Filter to a single item.
    pub item_id: Option<ItemId>,

    /// Filter to events carrying this supplier.
    pub supplier_id: Option<SupplierId>,
}

impl LedgerQuery {
    /// Creates a query for all events up to and including `as_of`.
    pub fn up_to(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            item_id: None,
            supplier_id: None,
        }
    }

    /// Filters to a single item.
    pub fn item(mut self, id: ItemId) -> Self {
        self.item_id = Some(id);
        self
    }

    /// Optionally filters to a single item.
    pub fn item_opt(mut self, id: Option<ItemId>) -> Self {
        self.item_id = id;
        self
    }

    /// Filters to events carrying this supplier.
    pub fn supplier(mut self, id: SupplierId) -> Self {
        self.supplier_id = Some(id);
        self
    }

    /// Optionally filters to events carrying this supplier.
    pub fn supplier_opt(mut self, id: Option<SupplierId>) -> Self {
        self.supplier_id = id;
        self
    }

    /// Whether an event satisfies this query's filters.
    pub fn matches(&self, event: &StockEvent) -> bool {
        if event.timestamp > self.as_of {
            return false;
        }
        if let Some(item_id) = self.item_id
            && event.item_id != item_id
        {
            return false;
        }
        if let Some(supplier_id) = self.supplier_id
            && event.supplier_id != Some(supplier_id)
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StockChangeReason;
    use chrono::TimeZone;

    fn event_at(ts: DateTime<Utc>, item_id: ItemId, supplier_id: Option<SupplierId>) -> StockEvent {
        let mut builder = StockEvent::builder()
            .item_id(item_id)
            .timestamp(ts)
            .quantity_change(1)
            .reason(StockChangeReason::Purchase);
        if let Some(id) = supplier_id {
            builder = builder.supplier_id(id);
        }
        builder.build()
    }

    #[test]
    fn query_up_to_has_no_filters() {
        let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let query = LedgerQuery::up_to(as_of);

        assert_eq!(query.as_of, as_of);
        assert!(query.item_id.is_none());
        assert!(query.supplier_id.is_none());
    }

    #[test]
    fn matches_respects_upper_bound_inclusively() {
        let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let query = LedgerQuery::up_to(as_of);
        let item = ItemId::new();

        assert!(query.matches(&event_at(as_of, item, None)));
        assert!(!query.matches(&event_at(as_of + chrono::Duration::seconds(1), item, None)));
    }

    #[test]
    fn matches_filters_by_item_and_supplier() {
        let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let item = ItemId::new();
        let other_item = ItemId::new();
        let supplier = SupplierId::new();

        let query = LedgerQuery::up_to(as_of).item(item).supplier(supplier);

        assert!(query.matches(&event_at(ts, item, Some(supplier))));
        assert!(!query.matches(&event_at(ts, other_item, Some(supplier))));
        assert!(!query.matches(&event_at(ts, item, None)));
        assert!(!query.matches(&event_at(ts, item, Some(SupplierId::new()))));
    }

    #[test]
    fn optional_filters_pass_through() {
        let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let query = LedgerQuery::up_to(as_of).item_opt(None).supplier_opt(None);

        assert!(query.item_id.is_none());
        assert!(query.supplier_id.is_none());
    }
}
