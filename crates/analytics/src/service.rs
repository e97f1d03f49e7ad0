//! The analytics facade over a ledger store.

use chrono::{DateTime, Utc};
use futures_util::StreamExt;

use common::{ItemId, SupplierId};
use ledger::{LedgerQuery, LedgerStore, StockEvent};
use valuation::{CostingConfig, IntegrityWarning, ItemReplay, ItemReplayer, replay_all};

use crate::error::Result;
use crate::reports::{
    ActivityReport, FinancialSummary, LowStockReport, MovementReport, PriceTrendReport,
    ReorderLevels, StockValueSeries, SupplierStockReport, ValuationReport,
};
use crate::window::ReportWindow;

/// Computes valuation reports from a [`LedgerStore`].
///
/// Every method fetches one immutable snapshot of events, replays it, and
/// assembles a typed report. The service holds no state between calls:
/// concurrent reports never interfere, and the same ledger always produces
/// the same report.
pub struct AnalyticsService<S: LedgerStore> {
    store: S,
    config: CostingConfig,
}

impl<S: LedgerStore> AnalyticsService<S> {
    /// Creates a service with the default costing config.
    pub fn new(store: S) -> Self {
        Self::with_config(store, CostingConfig::default())
    }

    /// Creates a service with an explicit costing config.
    pub fn with_config(store: S, config: CostingConfig) -> Self {
        Self { store, config }
    }

    /// The costing config reports are built under.
    pub fn config(&self) -> CostingConfig {
        self.config
    }

    /// Point-in-time valuation of every matching item, with the fleet
    /// total over consistently replayed items.
    #[tracing::instrument(skip(self))]
    pub async fn valuation(
        &self,
        as_of: DateTime<Utc>,
        item_id: Option<ItemId>,
        supplier_id: Option<SupplierId>,
    ) -> Result<ValuationReport> {
        let query = LedgerQuery::up_to(as_of)
            .item_opt(item_id)
            .supplier_opt(supplier_id);
        let replays = self.replay_stream(query).await?;

        let report = ValuationReport::from_replays(as_of, &replays);
        note_warnings(&report.warnings);
        metrics::counter!("analytics_reports_built").increment(1);
        tracing::info!(
            items = report.snapshots.len(),
            warnings = report.warnings.len(),
            total_value = %report.total_value,
            "valuation report built"
        );
        Ok(report)
    }

    /// Unit price trend for one item over a window.
    #[tracing::instrument(skip(self))]
    pub async fn price_trend(
        &self,
        item_id: ItemId,
        supplier_id: Option<SupplierId>,
        window: ReportWindow,
    ) -> Result<PriceTrendReport> {
        let query = LedgerQuery::up_to(window.end_bound())
            .item(item_id)
            .supplier_opt(supplier_id);
        let events = self.store.events_up_to(query).await?;

        let report = PriceTrendReport::build(item_id, &events, window);
        metrics::counter!("analytics_reports_built").increment(1);
        tracing::info!(points = report.points.len(), "price trend built");
        Ok(report)
    }

    /// Stock received and issued per calendar month over a window.
    #[tracing::instrument(skip(self))]
    pub async fn monthly_movement(
        &self,
        supplier_id: Option<SupplierId>,
        window: ReportWindow,
    ) -> Result<MovementReport> {
        let events = self.fetch_window(supplier_id, window).await?;

        let report = MovementReport::build(&events, window, self.config);
        note_warnings(&report.warnings);
        metrics::counter!("analytics_reports_built").increment(1);
        tracing::info!(
            months = report.months.len(),
            warnings = report.warnings.len(),
            "movement report built"
        );
        Ok(report)
    }

    /// Items strictly below their reorder level.
    #[tracing::instrument(skip(self, levels), fields(levels = levels.len()))]
    pub async fn low_stock(
        &self,
        as_of: DateTime<Utc>,
        supplier_id: Option<SupplierId>,
        levels: &ReorderLevels,
    ) -> Result<LowStockReport> {
        let query = LedgerQuery::up_to(as_of).supplier_opt(supplier_id);
        let replays = self.replay_slice(query).await?;

        let report = LowStockReport::from_replays(as_of, &replays, levels);
        note_warnings(&report.warnings);
        metrics::counter!("analytics_reports_built").increment(1);
        tracing::info!(
            low = report.entries.len(),
            warnings = report.warnings.len(),
            "low stock report built"
        );
        Ok(report)
    }

    /// Total fleet stock value per event-bearing day over a window.
    #[tracing::instrument(skip(self))]
    pub async fn stock_value_over_time(
        &self,
        supplier_id: Option<SupplierId>,
        window: ReportWindow,
    ) -> Result<StockValueSeries> {
        let events = self.fetch_window(supplier_id, window).await?;

        let series = StockValueSeries::build(&events, window, self.config);
        note_warnings(&series.warnings);
        metrics::counter!("analytics_reports_built").increment(1);
        tracing::info!(
            points = series.points.len(),
            warnings = series.warnings.len(),
            "stock value series built"
        );
        Ok(series)
    }

    /// Current stock grouped by supplier.
    #[tracing::instrument(skip(self))]
    pub async fn stock_per_supplier(&self, as_of: DateTime<Utc>) -> Result<SupplierStockReport> {
        let replays = self.replay_slice(LedgerQuery::up_to(as_of)).await?;

        let report = SupplierStockReport::from_replays(as_of, &replays);
        note_warnings(&report.warnings);
        metrics::counter!("analytics_reports_built").increment(1);
        tracing::info!(
            suppliers = report.rows.len(),
            warnings = report.warnings.len(),
            "supplier stock report built"
        );
        Ok(report)
    }

    /// WAC-costed movement buckets over a window.
    #[tracing::instrument(skip(self))]
    pub async fn financial_summary(
        &self,
        supplier_id: Option<SupplierId>,
        window: ReportWindow,
    ) -> Result<FinancialSummary> {
        let events = self.fetch_window(supplier_id, window).await?;

        let summary = FinancialSummary::build(&events, window, self.config);
        note_warnings(&summary.warnings);
        metrics::counter!("analytics_reports_built").increment(1);
        tracing::info!(
            ending_quantity = summary.ending.quantity,
            warnings = summary.warnings.len(),
            "financial summary built"
        );
        Ok(summary)
    }

    /// Ledger write volume per item.
    #[tracing::instrument(skip(self))]
    pub async fn item_activity(
        &self,
        as_of: DateTime<Utc>,
        supplier_id: Option<SupplierId>,
    ) -> Result<ActivityReport> {
        let query = LedgerQuery::up_to(as_of).supplier_opt(supplier_id);
        let events = self.store.events_up_to(query).await?;

        let report = ActivityReport::build(as_of, &events);
        metrics::counter!("analytics_reports_built").increment(1);
        tracing::info!(items = report.items.len(), "activity report built");
        Ok(report)
    }

    /// Streams matching events and folds them item by item, holding one
    /// item's running state at a time.
    async fn replay_stream(&self, query: LedgerQuery) -> Result<Vec<ItemReplay>> {
        let mut stream = self.store.stream_events(query).await?;
        let mut replays = Vec::new();
        let mut current: Option<ItemReplayer> = None;
        let mut events_replayed: u64 = 0;

        while let Some(event) = stream.next().await {
            let event = event?;
            events_replayed += 1;

            if current.as_ref().is_some_and(|r| r.item_id() != event.item_id)
                && let Some(done) = current.take()
            {
                replays.push(done.finish());
            }
            current
                .get_or_insert_with(|| ItemReplayer::new(event.item_id, self.config))
                .apply(&event);
        }
        if let Some(done) = current.take() {
            replays.push(done.finish());
        }

        metrics::counter!("analytics_events_replayed").increment(events_replayed);
        Ok(replays)
    }

    /// Fetches matching events in one shot and replays them run by run.
    async fn replay_slice(&self, query: LedgerQuery) -> Result<Vec<ItemReplay>> {
        let events = self.store.events_up_to(query).await?;
        metrics::counter!("analytics_events_replayed").increment(events.len() as u64);
        Ok(replay_all(&events, self.config))
    }

    /// Fetches everything a windowed report needs: all matching events up
    /// to the window's end, so pre-window history shapes opening state.
    async fn fetch_window(
        &self,
        supplier_id: Option<SupplierId>,
        window: ReportWindow,
    ) -> Result<Vec<StockEvent>> {
        let query = LedgerQuery::up_to(window.end_bound()).supplier_opt(supplier_id);
        let events = self.store.events_up_to(query).await?;
        metrics::counter!("analytics_events_replayed").increment(events.len() as u64);
        Ok(events)
    }
}

fn note_warnings(warnings: &[IntegrityWarning]) {
    for warning in warnings {
        tracing::warn!(
            item_id = %warning.item_id,
            event_id = %warning.event_id,
            quantity = warning.quantity_on_hand,
            "item ledger inconsistent; excluded from totals"
        );
        metrics::counter!("analytics_integrity_warnings").increment(1);
    }
}
