//! Valuation reporting over the stock ledger.
//!
//! This crate turns replayed ledger state into the reports callers consume:
//! - [`AnalyticsService`] is the async facade; it fetches events from any
//!   [`ledger::LedgerStore`], replays them, and builds typed reports
//! - [`ReportWindow`] bounds the time-series reports to a day range
//! - report builders under [`reports`] are pure functions over event
//!   slices and replay outcomes, so they test without a store
//!
//! Items whose ledgers replay inconsistent are excluded from every total
//! and surfaced on the report as [`valuation::IntegrityWarning`]s; nothing
//! here guesses at corrected numbers.

pub mod error;
pub mod reports;
pub mod service;
pub mod window;

pub use error::{AnalyticsError, Result};
pub use reports::{
    ActivityReport, Bucket, FinancialSummary, ItemActivity, LowStockEntry, LowStockReport,
    MonthlyMovement, MovementReport, PricePoint, PriceTrendReport, ReorderLevels, StockValuePoint,
    StockValueSeries, SupplierStock, SupplierStockReport, ValuationReport, ValuationSnapshot,
};
pub use service::AnalyticsService;
pub use window::ReportWindow;
