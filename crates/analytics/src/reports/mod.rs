//! Report DTOs and the pure builders that compute them.
//!
//! Builders take replay outcomes (or an ordered event slice, when they
//! need per-event visibility) and produce serializable reports. They never
//! touch the store; fetching is [`AnalyticsService`](crate::AnalyticsService)'s
//! job, which keeps every builder synchronous and directly testable.

pub mod activity;
pub mod financial;
pub mod low_stock;
pub mod movement;
pub mod price_trend;
pub mod stock_value;
pub mod supplier;
pub mod valuation;

pub use activity::{ActivityReport, ItemActivity};
pub use financial::{Bucket, FinancialSummary};
pub use low_stock::{LowStockEntry, LowStockReport, ReorderLevels};
pub use movement::{MonthlyMovement, MovementReport};
pub use price_trend::{PricePoint, PriceTrendReport};
pub use stock_value::{StockValuePoint, StockValueSeries};
pub use supplier::{SupplierStock, SupplierStockReport};
pub use valuation::{ValuationReport, ValuationSnapshot};
