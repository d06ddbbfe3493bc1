//! Order analytics pipeline for the Legal Desk dashboard
//!
//! Queries a read-only SQLite store of orders, order items and products,
//! then reshapes the results into the tables the chart views consume:
//! connect → query → reshape → hand off.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod query;
pub mod store;
pub mod table;
pub mod utils;

pub use aggregator::{
    category_drilldown, category_over_time, distinct_categories, resample, CategoryMonthTotal,
    Granularity, PeriodSummary, ProductTotal,
};
pub use error::{DashError, Result};
pub use query::{
    fetch_daily_orders, fetch_order_lines, fetch_product_frequency, DailyOrderSummary,
    OrderProductLine, ProductFrequency,
};
pub use store::{Store, StoreConfig};
