//! Dashboard module
//!
//! Provides the payment failure dashboard: headline statistics, charts and a
//! table of transactions that can be searched, filtered by failure reason and
//! exported as CSV.

mod cards;
mod charts;
mod handlers;
mod identity;
mod tables;

pub use handlers::{DashboardQuery, get_dashboard_page, get_export_csv, get_report_endpoint};
