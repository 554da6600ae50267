//! Turns a list of payment transactions into the dashboard's report: the
//! filtered transactions, their statistics, chart series, table rows and CSV export.
//!
//! Everything in here is synchronous and free of side effects apart from logging,
//! so the same inputs always give the same report.

mod aggregation;
mod export;
mod filter;
mod reason;
mod severity;

#[cfg(test)]
mod test_utils;

pub use aggregation::{
    AverageRetries, BarEntry, ChartSeries, PieEntry, Statistics, chart_series, summarize,
};
pub use export::{DEFAULT_EXPORT_FILE_NAME, ExportConfig, ReportRow, to_csv};
pub use filter::{ReasonFilter, ReportQuery, filter_transactions};
pub use reason::format_reason;
pub use severity::{Severity, classify};

use serde::Serialize;

use crate::{Error, payment::PaymentTransaction};

/// The filtered transactions and everything derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    /// Headline numbers for the filtered transactions.
    pub statistics: Statistics,
    /// The data for the two charts.
    pub chart_series: ChartSeries,
    /// The transactions that matched the query, in their original order.
    pub filtered: Vec<&'a PaymentTransaction>,
}

impl Report<'_> {
    /// The table rows for the filtered transactions.
    pub fn rows(&self) -> Vec<ReportRow> {
        self.filtered
            .iter()
            .map(|transaction| ReportRow::from(*transaction))
            .collect()
    }

    /// The CSV export of the filtered transactions.
    ///
    /// # Errors
    /// Returns an [Error::CsvExport] if the CSV could not be written.
    pub fn to_csv(&self) -> Result<String, Error> {
        to_csv(&self.filtered)
    }
}

/// Filter `transactions` with `query` and derive the report from the result.
pub fn build_report<'a>(transactions: &'a [PaymentTransaction], query: &ReportQuery) -> Report<'a> {
    let filtered = filter_transactions(transactions, query);
    let statistics = summarize(&filtered);
    let chart_series = chart_series(&statistics);

    Report {
        statistics,
        chart_series,
        filtered,
    }
}
