//! A dashboard for investigating failed payments.
//!
//! Payment transactions are read from a SQLite database and turned into a
//! report: headline statistics, chart series, a searchable table and a CSV
//! export. The library provides a REST API that directly serves HTML pages,
//! along with JSON endpoints for the raw transactions and the report.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod dashboard;
mod db;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod payment;
mod report;
mod routing;
mod viewer;

pub use app_state::AppState;
pub use dashboard::DashboardQuery;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use payment::{
    FailureReason, PaymentTransaction, PaymentTransactionBuilder, TransactionStatus, Visibility,
    create_payment_transaction, list_payment_transactions,
};
pub use report::{
    AverageRetries, BarEntry, ChartSeries, DEFAULT_EXPORT_FILE_NAME, ExportConfig, PieEntry,
    ReasonFilter, Report, ReportQuery, ReportRow, Severity, Statistics, build_report, classify,
    filter_transactions, format_reason, summarize, to_csv,
};
pub use routing::build_router;
pub use viewer::{Role, ViewerQuery};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
