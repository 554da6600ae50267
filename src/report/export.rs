//! The table projection of a transaction and its CSV export.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;

use crate::{Error, payment::PaymentTransaction};

use super::{
    reason::format_reason,
    severity::{Severity, classify},
};

/// The file name suggested to browsers when the CSV export is downloaded.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "payment_failure_report.csv";

/// Settings for the CSV download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// The file name sent in the `Content-Disposition` header.
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_EXPORT_FILE_NAME.to_owned(),
        }
    }
}

/// One line of the transactions table and of the CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// The raw transaction ID.
    #[serde(rename = "ID")]
    pub id: String,
    /// The raw status code, e.g. "FAILED".
    #[serde(rename = "Status")]
    pub status: &'static str,
    /// The formatted failure reason, "N/A" if there is none.
    #[serde(rename = "Failure Reason")]
    pub failure_reason: String,
    /// How many times the payment was retried.
    #[serde(rename = "Retries")]
    pub retries: u32,
    /// How urgently the transaction needs attention.
    #[serde(rename = "Severity")]
    pub severity: Severity,
}

impl From<&PaymentTransaction> for ReportRow {
    fn from(transaction: &PaymentTransaction) -> Self {
        Self {
            id: transaction.id.clone(),
            status: transaction.status.as_code(),
            failure_reason: format_reason(transaction.failure_reason.as_ref()),
            retries: transaction.retry_count,
            severity: classify(transaction.retry_count),
        }
    }
}

/// Render `transactions` as CSV with the header `ID,Status,Failure Reason,Retries,Severity`.
///
/// Lines are separated by `\n` and there is no newline after the last line.
/// Fields are only quoted when they contain a comma, quote or line break.
///
/// # Errors
/// Returns an [Error::CsvExport] if a row could not be written.
pub fn to_csv(transactions: &[&PaymentTransaction]) -> Result<String, Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if transactions.is_empty() {
        // Serializing writes the header with the first record, so an empty
        // export needs it written by hand.
        writer.write_record(["ID", "Status", "Failure Reason", "Retries", "Severity"])?;
    }

    for transaction in transactions {
        writer.serialize(ReportRow::from(*transaction))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvExport(error.to_string()))?;
    let mut csv = String::from_utf8(bytes).map_err(|error| Error::CsvExport(error.to_string()))?;

    if csv.ends_with('\n') {
        csv.pop();
    }

    Ok(csv)
}
