//! Summary statistics and chart series for a filtered set of transactions.

use std::fmt::Display;

use serde::{Serialize, Serializer};

use crate::payment::{FailureReason, PaymentTransaction, TransactionStatus};

use super::reason::format_reason;

/// The name of the pie slice counting failed transactions.
pub const FAILURES_SLICE: &str = "Failures";
/// The name of the pie slice counting retries across failed transactions.
pub const RETRIES_SLICE: &str = "Retries";

/// The mean number of retries per failed transaction, rounded to two decimals.
///
/// Stored as a whole number of hundredths so that rounding is exact, e.g.
/// 2.005 rounds to 2.01 rather than whatever the nearest float does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct AverageRetries(u64);

impl AverageRetries {
    /// Compute `total_retries / failed`, rounding halves up.
    ///
    /// Zero failed transactions gives an average of zero.
    pub fn new(total_retries: u64, failed: usize) -> Self {
        if failed == 0 {
            return Self(0);
        }

        let failed = failed as u64;
        Self((total_retries * 200 + failed) / (failed * 2))
    }

    /// The average in hundredths, e.g. 200 for 2.00.
    pub fn hundredths(self) -> u64 {
        self.0
    }
}

impl Display for AverageRetries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for AverageRetries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Headline numbers for a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The number of transactions, regardless of status.
    pub total: usize,
    /// The number of failed transactions.
    pub failed: usize,
    /// The sum of retry counts over failed transactions.
    pub total_retries: u64,
    /// The mean retry count over failed transactions.
    pub average_retries: AverageRetries,
    /// Failed transactions grouped by raw reason code, in order of first occurrence.
    pub failure_counts: Vec<(Option<FailureReason>, usize)>,
}

/// Compute the statistics for `transactions`.
///
/// Only failed transactions contribute to the retry totals and the failure
/// counts. Retries on successful transactions are ignored.
pub fn summarize(transactions: &[&PaymentTransaction]) -> Statistics {
    let mut failed = 0;
    let mut total_retries = 0;
    let mut failure_counts: Vec<(Option<FailureReason>, usize)> = Vec::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.status == TransactionStatus::Failed)
    {
        failed += 1;
        total_retries += u64::from(transaction.retry_count);

        let code = transaction.failure_reason.as_ref().map(FailureReason::as_code);
        match failure_counts
            .iter_mut()
            .find(|(reason, _)| reason.as_ref().map(FailureReason::as_code) == code)
        {
            Some((_, count)) => *count += 1,
            None => failure_counts.push((transaction.failure_reason.clone(), 1)),
        }
    }

    Statistics {
        total: transactions.len(),
        failed,
        total_retries,
        average_retries: AverageRetries::new(total_retries, failed),
        failure_counts,
    }
}

/// One bar in the failure distribution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarEntry {
    /// The formatted failure reason.
    pub reason: String,
    /// How many failed transactions had this reason.
    pub count: usize,
}

/// One slice in the failures vs. retries chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieEntry {
    /// The slice label.
    pub name: &'static str,
    /// The slice size.
    pub value: u64,
}

/// The data behind the two dashboard charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    /// Failure counts per reason.
    pub bar: Vec<BarEntry>,
    /// Failed transactions against total retries.
    pub pie: [PieEntry; 2],
}

/// Derive the chart series from `statistics`.
///
/// Failed transactions without a reason have no bar to go in, so they are
/// left out of the bar series and a warning is logged.
pub fn chart_series(statistics: &Statistics) -> ChartSeries {
    let bar = statistics
        .failure_counts
        .iter()
        .filter_map(|(reason, count)| match reason {
            Some(reason) => Some(BarEntry {
                reason: format_reason(Some(reason)),
                count: *count,
            }),
            None => {
                tracing::warn!(
                    "{count} failed transaction(s) have no failure reason, leaving them out of the failure distribution"
                );
                None
            }
        })
        .collect();

    ChartSeries {
        bar,
        pie: [
            PieEntry {
                name: FAILURES_SLICE,
                value: statistics.failed as u64,
            },
            PieEntry {
                name: RETRIES_SLICE,
                value: statistics.total_retries,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        payment::{FailureReason, PaymentTransaction, TransactionStatus},
        report::test_utils::{sample_transactions, transaction},
    };

    use super::{AverageRetries, BarEntry, PieEntry, chart_series, summarize};

    fn all(transactions: &[PaymentTransaction]) -> Vec<&PaymentTransaction> {
        transactions.iter().collect()
    }

    #[test]
    fn summarizes_sample_transactions() {
        let transactions = sample_transactions();

        let got = summarize(&all(&transactions));

        assert_eq!(got.total, 4);
        assert_eq!(got.failed, 3);
        assert_eq!(got.total_retries, 6);
        assert_eq!(got.average_retries.to_string(), "2.00");
        assert_eq!(
            got.failure_counts,
            vec![
                (Some(FailureReason::NetworkError), 1),
                (Some(FailureReason::InvalidCard), 1),
                (Some(FailureReason::Timeout), 1),
            ]
        );
    }

    #[test]
    fn empty_input_gives_zeroes() {
        let got = summarize(&[]);

        assert_eq!(got.total, 0);
        assert_eq!(got.failed, 0);
        assert_eq!(got.total_retries, 0);
        assert_eq!(got.average_retries.to_string(), "0.00");
        assert!(got.failure_counts.is_empty());
    }

    #[test]
    fn only_successes_give_zero_average() {
        let transactions = vec![
            transaction("TXN001", TransactionStatus::Success, None, 0),
            transaction("TXN002", TransactionStatus::Success, None, 4),
        ];

        let got = summarize(&all(&transactions));

        assert_eq!(got.total, 2);
        assert_eq!(got.failed, 0);
        assert_eq!(got.total_retries, 0);
        assert_eq!(got.average_retries.to_string(), "0.00");
    }

    #[test]
    fn counts_repeated_reasons_in_first_occurrence_order() {
        let transactions = vec![
            transaction("A", TransactionStatus::Failed, Some(FailureReason::Timeout), 1),
            transaction("B", TransactionStatus::Failed, Some(FailureReason::NetworkError), 0),
            transaction("C", TransactionStatus::Failed, Some(FailureReason::Timeout), 2),
        ];

        let got = summarize(&all(&transactions));

        assert_eq!(
            got.failure_counts,
            vec![
                (Some(FailureReason::Timeout), 2),
                (Some(FailureReason::NetworkError), 1),
            ]
        );
        let counted: usize = got.failure_counts.iter().map(|(_, count)| count).sum();
        assert_eq!(counted, got.failed);
    }

    #[test]
    fn average_rounds_halves_up() {
        assert_eq!(AverageRetries::new(1, 3).to_string(), "0.33");
        assert_eq!(AverageRetries::new(2, 3).to_string(), "0.67");
        assert_eq!(AverageRetries::new(1, 8).to_string(), "0.13");
        assert_eq!(AverageRetries::new(5, 2).to_string(), "2.50");
        assert_eq!(AverageRetries::new(7, 0).to_string(), "0.00");
        assert_eq!(AverageRetries::new(1234, 1).to_string(), "1234.00");
    }

    #[test]
    fn average_serializes_as_string() {
        let got = serde_json::to_value(AverageRetries::new(6, 3)).unwrap();

        assert_eq!(got, serde_json::json!("2.00"));
    }

    #[test]
    fn chart_series_for_sample_transactions() {
        let transactions = sample_transactions();
        let statistics = summarize(&all(&transactions));

        let got = chart_series(&statistics);

        assert_eq!(
            got.bar,
            vec![
                BarEntry {
                    reason: "Network Error".to_owned(),
                    count: 1
                },
                BarEntry {
                    reason: "Invalid Card".to_owned(),
                    count: 1
                },
                BarEntry {
                    reason: "Timeout".to_owned(),
                    count: 1
                },
            ]
        );
        assert_eq!(
            got.pie,
            [
                PieEntry {
                    name: "Failures",
                    value: 3
                },
                PieEntry {
                    name: "Retries",
                    value: 6
                },
            ]
        );
    }

    #[test]
    fn failed_without_reason_is_counted_but_not_charted() {
        let transactions = vec![
            transaction("A", TransactionStatus::Failed, None, 1),
            transaction("B", TransactionStatus::Failed, Some(FailureReason::Timeout), 1),
        ];

        let statistics = summarize(&all(&transactions));
        let got = chart_series(&statistics);

        assert_eq!(statistics.failure_counts[0], (None, 1));
        assert_eq!(
            got.bar,
            vec![BarEntry {
                reason: "Timeout".to_owned(),
                count: 1
            }]
        );
        assert_eq!(got.pie[0].value, 2);
    }

    #[test]
    fn pie_is_always_two_slices() {
        let got = chart_series(&summarize(&[]));

        assert_eq!(got.pie[0].name, "Failures");
        assert_eq!(got.pie[0].value, 0);
        assert_eq!(got.pie[1].name, "Retries");
        assert_eq!(got.pie[1].value, 0);
        assert!(got.bar.is_empty());
    }
}
