//! Narrowing a list of transactions down to the ones matching the dashboard controls.

use crate::payment::{FailureReason, PaymentTransaction};

/// Restricts a report to a single failure reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReasonFilter {
    /// Keep transactions regardless of their failure reason.
    #[default]
    All,
    /// Keep transactions whose raw reason code equals this reason's code.
    Only(FailureReason),
}

impl ReasonFilter {
    /// The query parameter value meaning "no filter".
    pub const ALL_QUERY_VALUE: &'static str = "ALL";

    /// Parse the `reason` query parameter. Missing, empty or "ALL" means no filter.
    pub fn from_query_value(value: Option<&str>) -> Self {
        match value {
            None | Some("") | Some(Self::ALL_QUERY_VALUE) => ReasonFilter::All,
            Some(code) => ReasonFilter::Only(FailureReason::from_code(code)),
        }
    }

    /// The value to use for this filter in a query string.
    pub fn as_query_value(&self) -> &str {
        match self {
            ReasonFilter::All => Self::ALL_QUERY_VALUE,
            ReasonFilter::Only(reason) => reason.as_code(),
        }
    }

    fn matches(&self, reason: Option<&FailureReason>) -> bool {
        match (self, reason) {
            (ReasonFilter::All, _) => true,
            (ReasonFilter::Only(wanted), Some(reason)) => wanted.as_code() == reason.as_code(),
            (ReasonFilter::Only(_), None) => false,
        }
    }
}

/// The search text and reason filter chosen by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    /// Matched case-insensitively anywhere in the transaction ID.
    pub search_text: String,
    /// Which failure reasons to keep.
    pub reason_filter: ReasonFilter,
}

impl ReportQuery {
    /// Create a query from search text and a reason filter.
    pub fn new(search_text: &str, reason_filter: ReasonFilter) -> Self {
        Self {
            search_text: search_text.to_owned(),
            reason_filter,
        }
    }
}

/// Keep the transactions matching `query`, in their original order.
///
/// A transaction matches when its ID contains the search text (ignoring case)
/// and its raw failure reason code passes the reason filter. Transactions
/// without a failure reason only pass [ReasonFilter::All].
pub fn filter_transactions<'a>(
    transactions: &'a [PaymentTransaction],
    query: &ReportQuery,
) -> Vec<&'a PaymentTransaction> {
    let needle = query.search_text.to_lowercase();

    transactions
        .iter()
        .filter(|transaction| transaction.id.to_lowercase().contains(&needle))
        .filter(|transaction| {
            query
                .reason_filter
                .matches(transaction.failure_reason.as_ref())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::{
        payment::{FailureReason, TransactionStatus},
        report::test_utils::{sample_transactions, transaction},
    };

    use super::{ReasonFilter, ReportQuery, filter_transactions};

    fn ids(filtered: &[&crate::payment::PaymentTransaction]) -> Vec<String> {
        filtered
            .iter()
            .map(|transaction| transaction.id.clone())
            .collect()
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let transactions = sample_transactions();

        let got = filter_transactions(&transactions, &ReportQuery::default());

        assert_eq!(ids(&got), ["TXN001", "TXN002", "TXN003", "TXN004"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let transactions = sample_transactions();

        let got = filter_transactions(
            &transactions,
            &ReportQuery::new("txn00", ReasonFilter::All),
        );
        assert_eq!(got.len(), 4);

        let got = filter_transactions(&transactions, &ReportQuery::new("N003", ReasonFilter::All));
        assert_eq!(ids(&got), ["TXN003"]);
    }

    #[test]
    fn search_without_match_is_empty() {
        let transactions = sample_transactions();

        let got = filter_transactions(&transactions, &ReportQuery::new("999", ReasonFilter::All));

        assert!(got.is_empty());
    }

    #[test]
    fn reason_filter_matches_raw_code() {
        let transactions = sample_transactions();

        let got = filter_transactions(
            &transactions,
            &ReportQuery::new("", ReasonFilter::Only(FailureReason::Timeout)),
        );

        assert_eq!(ids(&got), ["TXN004"]);
    }

    #[test]
    fn reason_filter_does_not_match_formatted_label() {
        let transactions = sample_transactions();

        let got = filter_transactions(
            &transactions,
            &ReportQuery::new("", ReasonFilter::from_query_value(Some("Timeout"))),
        );

        assert!(got.is_empty());
    }

    #[test]
    fn reason_filter_is_not_trimmed() {
        let transactions = sample_transactions();

        let got = filter_transactions(
            &transactions,
            &ReportQuery::new("", ReasonFilter::from_query_value(Some("TIMEOUT "))),
        );

        assert!(got.is_empty());
    }

    #[test]
    fn missing_reason_never_matches_concrete_filter() {
        let transactions = vec![
            transaction("TXN001", TransactionStatus::Success, None, 0),
            transaction("TXN002", TransactionStatus::Failed, None, 1),
        ];

        let got = filter_transactions(
            &transactions,
            &ReportQuery::new("", ReasonFilter::Only(FailureReason::NetworkError)),
        );

        assert!(got.is_empty());
    }

    #[test]
    fn filters_on_unknown_reason_codes() {
        let transactions = vec![
            transaction(
                "TXN001",
                TransactionStatus::Failed,
                Some(FailureReason::Other("FRAUD".to_owned())),
                1,
            ),
            transaction(
                "TXN002",
                TransactionStatus::Failed,
                Some(FailureReason::Timeout),
                1,
            ),
        ];

        let got = filter_transactions(
            &transactions,
            &ReportQuery::new("", ReasonFilter::from_query_value(Some("FRAUD"))),
        );

        assert_eq!(ids(&got), ["TXN001"]);
    }

    #[test]
    fn result_is_a_subsequence_of_the_input() {
        let transactions = sample_transactions();
        let queries = [
            ReportQuery::default(),
            ReportQuery::new("1", ReasonFilter::All),
            ReportQuery::new("", ReasonFilter::Only(FailureReason::InvalidCard)),
            ReportQuery::new("txn", ReasonFilter::Only(FailureReason::NetworkError)),
        ];

        for query in queries {
            let filtered = filter_transactions(&transactions, &query);
            let positions: Vec<usize> = filtered
                .iter()
                .map(|kept| {
                    transactions
                        .iter()
                        .position(|transaction| std::ptr::eq(transaction, *kept))
                        .expect("filtered transaction should come from the input")
                })
                .collect();

            assert!(
                positions.windows(2).all(|pair| pair[0] < pair[1]),
                "order not preserved for {query:?}: {positions:?}"
            );
        }
    }

    #[test]
    fn parses_reason_query_values() {
        assert_eq!(ReasonFilter::from_query_value(None), ReasonFilter::All);
        assert_eq!(ReasonFilter::from_query_value(Some("")), ReasonFilter::All);
        assert_eq!(ReasonFilter::from_query_value(Some("ALL")), ReasonFilter::All);
        assert_eq!(
            ReasonFilter::from_query_value(Some("INVALID_CARD")),
            ReasonFilter::Only(FailureReason::InvalidCard)
        );
        assert_eq!(
            ReasonFilter::Only(FailureReason::InvalidCard).as_query_value(),
            "INVALID_CARD"
        );
    }
}
