use time::OffsetDateTime;

use crate::payment::{FailureReason, PaymentTransaction, TransactionStatus};

pub fn transaction(
    id: &str,
    status: TransactionStatus,
    failure_reason: Option<FailureReason>,
    retry_count: u32,
) -> PaymentTransaction {
    PaymentTransaction::build(id, status)
        .failure_reason(failure_reason)
        .retry_count(retry_count)
        .user_email("ops@example.com")
        .finalize(OffsetDateTime::UNIX_EPOCH)
}

/// The four transactions the dashboard was first built against.
pub fn sample_transactions() -> Vec<PaymentTransaction> {
    vec![
        transaction(
            "TXN001",
            TransactionStatus::Failed,
            Some(FailureReason::NetworkError),
            2,
        ),
        transaction("TXN002", TransactionStatus::Success, None, 0),
        transaction(
            "TXN003",
            TransactionStatus::Failed,
            Some(FailureReason::InvalidCard),
            1,
        ),
        transaction(
            "TXN004",
            TransactionStatus::Failed,
            Some(FailureReason::Timeout),
            3,
        ),
    ]
}
