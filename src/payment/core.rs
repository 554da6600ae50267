//! Defines the payment transaction model and the database queries for storing and listing it.

use std::fmt::Display;

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// The outcome of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// The payment went through.
    Success,
    /// The payment did not go through, see [PaymentTransaction::failure_reason].
    Failed,
}

impl TransactionStatus {
    /// The code used for this status in the database, the API and CSV exports.
    pub fn as_code(self) -> &'static str {
        match self {
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failed => "FAILED",
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

impl ToSql for TransactionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_code()))
    }
}

impl FromSql for TransactionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "SUCCESS" => Ok(TransactionStatus::Success),
            "FAILED" => Ok(TransactionStatus::Failed),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// Why a payment failed.
///
/// Codes outside the known set are kept verbatim in [FailureReason::Other] so
/// that data written by other services can still be listed and reported on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FailureReason {
    /// The payment provider could not be reached.
    NetworkError,
    /// The card was rejected.
    InvalidCard,
    /// The payment provider did not respond in time.
    Timeout,
    /// Any other reason code.
    Other(String),
}

impl FailureReason {
    /// The failure reasons offered in the dashboard's reason filter.
    pub const KNOWN: [FailureReason; 3] = [
        FailureReason::NetworkError,
        FailureReason::InvalidCard,
        FailureReason::Timeout,
    ];

    /// Parse a raw reason code. Never fails, unknown codes become [FailureReason::Other].
    pub fn from_code(code: &str) -> Self {
        match code {
            "NETWORK_ERROR" => FailureReason::NetworkError,
            "INVALID_CARD" => FailureReason::InvalidCard,
            "TIMEOUT" => FailureReason::Timeout,
            other => FailureReason::Other(other.to_owned()),
        }
    }

    /// The raw reason code, e.g. "NETWORK_ERROR".
    pub fn as_code(&self) -> &str {
        match self {
            FailureReason::NetworkError => "NETWORK_ERROR",
            FailureReason::InvalidCard => "INVALID_CARD",
            FailureReason::Timeout => "TIMEOUT",
            FailureReason::Other(code) => code,
        }
    }
}

impl From<String> for FailureReason {
    fn from(value: String) -> Self {
        FailureReason::from_code(&value)
    }
}

impl From<FailureReason> for String {
    fn from(value: FailureReason) -> Self {
        match value {
            FailureReason::Other(code) => code,
            known => known.as_code().to_owned(),
        }
    }
}

impl ToSql for FailureReason {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_code()))
    }
}

impl FromSql for FailureReason {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().map(FailureReason::from_code)
    }
}

/// A single payment attempt, its outcome and how often it was retried.
///
/// Records are written by the payment service and are read-only for the dashboard.
/// To create a new `PaymentTransaction`, use [PaymentTransaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
    /// The transaction identifier, unique within the store.
    pub id: String,
    /// Whether the payment succeeded.
    pub status: TransactionStatus,
    /// Why the payment failed.
    ///
    /// Should be set if and only if `status` is [TransactionStatus::Failed],
    /// but records that break this rule are still accepted.
    pub failure_reason: Option<FailureReason>,
    /// How many times the payment was retried.
    pub retry_count: u32,
    /// The email of the user that owns the transaction.
    pub user_email: String,
    /// When the record was stored.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the record was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PaymentTransaction {
    /// Create a new payment transaction.
    ///
    /// Shortcut for [PaymentTransactionBuilder] for discoverability.
    pub fn build(id: &str, status: TransactionStatus) -> PaymentTransactionBuilder {
        PaymentTransactionBuilder {
            id: id.to_owned(),
            status,
            failure_reason: None,
            retry_count: 0,
            user_email: String::new(),
            created_at: None,
        }
    }
}

/// A builder for creating [PaymentTransaction] instances.
///
/// ```ignore
/// let transaction = PaymentTransaction::build("TXN001", TransactionStatus::Failed)
///     .failure_reason(Some(FailureReason::Timeout))
///     .retry_count(3)
///     .user_email("ops@example.com");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentTransactionBuilder {
    /// The transaction identifier.
    pub id: String,
    /// The outcome of the payment.
    pub status: TransactionStatus,
    /// Why the payment failed, if it did.
    pub failure_reason: Option<FailureReason>,
    /// How many times the payment was retried.
    pub retry_count: u32,
    /// The owner of the transaction.
    pub user_email: String,
    /// Overrides the creation time, which otherwise defaults to the time of insertion.
    pub created_at: Option<OffsetDateTime>,
}

impl PaymentTransactionBuilder {
    /// Set the failure reason for the transaction.
    pub fn failure_reason(mut self, failure_reason: Option<FailureReason>) -> Self {
        self.failure_reason = failure_reason;
        self
    }

    /// Set the retry count for the transaction.
    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Set the owner of the transaction.
    pub fn user_email(mut self, user_email: &str) -> Self {
        self.user_email = user_email.to_owned();
        self
    }

    /// Set the creation time of the transaction.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Build the transaction, stamping it with `now` unless a creation time was set.
    pub fn finalize(self, now: OffsetDateTime) -> PaymentTransaction {
        let created_at = self.created_at.unwrap_or(now);

        PaymentTransaction {
            id: self.id,
            status: self.status,
            failure_reason: self.failure_reason,
            retry_count: self.retry_count,
            user_email: self.user_email,
            created_at,
            updated_at: created_at,
        }
    }
}

/// Which transactions a listing returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Every transaction in the store.
    All,
    /// Only the transactions owned by the user with this email.
    Owner(String),
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Store a new transaction in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateTransactionId] if a transaction with the same ID already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_payment_transaction(
    builder: PaymentTransactionBuilder,
    connection: &Connection,
) -> Result<PaymentTransaction, Error> {
    let transaction = builder.finalize(OffsetDateTime::now_utc());

    connection
        .execute(
            "INSERT INTO payment_transaction
                (transaction_id, status, failure_reason, retry_count, user_email, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                &transaction.id,
                transaction.status,
                &transaction.failure_reason,
                transaction.retry_count,
                &transaction.user_email,
                transaction.created_at,
                transaction.updated_at,
            ),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateTransactionId(transaction.id.clone()),
            error => error.into(),
        })?;

    Ok(transaction)
}

/// List the transactions visible to a caller, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or a row cannot be mapped.
pub fn list_payment_transactions(
    visibility: &Visibility,
    connection: &Connection,
) -> Result<Vec<PaymentTransaction>, Error> {
    const COLUMNS: &str =
        "transaction_id, status, failure_reason, retry_count, user_email, created_at, updated_at";

    let transactions = match visibility {
        Visibility::All => connection
            .prepare(&format!(
                "SELECT {COLUMNS} FROM payment_transaction ORDER BY created_at DESC, id DESC"
            ))?
            .query_map([], map_payment_transaction_row)?
            .collect::<Result<Vec<_>, rusqlite::Error>>()?,
        Visibility::Owner(user_email) => connection
            .prepare(&format!(
                "SELECT {COLUMNS} FROM payment_transaction WHERE user_email = ?1 \
                ORDER BY created_at DESC, id DESC"
            ))?
            .query_map([user_email], map_payment_transaction_row)?
            .collect::<Result<Vec<_>, rusqlite::Error>>()?,
    };

    Ok(transactions)
}

/// Create the payment transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_payment_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS payment_transaction (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                transaction_id TEXT NOT NULL UNIQUE,
                status TEXT NOT NULL CHECK (status IN ('SUCCESS', 'FAILED')),
                failure_reason TEXT,
                retry_count INTEGER NOT NULL DEFAULT 0 CHECK (retry_count >= 0),
                user_email TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    // Viewers list their own transactions newest first.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_payment_transaction_owner_created
            ON payment_transaction(user_email, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [PaymentTransaction].
pub fn map_payment_transaction_row(row: &Row) -> Result<PaymentTransaction, rusqlite::Error> {
    Ok(PaymentTransaction {
        id: row.get(0)?,
        status: row.get(1)?,
        failure_reason: row.get(2)?,
        retry_count: row.get(3)?,
        user_email: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
