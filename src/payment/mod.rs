//! Payment transactions as stored by the payment service.
//!
//! This module contains:
//! - The `PaymentTransaction` model and `PaymentTransactionBuilder` for creating transactions
//! - Database functions for storing and listing transactions
//! - The REST endpoint that lists the transactions visible to a caller

mod core;
mod listing;

pub use core::{
    FailureReason, PaymentTransaction, PaymentTransactionBuilder, TransactionStatus, Visibility,
    create_payment_transaction, create_payment_transaction_table, list_payment_transactions,
};
pub use listing::get_transactions_endpoint;
pub(crate) use listing::fetch_visible_transactions;
