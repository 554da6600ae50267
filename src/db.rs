//! Sets up the application's database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::payment::create_payment_transaction_table;

/// Create all the tables the application needs.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_payment_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
