use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use payment_dashboard::{
    FailureReason, PaymentTransaction, TransactionStatus, create_payment_transaction,
    initialize_db,
};

/// A utility for creating a test database for the payment failure dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test transactions...");

    let transactions = [
        (
            "TXN001",
            TransactionStatus::Failed,
            Some(FailureReason::NetworkError),
            2,
            "alice@example.com",
        ),
        ("TXN002", TransactionStatus::Success, None, 0, "alice@example.com"),
        (
            "TXN003",
            TransactionStatus::Failed,
            Some(FailureReason::InvalidCard),
            1,
            "bob@example.com",
        ),
        (
            "TXN004",
            TransactionStatus::Failed,
            Some(FailureReason::Timeout),
            3,
            "bob@example.com",
        ),
    ];

    for (id, status, failure_reason, retry_count, user_email) in transactions {
        create_payment_transaction(
            PaymentTransaction::build(id, status)
                .failure_reason(failure_reason)
                .retry_count(retry_count)
                .user_email(user_email),
            &conn,
        )?;
    }

    println!("Success! Log in as alice@example.com or bob@example.com, or as an admin.");

    Ok(())
}
