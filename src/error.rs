//! Defines the app level error type and conversions to rendered HTML pages, alerts and JSON.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A transaction with the same ID is already stored.
    #[error("the transaction ID \"{0}\" already exists in the database")]
    DuplicateTransactionId(String),

    /// A viewer asked for transactions without saying who they are.
    #[error("an email is required to view transactions")]
    MissingUserEmail,

    /// The email given by a viewer is not an email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The query string could not be parsed.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// The CSV export could not be written.
    #[error("could not write the CSV export: {0}")]
    CsvExport(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvExport(value.to_string())
    }
}

impl Error {
    /// The HTTP status code a client should see for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::MissingUserEmail | Error::InvalidEmail(_) | Error::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::DuplicateTransactionId(_) => StatusCode::CONFLICT,
            Error::SqlError(_) | Error::DatabaseLockError | Error::CsvExport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message shown to the client.
    ///
    /// Server side failures get a generic message, the details only go to the logs.
    fn client_message(&self) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => {
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            _ => self.to_string(),
        }
    }

    /// Convert the error into a JSON response of the form `{"message": "..."}`.
    pub fn into_json_response(self) -> Response {
        let status_code = self.status_code();

        if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        (
            status_code,
            Json(json!({ "message": self.client_message() })),
        )
            .into_response()
    }

    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::MissingUserEmail => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Email required".to_owned(),
                    details: "Enter your email address to see your transactions.".to_owned(),
                },
            ),
            Error::InvalidEmail(email) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid email".to_owned(),
                    details: format!("\"{email}\" is not a valid email address."),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    error.status_code(),
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            Error::CsvExport(_) => {
                tracing::error!("{}", self);
                InternalServerError {
                    description: "Export Failed",
                    fix: "The CSV export could not be created. Please try again.",
                }
                .into_response()
            }
            Error::MissingUserEmail | Error::InvalidEmail(_) | Error::InvalidQuery(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
