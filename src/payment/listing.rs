//! The REST endpoint for listing the payment transactions visible to a caller.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, viewer::ViewerQuery};

use super::core::{PaymentTransaction, list_payment_transactions};

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct ListingState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List transactions as JSON, newest first.
///
/// Admins get every transaction, viewers only the ones they own.
pub async fn get_transactions_endpoint(
    State(state): State<ListingState>,
    viewer: Result<Query<ViewerQuery>, QueryRejection>,
) -> Response {
    let viewer = match viewer {
        Ok(Query(viewer)) => viewer,
        Err(rejection) => return Error::InvalidQuery(rejection.body_text()).into_json_response(),
    };

    match fetch_visible_transactions(&viewer, &state.db_connection) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_json_response(),
    }
}

/// Fetch the transactions `viewer` may see.
///
/// The database lock is released before returning so callers can do the
/// reporting work without blocking other requests.
///
/// # Errors
/// Returns an error if the viewer's identity is incomplete, the lock is
/// poisoned or the query fails.
pub(crate) fn fetch_visible_transactions(
    viewer: &ViewerQuery,
    db_connection: &Mutex<Connection>,
) -> Result<Vec<PaymentTransaction>, Error> {
    let visibility = viewer.visibility()?;

    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    list_payment_transactions(&visibility, &connection)
        .inspect_err(|error| tracing::error!("could not list transactions: {error}"))
}
