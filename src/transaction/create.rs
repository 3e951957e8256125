//! Defines the endpoint for adding a transaction to a person.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    person::PersonId,
    transaction::{NewTransaction, TransactionFormData, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for adding a debt or payment to a person, redirects to
/// the person's page on success.
pub async fn create_transaction_endpoint(
    Path(person_id): Path<PersonId>,
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let new_transaction = NewTransaction::new(person_id, form.amount, form.kind, form.date)
        .description(form.description.trim());

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_transaction(new_transaction, &connection) {
        Ok(transaction) => {
            tracing::info!(
                "Added {} of {} for person {person_id}",
                transaction.kind,
                transaction.amount
            );

            (
                HxRedirect(endpoints::format_endpoint(endpoints::PERSON_VIEW, person_id)),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error @ (Error::InvalidAmount(_) | Error::InvalidPerson(_))) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            Alert::failure_response("Failed to add transaction")
        }
    }
}
