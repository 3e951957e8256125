//! Person deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::Response,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    person::{PersonId, count_transactions_per_person, delete_person},
};

/// The state needed for deleting a person.
#[derive(Debug, Clone)]
pub struct DeletePersonEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeletePersonEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a person along with their transactions. Returns a success alert or error.
pub async fn delete_person_endpoint(
    Path(person_id): Path<PersonId>,
    State(state): State<DeletePersonEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let transaction_count = match count_transactions_per_person(&connection) {
        Ok(counts) => counts.get(&person_id).copied().unwrap_or(0),
        Err(error) => {
            tracing::error!("Could not count transactions for person {person_id}: {error}");
            return Alert::failure_response("Failed to delete person");
        }
    };

    match delete_person(person_id, &connection) {
        Ok(_) => {
            tracing::info!(
                "Deleted person {person_id} and {transaction_count} transaction(s)"
            );

            Alert::Success {
                message: "Person deleted".to_owned(),
                details: format!("Removed {transaction_count} transaction(s)."),
            }
            .into_oob_response()
        }
        Err(Error::DeleteMissingPerson) => Error::DeleteMissingPerson.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting person {person_id}: {error}"
            );
            Alert::failure_response("Failed to delete person")
        }
    }
}
