//! Sổ Nợ is a web app for keeping a ledger of who owes you money.
//!
//! The library serves HTML pages directly, with a small JSON API on the side.
//! Each person has a running total debt that is kept in step with their
//! debt and payment transactions.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod api;
mod app_state;
mod dashboard;
mod db;
mod edit_mode;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod person;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use edit_mode::{PasswordHash, ValidatedPassword, get_edit_password, set_edit_password};
pub use logging::logging_middleware;
pub use person::{Person, PersonId, PersonName, create_person};
pub use routing::build_router;
pub use transaction::{NewTransaction, TransactionKind, create_transaction};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The password entered to unlock edit mode did not match.
    #[error("incorrect password")]
    InvalidCredentials,

    /// No edit password has been stored yet.
    ///
    /// The server owner needs to run the `set_edit_password` binary first.
    #[error("the edit password has not been set")]
    EditPasswordNotSet,

    /// The edit-mode cookie is missing or could not be read.
    #[error("edit mode cookie missing or invalid")]
    CookieError,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An empty string was used to create a person's name.
    #[error("Name cannot be empty")]
    EmptyPersonName,

    /// A transaction amount was negative, NaN or infinite.
    #[error("{0} is not a valid amount, amounts must be zero or more")]
    InvalidAmount(f64),

    /// A string other than "debt" or "payment" was used as a transaction kind.
    #[error("\"{0}\" is not a valid transaction kind")]
    InvalidTransactionKind(String),

    /// The person ID used to create a transaction did not match a person.
    #[error("the person ID {0} does not refer to a person")]
    InvalidPerson(PersonId),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a person that does not exist
    #[error("tried to update a person that is not in the database")]
    UpdateMissingPerson,

    /// Tried to delete a person that does not exist
    #[error("tried to delete a person that is not in the database")]
    DeleteMissingPerson,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,
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

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status_code, message, details) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid Timezone Settings",
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                "Invalid amount",
                format!("{amount} is not a valid amount. Enter a number that is zero or more."),
            ),
            Error::InvalidPerson(person_id) => (
                StatusCode::BAD_REQUEST,
                "Failed to add transaction",
                format!("Could not find a person with the ID {person_id}."),
            ),
            Error::UpdateMissingPerson => (
                StatusCode::NOT_FOUND,
                "Failed to update person",
                "The person could not be found.".to_owned(),
            ),
            Error::DeleteMissingPerson => (
                StatusCode::NOT_FOUND,
                "Failed to delete person",
                "The person could not be found. \
                Try refreshing the page to see if they have already been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Failed to edit transaction",
                "The transaction could not be found.".to_owned(),
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Failed to delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted."
                    .to_owned(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.".to_owned(),
            ),
        };

        (
            status_code,
            Alert::Error {
                message: message.to_owned(),
                details,
            },
        )
            .into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;

    use crate::{
        Error,
        test_utils::{assert_content_type, assert_valid_html, parse_html_fragment},
    };

    #[test]
    fn no_rows_maps_to_not_found() {
        let error = Error::from(rusqlite::Error::QueryReturnedNoRows);

        assert_eq!(error, Error::NotFound);
    }

    #[tokio::test]
    async fn alert_response_uses_user_facing_message() {
        let response = Error::DeleteMissingPerson.into_alert_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(
            text.contains("Failed to delete person"),
            "want alert to contain \"Failed to delete person\", got {text:?}"
        );
    }
}
