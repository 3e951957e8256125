//! The JSON API under `/api/v1`.
//!
//! Handlers return [ApiError] so that failures are reported as
//! `{"error": "..."}` instead of an HTML page.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json,
    extract::{
        FromRef, FromRequest, FromRequestParts, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    dashboard::leaderboard,
    person::{
        Person, PersonFormData, PersonId, PersonName, create_person, delete_person,
        get_all_people, get_person, rename_person,
    },
    transaction::{
        NewTransaction, Transaction, TransactionId, TransactionUpdate, create_transaction,
        delete_transaction, get_transactions, update_transaction,
    },
};

/// An [Error] or an unreadable request, rendered as JSON.
#[derive(Debug)]
pub enum ApiError {
    /// The request was understood but the ledger refused or failed it.
    Ledger(Error),
    /// The request body, path or query string could not be parsed.
    BadRequest(String),
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self::Ledger(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match self {
            ApiError::Ledger(error) => error,
            ApiError::BadRequest(message) => {
                tracing::debug!("Rejected a malformed API request: {message}");
                return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response();
            }
        };

        let status = match &error {
            Error::NotFound
            | Error::UpdateMissingPerson
            | Error::DeleteMissingPerson
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction => StatusCode::NOT_FOUND,
            Error::EmptyPersonName
            | Error::InvalidAmount(_)
            | Error::InvalidTransactionKind(_)
            | Error::InvalidPerson(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred in the JSON API: {error}");
            "an unexpected error occurred, check the server logs for more details".to_owned()
        } else {
            error.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// [Json] that reports a malformed body as an [ApiError].
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// [Path] that reports an unparseable ID as an [ApiError].
#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// [Query] that reports a malformed query string as an [ApiError].
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// The state needed by the JSON API.
#[derive(Debug, Clone)]
pub struct ApiState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

impl ApiState {
    fn connection(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            ApiError::Ledger(Error::DatabaseLockError)
        })
    }
}

/// `GET /api/v1/people`
pub async fn list_people(State(state): State<ApiState>) -> Result<Json<Vec<Person>>, ApiError> {
    let connection = state.connection()?;

    Ok(Json(get_all_people(&connection)?))
}

/// `POST /api/v1/people`
pub async fn create_person_json(
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<PersonFormData>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let name = PersonName::new(&body.name)?;
    let connection = state.connection()?;
    let person = create_person(name, &connection)?;
    tracing::info!("Added person {} ({}) through the API", person.id, person.name);

    Ok((StatusCode::CREATED, Json(person)))
}

/// `PUT /api/v1/people/{person_id}`
pub async fn rename_person_json(
    ApiPath(person_id): ApiPath<PersonId>,
    State(state): State<ApiState>,
    ApiJson(body): ApiJson<PersonFormData>,
) -> Result<Json<Person>, ApiError> {
    let name = PersonName::new(&body.name)?;
    let connection = state.connection()?;
    rename_person(person_id, name, &connection)?;

    Ok(Json(get_person(person_id, &connection)?))
}

/// `DELETE /api/v1/people/{person_id}`
pub async fn delete_person_json(
    ApiPath(person_id): ApiPath<PersonId>,
    State(state): State<ApiState>,
) -> Result<StatusCode, ApiError> {
    let connection = state.connection()?;
    delete_person(person_id, &connection)?;
    tracing::info!("Deleted person {person_id} through the API");

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/v1/people/ranking`
pub async fn people_ranking(
    State(state): State<ApiState>,
) -> Result<Json<Vec<Person>>, ApiError> {
    let connection = state.connection()?;
    let people = get_all_people(&connection)?;

    Ok(Json(leaderboard(&people).into_iter().cloned().collect()))
}

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    pub person_id: Option<PersonId>,
}

/// `GET /api/v1/transactions?person_id=`
pub async fn list_transactions(
    State(state): State<ApiState>,
    ApiQuery(query): ApiQuery<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let connection = state.connection()?;

    Ok(Json(get_transactions(query.person_id, &connection)?))
}

/// `POST /api/v1/transactions`
pub async fn create_transaction_json(
    State(state): State<ApiState>,
    ApiJson(new_transaction): ApiJson<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let connection = state.connection()?;
    let transaction = create_transaction(new_transaction, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// `PUT /api/v1/transactions/{transaction_id}`
pub async fn update_transaction_json(
    ApiPath(transaction_id): ApiPath<TransactionId>,
    State(state): State<ApiState>,
    ApiJson(update): ApiJson<TransactionUpdate>,
) -> Result<Json<Transaction>, ApiError> {
    let connection = state.connection()?;

    Ok(Json(update_transaction(transaction_id, update, &connection)?))
}

/// `DELETE /api/v1/transactions/{transaction_id}`
pub async fn delete_transaction_json(
    ApiPath(transaction_id): ApiPath<TransactionId>,
    State(state): State<ApiState>,
) -> Result<StatusCode, ApiError> {
    let connection = state.connection()?;
    delete_transaction(transaction_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
