//! The page and endpoint for editing a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base},
    navigation::NavBar,
    person::get_person,
    transaction::{
        Transaction, TransactionFormData, TransactionFormDefaults, TransactionId,
        TransactionUpdate, get_transaction, transaction_form_fields, update_transaction,
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing a transaction.
pub async fn get_edit_transaction_page(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<EditTransactionState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection).inspect_err(|error| {
        tracing::debug!("Could not get transaction {transaction_id}: {error}")
    })?;
    let person = get_person(transaction.person_id, &connection)?;

    Ok(edit_transaction_view(&transaction, person.name.as_ref()).into_response())
}

/// A route handler for saving an edited transaction, redirects to the
/// person's page on success.
pub async fn update_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<EditTransactionState>,
    Form(form): Form<TransactionFormData>,
) -> Response {
    let update = TransactionUpdate {
        amount: Some(form.amount),
        kind: Some(form.kind),
        description: Some(form.description.trim().to_owned()),
        date: Some(form.date),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_transaction(transaction_id, update, &connection) {
        Ok(transaction) => (
            HxRedirect(endpoints::format_endpoint(
                endpoints::PERSON_VIEW,
                transaction.person_id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ (Error::InvalidAmount(_) | Error::UpdateMissingTransaction)) => {
            error.into_alert_response()
        }
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            Alert::failure_response("Failed to edit transaction")
        }
    }
}

fn edit_transaction_view(transaction: &Transaction, person_name: &str) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let update_url = endpoints::format_endpoint(endpoints::PUT_TRANSACTION, transaction.id);
    let person_url = endpoints::format_endpoint(endpoints::PERSON_VIEW, transaction.person_id);
    let nav_bar = NavBar::new(&edit_url, true).into_html();

    let fields = transaction_form_fields(&TransactionFormDefaults {
        kind: transaction.kind,
        amount: Some(transaction.amount),
        date: transaction.date,
        description: Some(&transaction.description),
        autofocus_amount: true,
    });

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="w-full text-xl font-bold mb-4" { "Edit Transaction" }

            p class="w-full mb-4 text-sm"
            {
                "For "
                a href=(person_url) class=(LINK_STYLE) { (person_name) }
            }

            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (fields)

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
            }
        }
    };

    base("Edit Transaction", &[], &content)
}
