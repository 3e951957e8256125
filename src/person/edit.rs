//! Person renaming page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    person::{PersonFormData, PersonId, PersonName, get_person, rename_person},
};

/// The state needed for the rename page and endpoint.
#[derive(Debug, Clone)]
pub struct EditPersonState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditPersonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for renaming a person.
pub async fn get_edit_person_page(
    Path(person_id): Path<PersonId>,
    State(state): State<EditPersonState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_PERSON_VIEW, person_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_PERSON, person_id);

    match get_person(person_id, &connection) {
        Ok(person) => Ok(edit_person_view(
            &edit_endpoint,
            &update_endpoint,
            person.name.as_ref(),
            "",
        )
        .into_response()),
        Err(error) => {
            let error_message = match error {
                Error::NotFound => "Person not found",
                _ => {
                    tracing::error!("Failed to retrieve person {person_id}: {error}");
                    "Failed to load people"
                }
            };

            Ok(
                edit_person_view(&edit_endpoint, &update_endpoint, "", error_message)
                    .into_response(),
            )
        }
    }
}

/// Handle the rename form submission.
///
/// Redirects to the person's page on success.
pub async fn rename_person_endpoint(
    Path(person_id): Path<PersonId>,
    State(state): State<EditPersonState>,
    Form(form_data): Form<PersonFormData>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_PERSON, person_id);

    let name = match PersonName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => {
            return edit_person_form_view(
                &update_endpoint,
                &form_data.name,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match rename_person(person_id, name, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::format_endpoint(endpoints::PERSON_VIEW, person_id)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingPerson) => Error::UpdateMissingPerson.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while renaming person {person_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_person_view(
    edit_endpoint: &str,
    update_endpoint: &str,
    name: &str,
    error_message: &str,
) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint, true).into_html();
    let form = edit_person_form_view(update_endpoint, name, error_message);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Rename Person", &[], &content)
}

fn edit_person_form_view(update_endpoint: &str, name: &str, error_message: &str) -> Markup {
    html! {
        form
            hx-put=(update_endpoint)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "Name"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="Name"
                    value=(name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
        }
    }
}
