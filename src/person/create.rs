//! Person creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    person::{PersonFormData, PersonName, create_person},
};

/// The state needed for creating a person.
#[derive(Debug, Clone)]
pub struct CreatePersonEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreatePersonEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the page for adding a person.
///
/// The route sits behind the edit mode guard, so the nav bar always shows the lock link.
pub async fn get_new_person_page() -> Response {
    new_person_view().into_response()
}

/// Handle person creation form submission.
///
/// Redirects to the new person's page on success.
pub async fn create_person_endpoint(
    State(state): State<CreatePersonEndpointState>,
    Form(form_data): Form<PersonFormData>,
) -> Response {
    let name = match PersonName::new(&form_data.name) {
        Ok(name) => name,
        Err(error) => {
            return new_person_form_view(&format!("Error: {error}")).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_person(name, &connection) {
        Ok(person) => {
            tracing::info!("Added person {} ({})", person.id, person.name);

            (
                HxRedirect(endpoints::format_endpoint(endpoints::PERSON_VIEW, person.id)),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while adding a person: {error}");
            Alert::failure_response("Failed to add person")
        }
    }
}

fn new_person_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_PERSON_VIEW, true).into_html();
    let form = new_person_form_view("");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Add Person", &[], &content)
}

fn new_person_form_view(error_message: &str) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_PERSON)
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
                    placeholder="e.g. Bảo"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if !error_message.is_empty() {
                p class="text-red-600 dark:text-red-400"
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Person" }
        }
    }
}
