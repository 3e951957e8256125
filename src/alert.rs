//! Alert fragments for reporting the outcome of htmx requests.
//!
//! Alerts are swapped into the `#alert-container` element that [crate::html::base]
//! places at the bottom of every page.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

/// A success or error message shown to the user after a mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra detail text.
    Success { message: String, details: String },
    /// An error message with extra detail text.
    Error { message: String, details: String },
}

impl Alert {
    /// An alert for an unexpected failure, e.g. "Failed to add person", served
    /// with a 500 status code.
    pub fn failure_response(message: &str) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Alert::Error {
                message: message.to_owned(),
                details: "An unexpected error occurred, check the server logs for more details."
                    .to_owned(),
            },
        )
            .into_response()
    }

    /// Send the alert to `#alert-container` as an out-of-band swap, leaving
    /// the main swap free for the element that triggered the request, e.g. a
    /// table row that is deleted.
    pub fn into_oob_response(self) -> Response {
        let markup = html! {
            div id="alert-container" hx-swap-oob="innerHTML"
            {
                (self.into_html())
            }
        };

        Html(markup.into_string()).into_response()
    }

    fn into_html(self) -> Markup {
        let (is_success, message, details) = match self {
            Alert::Success { message, details } => (true, message, details),
            Alert::Error { message, details } => (false, message, details),
        };

        let container_style = if is_success {
            "flex items-start gap-3 p-4 mb-4 rounded-lg border text-green-800 \
            border-green-300 bg-green-50 dark:bg-gray-800 dark:text-green-400 \
            dark:border-green-800"
        } else {
            "flex items-start gap-3 p-4 mb-4 rounded-lg border text-red-800 \
            border-red-300 bg-red-50 dark:bg-gray-800 dark:text-red-400 \
            dark:border-red-800"
        };

        html! {
            div
                role="alert"
                class=(container_style)
                data-alert-kind=(if is_success { "success" } else { "error" })
            {
                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        div class="mt-1 text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto text-sm font-semibold"
                    aria-label="Dismiss"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}
