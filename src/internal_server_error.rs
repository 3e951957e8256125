//! The page to display when an internal server error occurs.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Text for the 500 page explaining what went wrong and how to fix it.
pub struct InternalServerError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl<'a> InternalServerError<'a> {
    /// A 500 page for a page whose data could not be loaded, e.g. "Failed to load people".
    pub fn load_failure(description: &'a str) -> Self {
        Self {
            description,
            ..Default::default()
        }
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(
                error_view("Internal Server Error", "500", self.description, self.fix)
                    .into_string(),
            ),
        )
            .into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}
