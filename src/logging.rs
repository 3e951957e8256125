//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{Method, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::internal_server_error::InternalServerError;

/// Bodies longer than this many characters are truncated at the `info` level.
const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
///
/// The `password` field of submitted forms is never logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Some(body_bytes) = read_body(body).await else {
        return InternalServerError::default().into_response();
    };
    let body_text = String::from_utf8_lossy(&body_bytes);

    let is_form = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

    if parts.method == Method::POST && is_form {
        log_body("Received request", &parts, &redact_password(&body_text));
    } else {
        log_body("Received request", &parts, &body_text);
    }

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let Some(body_bytes) = read_body(body).await else {
        return InternalServerError::default().into_response();
    };
    log_body("Sending response", &parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

async fn read_body(body: Body) -> Option<Bytes> {
    axum::body::to_bytes(body, usize::MAX)
        .await
        .inspect_err(|error| tracing::error!("Could not read body: {error}"))
        .ok()
}

fn redact_password(form_text: &str) -> String {
    form_text
        .split('&')
        .map(|pair| {
            if pair.starts_with("password=") {
                "password=********"
            } else {
                pair
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(index, _)| &body[..index])
}

fn log_body(label: &str, headers: &impl std::fmt::Debug, body: &str) {
    match truncate(body) {
        Some(truncated) => {
            tracing::info!("{label}: {headers:#?}\nbody: {truncated}...");
            tracing::debug!("Full body: {body:?}");
        }
        None => tracing::info!("{label}: {headers:#?}\nbody: {body:?}"),
    }
}
