//! Middleware that only lets requests through while edit mode is unlocked.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState,
    edit_mode::{
        cookie::{extend_edit_cookie, get_token_from_cookies},
        redirect::{build_unlock_redirect_url, build_unlock_redirect_url_from_target},
    },
    endpoints,
};

/// The state needed for the edit-mode guard.
#[derive(Clone)]
pub struct EditModeState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How far each request pushes out the edit-mode cookie's expiry.
    pub edit_mode_duration: Duration,
}

impl FromRef<AppState> for EditModeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            edit_mode_duration: state.edit_mode_duration,
        }
    }
}

impl FromRef<EditModeState> for Key {
    fn from_ref(state: &EditModeState) -> Self {
        state.cookie_key.clone()
    }
}

#[inline]
async fn edit_mode_guard_internal(
    state: EditModeState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let unlock_url = build_unlock_redirect_url(&request).unwrap_or_else(|| {
        build_unlock_redirect_url_from_target(endpoints::DASHBOARD_VIEW)
            .unwrap_or_else(|| endpoints::UNLOCK_VIEW.to_owned())
    });

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error getting cookie jar: {error:?}. Redirecting to unlock page.");
            return get_redirect(&unlock_url);
        }
    };

    if get_token_from_cookies(&jar).is_err() {
        tracing::debug!("Edit mode is locked for {}", parts.uri.path());
        return get_redirect(&unlock_url);
    }

    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_edit_cookie(jar.clone(), state.edit_mode_duration) {
        Ok(updated_jar) => updated_jar,
        Err(error) => {
            tracing::error!("Error extending edit mode: {error}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, value) in jar.into_response().headers().iter() {
        if key == SET_COOKIE {
            parts.headers.append(key, value.to_owned());
        }
    }

    Response::from_parts(parts, body)
}

/// Redirects to the unlock page unless the request carries a valid edit-mode
/// cookie. Each allowed request extends edit mode.
pub async fn edit_mode_guard(
    State(state): State<EditModeState>,
    request: Request,
    next: Next,
) -> Response {
    edit_mode_guard_internal(state, request, next, |unlock_url| {
        Redirect::to(unlock_url).into_response()
    })
    .await
}

/// Like [edit_mode_guard], but redirects htmx requests with the HX-Redirect header.
pub async fn edit_mode_guard_hx(
    State(state): State<EditModeState>,
    request: Request,
    next: Next,
) -> Response {
    edit_mode_guard_internal(state, request, next, |unlock_url| {
        (HxRedirect(unlock_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}
