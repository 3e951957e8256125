//! The unlock page and the endpoints that turn edit mode on and off.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    edit_mode::{
        PasswordHash, get_edit_password, invalidate_edit_cookie, redirect::normalize_redirect_url,
        set_edit_cookie,
    },
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner, password_input},
    navigation::NavBar,
};

pub const INCORRECT_PASSWORD_ERROR_MSG: &str = "Incorrect password.";
pub const PASSWORD_NOT_SET_ERROR_MSG: &str =
    "Edit password not set, run set_edit_password on the server to set it.";
const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

/// The state needed to unlock edit mode.
#[derive(Debug, Clone)]
pub struct UnlockState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// How long edit mode stays unlocked.
    pub edit_mode_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UnlockState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            edit_mode_duration: state.edit_mode_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<UnlockState> for Key {
    fn from_ref(state: &UnlockState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// The data submitted by the unlock form.
#[derive(Deserialize)]
pub struct UnlockData {
    pub password: String,
    /// Where to go once edit mode is unlocked.
    pub redirect_url: Option<String>,
}

fn parse_redirect_url(raw_url: Option<&str>) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(raw_url) = raw_url {
                tracing::warn!("Ignoring invalid redirect URL {raw_url}");
            }
            None
        }
    }
}

/// Display the unlock page.
pub async fn get_unlock_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref());
    let nav_bar = NavBar::new(endpoints::UNLOCK_VIEW, false).into_html();
    let form = unlock_form(None, redirect_url.as_deref());

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="w-full text-xl font-bold mb-2" { "Unlock editing" }
            p class="w-full mb-4 text-sm text-gray-500 dark:text-gray-400"
            {
                "Enter the edit password to add, change or remove entries."
            }

            (form)
        }
    };

    base("Unlock", &[], &content).into_response()
}

/// Check the edit password and set the edit-mode cookie.
///
/// On success the client is redirected to `redirect_url`, or the dashboard.
/// Otherwise the form is returned with an error message.
pub async fn post_unlock(
    State(state): State<UnlockState>,
    jar: PrivateCookieJar,
    Form(form): Form<UnlockData>,
) -> Response {
    let redirect_url = parse_redirect_url(form.redirect_url.as_deref());
    let redirect_url = redirect_url.as_deref();

    let password_hash = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return unlock_form(Some(INTERNAL_ERROR_MSG), redirect_url).into_response();
            }
        };

        match get_edit_password(&connection) {
            Ok(password_hash) => password_hash,
            Err(Error::EditPasswordNotSet) => {
                return unlock_form(Some(PASSWORD_NOT_SET_ERROR_MSG), redirect_url)
                    .into_response();
            }
            Err(error) => {
                tracing::error!("Could not load the edit password: {error}");
                return unlock_form(Some(INTERNAL_ERROR_MSG), redirect_url).into_response();
            }
        }
    };

    match verify_edit_password(&password_hash, &form.password) {
        Ok(()) => {}
        Err(Error::InvalidCredentials) => {
            tracing::info!("Rejected an unlock attempt with the wrong password");
            return unlock_form(Some(INCORRECT_PASSWORD_ERROR_MSG), redirect_url).into_response();
        }
        Err(error) => {
            tracing::error!("Could not verify the edit password: {error}");
            return unlock_form(Some(INTERNAL_ERROR_MSG), redirect_url).into_response();
        }
    }

    let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW);

    match set_edit_cookie(jar.clone(), state.edit_mode_duration) {
        Ok(jar) => {
            tracing::info!("Edit mode unlocked");
            (StatusCode::SEE_OTHER, HxRedirect(redirect_url.to_owned()), jar).into_response()
        }
        Err(error) => {
            tracing::error!("Error setting edit mode cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_edit_cookie(jar),
            )
                .into_response()
        }
    }
}

/// Check `raw_password` against the stored edit password.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if the password does not match, or
/// [Error::HashingError] if bcrypt could not read the stored hash.
fn verify_edit_password(password_hash: &PasswordHash, raw_password: &str) -> Result<(), Error> {
    let password_is_correct = password_hash
        .verify(raw_password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if password_is_correct {
        Ok(())
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Invalidate the edit-mode cookie and send the client to the dashboard.
pub async fn get_lock(jar: PrivateCookieJar) -> Response {
    tracing::info!("Edit mode locked");
    let jar = invalidate_edit_cookie(jar);

    (jar, Redirect::to(endpoints::DASHBOARD_VIEW)).into_response()
}

fn unlock_form(error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::UNLOCK_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#password, #submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (password_input("", error_message))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Unlock"
            }
        }
    }
}

#[cfg(test)]
mod unlock_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form, Router,
        extract::{Query, State},
        http::StatusCode,
        response::Response,
        routing::post,
    };
    use axum_extra::extract::PrivateCookieJar;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        Error,
        app_state::create_cookie_key,
        db::initialize,
        edit_mode::{
            DEFAULT_EDIT_MODE_DURATION, PasswordHash, ValidatedPassword, cookie::COOKIE_EDIT_TOKEN,
            is_edit_mode, set_edit_cookie, set_edit_password,
        },
        endpoints,
        test_utils::{
            assert_form_error_message, assert_hx_endpoint, assert_hx_redirect, assert_redirect,
            assert_valid_html, must_get_form, must_select, parse_html_document,
            parse_html_fragment,
        },
    };

    use super::{
        INCORRECT_PASSWORD_ERROR_MSG, PASSWORD_NOT_SET_ERROR_MSG, RedirectQuery, UnlockData,
        UnlockState, get_lock, get_unlock_page, post_unlock, verify_edit_password,
    };

    fn get_state(password: Option<&str>) -> UnlockState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        if let Some(password) = password {
            let hash = PasswordHash::new(ValidatedPassword::new_unchecked(password), 4).unwrap();
            set_edit_password(hash, &connection).unwrap();
        }

        UnlockState {
            cookie_key: create_cookie_key("foobar"),
            edit_mode_duration: DEFAULT_EDIT_MODE_DURATION,
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    async fn unlock(state: UnlockState, password: &str, redirect_url: Option<&str>) -> Response {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());
        let form = UnlockData {
            password: password.to_owned(),
            redirect_url: redirect_url.map(str::to_owned),
        };

        post_unlock(State(state), jar, Form(form)).await
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = PasswordHash::new(ValidatedPassword::new_unchecked("hunter2"), 4).unwrap();

        assert_eq!(verify_edit_password(&hash, "hunter2"), Ok(()));
        assert_eq!(
            verify_edit_password(&hash, "hunter3"),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn verify_reports_unreadable_hash() {
        let hash = PasswordHash::new_unchecked("not a bcrypt hash");

        let Err(Error::HashingError(_)) = verify_edit_password(&hash, "hunter2") else {
            panic!("want a hashing error for a malformed hash");
        };
    }

    #[tokio::test]
    async fn unlock_page_displays_form() {
        let response = get_unlock_page(Query(RedirectQuery {
            redirect_url: Some("/people/2".to_owned()),
        }))
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::UNLOCK_API, "hx-post");
        must_select(&html, "input[type=password][name=password]");
        let redirect_input = must_select(&html, "input[name=redirect_url]");
        assert_eq!(redirect_input.value().attr("value"), Some("/people/2"));
    }

    #[tokio::test]
    async fn unlock_succeeds_with_correct_password() {
        let response = unlock(get_state(Some("hunter2")), "hunter2", None).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        let set_cookie = response
            .headers()
            .get_all("set-cookie")
            .iter()
            .filter_map(|header| header.to_str().ok())
            .any(|header| header.starts_with(COOKIE_EDIT_TOKEN));
        assert!(set_cookie, "want the edit token cookie to be set");
    }

    #[tokio::test]
    async fn unlock_redirects_to_requested_page() {
        let response = unlock(get_state(Some("hunter2")), "hunter2", Some("/people/2")).await;

        assert_hx_redirect(&response, "/people/2");
    }

    #[tokio::test]
    async fn unlock_ignores_external_redirect() {
        let response = unlock(
            get_state(Some("hunter2")),
            "hunter2",
            Some("https://example.com"),
        )
        .await;

        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn unlock_fails_with_wrong_password() {
        let response = unlock(get_state(Some("hunter2")), "hunter3", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, INCORRECT_PASSWORD_ERROR_MSG);
    }

    #[tokio::test]
    async fn unlock_explains_missing_password() {
        let response = unlock(get_state(None), "anything", None).await;

        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, PASSWORD_NOT_SET_ERROR_MSG);
    }

    #[tokio::test]
    async fn unlock_form_rejects_missing_password_field() {
        let state = get_state(Some("hunter2"));
        let app = Router::new()
            .route(endpoints::UNLOCK_API, post(post_unlock))
            .with_state(state);
        let server = TestServer::try_new(app).expect("Could not create test server.");

        server
            .post(endpoints::UNLOCK_API)
            .content_type("application/x-www-form-urlencoded")
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn lock_invalidates_cookie_and_redirects() {
        let jar = set_edit_cookie(
            PrivateCookieJar::new(create_cookie_key("foobar")),
            DEFAULT_EDIT_MODE_DURATION,
        )
        .unwrap();
        assert!(is_edit_mode(&jar));

        let response = get_lock(jar).await;

        assert_redirect(&response, endpoints::DASHBOARD_VIEW);
        let cleared = response
            .headers()
            .get_all("set-cookie")
            .iter()
            .filter_map(|header| header.to_str().ok())
            .any(|header| header.starts_with(COOKIE_EDIT_TOKEN) && header.contains("Max-Age=0"));
        assert!(cleared, "want the edit token cookie to be cleared");
    }
}
