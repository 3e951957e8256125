//! Reading and writing the encrypted edit-mode cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, edit_mode::token::EditToken};

pub(crate) const COOKIE_EDIT_TOKEN: &str = "edit_token";
/// How long edit mode stays unlocked after the last request.
pub const DEFAULT_EDIT_MODE_DURATION: Duration = Duration::minutes(15);

/// Add the edit-mode cookie to `jar`, valid for `duration` from now.
///
/// # Errors
/// Returns [Error::CookieError] if the token cannot be serialized.
pub fn set_edit_cookie(jar: PrivateCookieJar, duration: Duration) -> Result<PrivateCookieJar, Error> {
    set_edit_cookie_expiry(jar, OffsetDateTime::now_utc() + duration)
}

fn set_edit_cookie_expiry(
    jar: PrivateCookieJar,
    expires_at: OffsetDateTime,
) -> Result<PrivateCookieJar, Error> {
    let token = EditToken { expires_at };
    let token_string = serde_json::to_string(&token).map_err(|error| {
        tracing::error!("Could not serialize edit token: {error}");
        Error::CookieError
    })?;

    Ok(jar.add(
        Cookie::build((COOKIE_EDIT_TOKEN, token_string))
            .expires(expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Overwrite the edit-mode cookie with an expired, invalid value so the
/// browser drops it.
pub fn invalidate_edit_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_EDIT_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the edit token from `jar`.
///
/// # Errors
/// Returns [Error::CookieError] if the cookie is missing, cannot be parsed,
/// or has expired.
pub fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<EditToken, Error> {
    let cookie = jar.get(COOKIE_EDIT_TOKEN).ok_or(Error::CookieError)?;
    let token: EditToken =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::CookieError)?;

    if token.is_valid_at(OffsetDateTime::now_utc()) {
        Ok(token)
    } else {
        Err(Error::CookieError)
    }
}

/// Push the cookie's expiry out to at least `duration` from now.
///
/// The jar is returned unchanged in the error case.
pub fn extend_edit_cookie(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;
    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(Error::CookieError)?;

    set_edit_cookie_expiry(jar, max(token.expires_at, new_expiry))
}

/// Whether `jar` holds a valid, unexpired edit-mode cookie.
pub fn is_edit_mode(jar: &PrivateCookieJar) -> bool {
    get_token_from_cookies(jar).is_ok()
}
