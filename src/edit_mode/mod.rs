//! Edit mode gates every change to the ledger behind a password.
//!
//! Unlocking stores an expiry token in an encrypted cookie. Pages check the
//! cookie to decide whether to show edit controls, and the guards in
//! [middleware] reject changes without it.

mod cookie;
mod credential;
mod middleware;
mod password;
mod redirect;
mod token;
mod unlock;

pub use cookie::{
    DEFAULT_EDIT_MODE_DURATION, invalidate_edit_cookie, is_edit_mode, set_edit_cookie,
};
pub use credential::{create_edit_password_table, get_edit_password, set_edit_password};
pub use middleware::{edit_mode_guard, edit_mode_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use unlock::{get_lock, get_unlock_page, post_unlock};

#[cfg(test)]
pub(crate) use cookie::COOKIE_EDIT_TOKEN;
