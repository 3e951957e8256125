//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/people/{person_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The overview page with totals, the leaderboard and recent activity.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page listing everyone in the ledger.
pub const PEOPLE_VIEW: &str = "/people";
/// The page for adding a person.
pub const NEW_PERSON_VIEW: &str = "/people/new";
/// The page showing one person's total and transaction history.
pub const PERSON_VIEW: &str = "/people/{person_id}";
/// The page for renaming a person.
pub const EDIT_PERSON_VIEW: &str = "/people/{person_id}/edit";
/// The page for editing a transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page for unlocking edit mode.
pub const UNLOCK_VIEW: &str = "/unlock";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for unlocking edit mode.
pub const UNLOCK_API: &str = "/api/unlock";
/// The route for locking edit mode again.
pub const LOCK_API: &str = "/api/lock";
/// The route to create a person.
pub const POST_PERSON: &str = "/api/people";
/// The route to rename a person.
pub const PUT_PERSON: &str = "/api/people/{person_id}";
/// The route to delete a person.
pub const DELETE_PERSON: &str = "/api/people/{person_id}";
/// The route to create a transaction for a person.
pub const POST_TRANSACTION: &str = "/api/people/{person_id}/transactions";
/// The route to update a transaction.
pub const PUT_TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// The JSON route for listing and creating people.
pub const JSON_PEOPLE: &str = "/api/v1/people";
/// The JSON route for renaming and deleting a person.
pub const JSON_PERSON: &str = "/api/v1/people/{person_id}";
/// The JSON route for the people ranked by total debt.
pub const JSON_PEOPLE_RANKING: &str = "/api/v1/people/ranking";
/// The JSON route for listing and creating transactions.
pub const JSON_TRANSACTIONS: &str = "/api/v1/transactions";
/// The JSON route for updating and deleting a transaction.
pub const JSON_TRANSACTION: &str = "/api/v1/transactions/{transaction_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
