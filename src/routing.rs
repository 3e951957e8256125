//! Application router configuration with locked and edit-mode route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    api::{
        create_person_json, create_transaction_json, delete_person_json, delete_transaction_json,
        list_people, list_transactions, people_ranking, rename_person_json,
        update_transaction_json,
    },
    dashboard::get_dashboard_page,
    edit_mode::{edit_mode_guard, edit_mode_guard_hx, get_lock, get_unlock_page, post_unlock},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    person::{
        create_person_endpoint, delete_person_endpoint, get_edit_person_page,
        get_new_person_page, get_people_page, get_person_page, rename_person_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_edit_transaction_page,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Anyone can read the ledger. Pages and requests that change it need edit
/// mode to be unlocked.
pub fn build_router(state: AppState) -> Router {
    let read_only_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::PEOPLE_VIEW, get(get_people_page))
        .route(endpoints::PERSON_VIEW, get(get_person_page))
        .route(endpoints::UNLOCK_VIEW, get(get_unlock_page))
        .route(endpoints::UNLOCK_API, post(post_unlock))
        .route(endpoints::LOCK_API, get(get_lock))
        .route(endpoints::JSON_PEOPLE, get(list_people))
        .route(endpoints::JSON_PEOPLE_RANKING, get(people_ranking))
        .route(endpoints::JSON_TRANSACTIONS, get(list_transactions))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let edit_routes = Router::new()
        .route(endpoints::NEW_PERSON_VIEW, get(get_new_person_page))
        .route(endpoints::EDIT_PERSON_VIEW, get(get_edit_person_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::JSON_PEOPLE, post(create_person_json))
        .route(
            endpoints::JSON_PERSON,
            put(rename_person_json).delete(delete_person_json),
        )
        .route(endpoints::JSON_TRANSACTIONS, post(create_transaction_json))
        .route(
            endpoints::JSON_TRANSACTION,
            put(update_transaction_json).delete(delete_transaction_json),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            edit_mode_guard,
        ));

    // These routes are called by htmx, so redirects to the unlock page must use the HX-Redirect header.
    let edit_routes = edit_routes.merge(
        Router::new()
            .route(endpoints::POST_PERSON, post(create_person_endpoint))
            .route(endpoints::PUT_PERSON, put(rename_person_endpoint))
            .route(endpoints::DELETE_PERSON, delete(delete_person_endpoint))
            .route(
                endpoints::POST_TRANSACTION,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::PUT_TRANSACTION,
                put(update_transaction_endpoint),
            )
            .route(
                endpoints::DELETE_TRANSACTION,
                delete(delete_transaction_endpoint),
            )
            .layer(middleware::from_fn_with_state(
                state.clone(),
                edit_mode_guard_hx,
            )),
    );

    edit_routes
        .merge(read_only_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
