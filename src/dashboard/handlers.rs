//! The dashboard page handler.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dashboard::{
        cards::{leaderboard_card, overview_card, recent_activity_card},
        charts::{DashboardChart, charts_script, charts_view, debt_by_person_chart},
        summary::{leaderboard, recent_activity},
    },
    edit_mode::is_edit_mode,
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    person::{Person, get_all_people},
    transaction::{Transaction, get_transactions},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading people and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a page with an overview of who owes what.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, is_edit_mode(&jar));

    let people = get_all_people(&connection)
        .inspect_err(|error| tracing::error!("Failed to load people: {error}"))?;

    if people.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let transactions = get_transactions(None, &connection)
        .inspect_err(|error| tracing::error!("Failed to load transactions: {error}"))?;

    Ok(dashboard_view(nav_bar, &people, &transactions).into_response())
}

fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_person_link = link(endpoints::NEW_PERSON_VIEW, "add someone");

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p
            {
                "The overview will show up here once you " (new_person_link)
                " to the ledger."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(nav_bar: NavBar, people: &[Person], transactions: &[Transaction]) -> Markup {
    let nav_bar = nav_bar.into_html();
    let ranked = leaderboard(people);
    let recent = recent_activity(people, transactions);
    let charts = [DashboardChart {
        id: "debt-per-person-chart",
        options: debt_by_person_chart(&ranked).to_string(),
    }];

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            div class="grid w-full grid-cols-1 xl:grid-cols-3 gap-4 mb-4"
            {
                (overview_card(people))
                (leaderboard_card(&ranked))
                (recent_activity_card(&recent))
            }

            (charts_view(&charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod dashboard_tests {
    use axum::extract::State;
    use axum_extra::extract::PrivateCookieJar;
    use time::macros::date;

    use crate::{
        app_state::create_cookie_key,
        endpoints,
        person::{PersonName, create_person},
        test_utils::{
            assert_status_ok, assert_valid_html, element_texts, get_test_connection, must_select,
            parse_html_document,
        },
        transaction::{NewTransaction, TransactionKind, create_transaction},
    };

    use super::{DashboardState, get_dashboard_page};

    fn locked_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(create_cookie_key("foobar"))
    }

    #[tokio::test]
    async fn empty_ledger_shows_no_data_message() {
        let state = DashboardState {
            db_connection: get_test_connection(),
        };

        let response = get_dashboard_page(State(state), locked_jar())
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(element_texts(&html, "h2"), ["Nothing here yet..."]);
        let link = must_select(&html, "p a");
        assert_eq!(link.value().attr("href"), Some(endpoints::NEW_PERSON_VIEW));
    }

    #[tokio::test]
    async fn shows_totals_leaderboard_and_recent_activity() {
        let state = DashboardState {
            db_connection: get_test_connection(),
        };
        {
            let connection = state.db_connection.lock().unwrap();
            let ann = create_person(PersonName::new_unchecked("Ann"), &connection).unwrap();
            let bao = create_person(PersonName::new_unchecked("Bao"), &connection).unwrap();
            create_transaction(
                NewTransaction::new(ann.id, 50_000.0, TransactionKind::Debt, date!(2025 - 03 - 01)),
                &connection,
            )
            .unwrap();
            create_transaction(
                NewTransaction::new(bao.id, 120_000.0, TransactionKind::Debt, date!(2025 - 03 - 02)),
                &connection,
            )
            .unwrap();
        }

        let response = get_dashboard_page(State(state), locked_jar())
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(element_texts(&html, "#total-debt"), ["170,000 ₫"]);
        assert_eq!(element_texts(&html, "#average-debt"), ["85,000 ₫"]);
        assert_eq!(element_texts(&html, "#highest-debt"), ["120,000 ₫"]);
        assert_eq!(element_texts(&html, "#leaderboard a"), ["Bao", "Ann"]);
        assert_eq!(
            element_texts(&html, "#recent-activity div.font-medium"),
            ["Bao", "Ann"]
        );
        must_select(&html, "#debt-per-person-chart");
    }
}
