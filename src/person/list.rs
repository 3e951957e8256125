//! People listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use time::UtcOffset;

use crate::{
    AppState, Error,
    edit_mode::is_edit_mode,
    endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        avatar, base, edit_delete_action_links, format_amount, format_timestamp,
    },
    internal_server_error::InternalServerError,
    navigation::NavBar,
    person::{Person, count_transactions_per_person, get_all_people},
    timezone::get_local_offset,
};

/// The state needed for the people listing page.
#[derive(Debug, Clone)]
pub struct PeoplePageState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Ho_Chi_Minh".
    pub local_timezone: String,
}

impl FromRef<AppState> for PeoplePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A person with the URLs and counts the page needs to render them.
#[derive(Debug, Clone)]
struct PersonRow {
    person: Person,
    view_url: String,
    edit_url: String,
    delete_url: String,
    transaction_count: u32,
}

impl PersonRow {
    fn confirm_message(&self) -> String {
        format!(
            "Are you sure you want to delete '{}'? This will also delete their {} transaction(s).",
            self.person.name, self.transaction_count
        )
    }
}

/// Render everyone in the ledger with their total debt.
///
/// Rename and delete controls are only shown in edit mode.
pub async fn get_people_page(
    State(state): State<PeoplePageState>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let people = match get_all_people(&connection) {
        Ok(people) => people,
        Err(error) => {
            tracing::error!("Failed to retrieve people: {error}");
            return Ok(InternalServerError::load_failure("Failed to load people").into_response());
        }
    };

    let transactions_per_person = count_transactions_per_person(&connection)
        .inspect_err(|error| tracing::error!("Could not count transactions per person: {error}"))?;

    let rows = people
        .into_iter()
        .map(|person| PersonRow {
            view_url: endpoints::format_endpoint(endpoints::PERSON_VIEW, person.id),
            edit_url: endpoints::format_endpoint(endpoints::EDIT_PERSON_VIEW, person.id),
            delete_url: endpoints::format_endpoint(endpoints::DELETE_PERSON, person.id),
            transaction_count: transactions_per_person
                .get(&person.id)
                .copied()
                .unwrap_or(0),
            person,
        })
        .collect::<Vec<_>>();

    Ok(people_view(&rows, is_edit_mode(&jar), local_offset).into_response())
}

fn people_view(rows: &[PersonRow], edit_mode: bool, local_offset: UtcOffset) -> Markup {
    let nav_bar = NavBar::new(endpoints::PEOPLE_VIEW, edit_mode).into_html();

    let table_row = |row: &PersonRow| {
        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    a href=(row.view_url) class="flex items-center gap-3"
                    {
                        (avatar(&row.person.name))
                        span class="font-medium text-gray-900 dark:text-white"
                        {
                            (row.person.name)
                        }
                    }
                }

                td class="px-6 py-4 text-right tabular-nums"
                {
                    (format_amount(row.person.total_debt))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (format_timestamp(row.person.last_updated, local_offset))
                }

                @if edit_mode {
                    td class=(TABLE_CELL_STYLE)
                    {
                        div class="flex gap-4"
                        {
                            (edit_delete_action_links(
                                &row.edit_url,
                                &row.delete_url,
                                &row.confirm_message(),
                                "closest tr",
                                "delete",
                            ))
                        }
                    }
                }
            }
        )
    };

    let column_count = if edit_mode { 4 } else { 3 };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "People" }

                    @if edit_mode {
                        a href=(endpoints::NEW_PERSON_VIEW) class=(LINK_STYLE)
                        {
                            "Add Person"
                        }
                    }
                }

                (people_cards_view(rows, edit_mode))

                section class="hidden lg:block dark:bg-gray-800 lg:w-full lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class="px-6 py-4 text-right" { "Total Debt" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Last Updated" }

                                @if edit_mode {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                                }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan=(column_count)
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        (empty_message(edit_mode))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("People", &[], &content)
}

fn people_cards_view(rows: &[PersonRow], edit_mode: bool) -> Markup {
    html!(
        ul class="lg:hidden space-y-4"
        {
            @for row in rows {
                li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                    data-person-card="true"
                {
                    div class="flex items-center justify-between gap-3"
                    {
                        a href=(row.view_url) class="flex items-center gap-3 min-w-0"
                        {
                            (avatar(&row.person.name))
                            span class="truncate font-medium" { (row.person.name) }
                        }

                        span class="text-sm tabular-nums text-gray-900 dark:text-white"
                        {
                            (format_amount(row.person.total_debt))
                        }
                    }

                    @if edit_mode {
                        div class="mt-2 flex items-center gap-4 text-sm"
                        {
                            (edit_delete_action_links(
                                &row.edit_url,
                                &row.delete_url,
                                &row.confirm_message(),
                                "closest [data-person-card='true']",
                                "delete",
                            ))
                        }
                    }
                }
            }

            @if rows.is_empty() {
                li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                {
                    (empty_message(edit_mode))
                }
            }
        }
    )
}

fn empty_message(edit_mode: bool) -> Markup {
    html!(
        "No one in the ledger yet. "

        @if edit_mode {
            a href=(endpoints::NEW_PERSON_VIEW) class=(LINK_STYLE)
            {
                "Add the first person"
            }
        } @else {
            a href=(endpoints::UNLOCK_VIEW) class=(LINK_STYLE)
            {
                "Unlock editing to add someone"
            }
        }
    )
}

#[cfg(test)]
mod people_page_tests {
    use axum::extract::State;
    use axum_extra::extract::PrivateCookieJar;
    use scraper::Selector;

    use crate::{
        app_state::create_cookie_key,
        edit_mode::{DEFAULT_EDIT_MODE_DURATION, set_edit_cookie},
        endpoints,
        person::{PersonName, create_person, get_people_page},
        test_utils::{
            assert_content_type, assert_status_ok, assert_valid_html, element_texts,
            get_test_connection, parse_html_document,
        },
        transaction::{NewTransaction, TransactionKind, create_transaction},
    };

    use super::PeoplePageState;

    fn get_state() -> PeoplePageState {
        PeoplePageState {
            db_connection: get_test_connection(),
            local_timezone: "Asia/Ho_Chi_Minh".to_owned(),
        }
    }

    fn locked_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(create_cookie_key("foobar"))
    }

    fn unlocked_jar() -> PrivateCookieJar {
        set_edit_cookie(locked_jar(), DEFAULT_EDIT_MODE_DURATION).unwrap()
    }

    #[tokio::test]
    async fn lists_people_by_name_with_totals() {
        let state = get_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let bao = create_person(PersonName::new_unchecked("Bao"), &connection).unwrap();
            create_person(PersonName::new_unchecked("Ann"), &connection).unwrap();
            create_transaction(
                NewTransaction::new(
                    bao.id,
                    120_000.0,
                    TransactionKind::Debt,
                    time::macros::date!(2025 - 01 - 10),
                ),
                &connection,
            )
            .unwrap();
        }

        let response = get_people_page(State(state), locked_jar()).await.unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            element_texts(&html, "tbody tr td:first-child span.font-medium"),
            ["Ann", "Bao"]
        );
        assert_eq!(
            element_texts(&html, "tbody tr td:nth-child(2)"),
            ["0 ₫", "120,000 ₫"]
        );
    }

    #[tokio::test]
    async fn locked_page_hides_edit_controls() {
        let state = get_state();
        create_person(
            PersonName::new_unchecked("Ann"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_people_page(State(state), locked_jar()).await.unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let delete_buttons = html
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .count();
        assert_eq!(delete_buttons, 0);
        let new_person_links = html
            .select(&Selector::parse(&format!("a[href='{}']", endpoints::NEW_PERSON_VIEW)).unwrap())
            .count();
        assert_eq!(new_person_links, 0);
    }

    #[tokio::test]
    async fn edit_mode_shows_delete_with_transaction_count() {
        let state = get_state();
        let ann = {
            let connection = state.db_connection.lock().unwrap();
            let ann = create_person(PersonName::new_unchecked("Ann"), &connection).unwrap();
            create_transaction(
                NewTransaction::new(
                    ann.id,
                    50_000.0,
                    TransactionKind::Debt,
                    time::macros::date!(2025 - 01 - 10),
                ),
                &connection,
            )
            .unwrap();
            ann
        };

        let response = get_people_page(State(state), unlocked_jar()).await.unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_PERSON, ann.id);
        let button = html
            .select(&Selector::parse("tbody button[hx-delete]").unwrap())
            .next()
            .expect("No delete button found");
        assert_eq!(button.value().attr("hx-delete"), Some(delete_url.as_str()));
        let confirm_message = button.value().attr("hx-confirm").unwrap_or_default();
        assert!(
            confirm_message.contains("1 transaction(s)"),
            "want confirmation to mention the transaction count, got {confirm_message:?}"
        );

        let swaps: Vec<_> = html
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .map(|button| button.value().attr("hx-swap"))
            .collect();
        assert_eq!(swaps, [Some("delete"), Some("delete")]);
    }

    #[tokio::test]
    async fn shows_empty_state() {
        let response = get_people_page(State(get_state()), locked_jar())
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let text = element_texts(&html, "tbody td").join(" ");
        assert!(
            text.contains("No one in the ledger yet."),
            "want empty state message, got {text:?}"
        );
    }
}
