//! A person's page with their total debt and transaction history.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    edit_mode::is_edit_mode,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, avatar, base, edit_delete_action_links,
        format_amount, format_date,
    },
    internal_server_error::InternalServerError,
    navigation::NavBar,
    person::{Person, PersonId, get_person},
    timezone::local_today,
    transaction::{
        Transaction, TransactionFormDefaults, TransactionKind, get_transactions, kind_badge,
        transaction_form_fields,
    },
};

/// The state needed for a person's page.
#[derive(Debug, Clone)]
pub struct PersonPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Ho_Chi_Minh".
    pub local_timezone: String,
}

impl FromRef<AppState> for PersonPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render a person's total debt and their transactions, newest first.
///
/// In edit mode the page also has a form for adding a transaction and
/// edit/delete controls for each transaction.
pub async fn get_person_page(
    Path(person_id): Path<PersonId>,
    State(state): State<PersonPageState>,
    jar: PrivateCookieJar,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    // NotFound falls through to the 404 page.
    let person = get_person(person_id, &connection)
        .inspect_err(|error| tracing::debug!("Could not get person {person_id}: {error}"))?;

    let transactions = match get_transactions(Some(person_id), &connection) {
        Ok(transactions) => transactions,
        Err(error) => {
            tracing::error!("Failed to retrieve transactions for person {person_id}: {error}");
            return Ok(
                InternalServerError::load_failure("Failed to load transactions").into_response(),
            );
        }
    };

    Ok(person_view(&person, &transactions, is_edit_mode(&jar), today).into_response())
}

fn person_view(
    person: &Person,
    transactions: &[Transaction],
    edit_mode: bool,
    today: Date,
) -> Markup {
    let person_url = endpoints::format_endpoint(endpoints::PERSON_VIEW, person.id);
    let nav_bar = NavBar::new(&person_url, edit_mode).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full lg:max-w-5xl space-y-6"
            {
                header class="flex flex-wrap items-center justify-between gap-4"
                {
                    div class="flex items-center gap-3"
                    {
                        (avatar(&person.name))
                        h1 class="text-xl font-bold" { (person.name) }
                    }

                    @if edit_mode {
                        a
                            href=(endpoints::format_endpoint(endpoints::EDIT_PERSON_VIEW, person.id))
                            class=(LINK_STYLE)
                        {
                            "Rename"
                        }
                    }
                }

                section class=(CARD_STYLE)
                {
                    p class="text-sm text-gray-600 dark:text-gray-400" { "Total debt" }
                    p id="total-debt" class="text-3xl font-bold tabular-nums"
                    {
                        (format_amount(person.total_debt))
                    }
                }

                @if edit_mode {
                    (new_transaction_form(person.id, today))
                }

                (history_view(transactions, edit_mode))
            }
        }
    );

    base(person.name.as_ref(), &[], &content)
}

fn new_transaction_form(person_id: PersonId, today: Date) -> Markup {
    let fields = transaction_form_fields(&TransactionFormDefaults {
        kind: TransactionKind::Debt,
        amount: None,
        date: today,
        description: None,
        autofocus_amount: false,
    });

    html!(
        section class=(CARD_STYLE)
        {
            h2 class="text-lg font-semibold mb-4" { "Add Transaction" }

            form
                hx-post=(endpoints::format_endpoint(endpoints::POST_TRANSACTION, person_id))
                hx-target-error="#alert-container"
                class="space-y-4"
            {
                (fields)

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Transaction" }
            }
        }
    )
}

fn history_view(transactions: &[Transaction], edit_mode: bool) -> Markup {
    let column_count = if edit_mode { 5 } else { 4 };

    let table_row = |transaction: &Transaction| {
        html!(
            tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
            {
                td class=(TABLE_CELL_STYLE) { (format_date(transaction.date)) }
                td class=(TABLE_CELL_STYLE) { (kind_badge(transaction.kind)) }
                td class="px-6 py-4 text-right tabular-nums"
                {
                    (format_amount(transaction.amount))
                }
                td class=(TABLE_CELL_STYLE) { (transaction.description) }

                @if edit_mode {
                    td class=(TABLE_CELL_STYLE)
                    {
                        div class="flex gap-4"
                        {
                            (transaction_action_links(transaction, "closest tr", "delete"))
                        }
                    }
                }
            }
        )
    };

    html!(
        section class="space-y-4"
        {
            h2 class="text-lg font-semibold" { "History" }

            ul class="lg:hidden space-y-4"
            {
                @for transaction in transactions {
                    li class=(CARD_STYLE) data-transaction-card="true"
                    {
                        div class="flex items-start justify-between gap-3"
                        {
                            div class="space-y-1"
                            {
                                (kind_badge(transaction.kind))
                                p class="text-xs text-gray-500 dark:text-gray-400"
                                {
                                    (format_date(transaction.date))
                                }
                            }

                            span class="text-sm font-semibold tabular-nums"
                            {
                                (format_amount(transaction.amount))
                            }
                        }

                        @if !transaction.description.is_empty() {
                            p class="mt-2 text-sm text-gray-700 dark:text-gray-300"
                            {
                                (transaction.description)
                            }
                        }

                        @if edit_mode {
                            div class="mt-2 flex items-center gap-4 text-sm"
                            {
                                (transaction_action_links(
                                    transaction,
                                    "closest [data-transaction-card='true']",
                                    "outerHTML",
                                ))
                            }
                        }
                    }
                }

                @if transactions.is_empty() {
                    li class="rounded border border-dashed border-gray-300 px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:text-gray-400"
                    {
                        "No transactions yet."
                    }
                }
            }

            div class="hidden lg:block dark:bg-gray-800"
            {
                table class="w-full text-sm text-left rtl:text-right
                    text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class="px-6 py-4 text-right" { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }

                            @if edit_mode {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            (table_row(transaction))
                        }

                        @if transactions.is_empty() {
                            tr
                            {
                                td
                                    colspan=(column_count)
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "No transactions yet."
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn transaction_action_links(transaction: &Transaction, hx_target: &str, hx_swap: &str) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);
    let confirm_message = format!(
        "Are you sure you want to delete this {} of {}?",
        transaction.kind.label().to_lowercase(),
        format_amount(transaction.amount)
    );

    edit_delete_action_links(&edit_url, &delete_url, &confirm_message, hx_target, hx_swap)
}

#[cfg(test)]
mod person_page_tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use axum_extra::extract::PrivateCookieJar;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Error,
        app_state::create_cookie_key,
        edit_mode::{DEFAULT_EDIT_MODE_DURATION, set_edit_cookie},
        endpoints,
        person::{PersonName, create_person, get_person_page},
        test_utils::{
            assert_form_input, assert_form_radio_checked, assert_hx_endpoint, assert_status_ok,
            assert_valid_html, element_texts, get_test_connection, must_get_form, must_select,
            parse_html_document,
        },
        transaction::{NewTransaction, TransactionKind, create_transaction},
    };

    use super::PersonPageState;

    fn get_state() -> PersonPageState {
        PersonPageState {
            db_connection: get_test_connection(),
            local_timezone: "Asia/Ho_Chi_Minh".to_owned(),
        }
    }

    fn locked_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(create_cookie_key("foobar"))
    }

    #[tokio::test]
    async fn shows_total_and_history_newest_first() {
        let state = get_state();
        let ann = {
            let connection = state.db_connection.lock().unwrap();
            let ann = create_person(PersonName::new_unchecked("Ann"), &connection).unwrap();
            create_transaction(
                NewTransaction::new(ann.id, 80_000.0, TransactionKind::Debt, date!(2025 - 01 - 05))
                    .description("Lunch"),
                &connection,
            )
            .unwrap();
            create_transaction(
                NewTransaction::new(
                    ann.id,
                    30_000.0,
                    TransactionKind::Payment,
                    date!(2025 - 02 - 01),
                ),
                &connection,
            )
            .unwrap();
            ann
        };

        let response = get_person_page(Path(ann.id), State(state), locked_jar())
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let total = must_select(&html, "#total-debt")
            .text()
            .collect::<String>();
        assert_eq!(total.trim(), "50,000 ₫");
        assert_eq!(
            element_texts(&html, "tbody tr td:nth-child(1)"),
            ["01/02/2025", "05/01/2025"]
        );
        assert_eq!(
            element_texts(&html, "tbody tr td:nth-child(2)"),
            ["Payment", "Debt"]
        );
        assert_eq!(
            html.select(&Selector::parse("form").unwrap()).count(),
            0,
            "locked page should not have a form"
        );
    }

    #[tokio::test]
    async fn edit_mode_shows_add_transaction_form() {
        let state = get_state();
        let ann = create_person(
            PersonName::new_unchecked("Ann"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();
        let jar = set_edit_cookie(locked_jar(), DEFAULT_EDIT_MODE_DURATION).unwrap();

        let response = get_person_page(Path(ann.id), State(state), jar)
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::POST_TRANSACTION, ann.id),
            "hx-post",
        );
        assert_form_radio_checked(&form, "kind", "debt");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");
    }

    #[tokio::test]
    async fn missing_person_is_not_found() {
        let result = get_person_page(Path(42), State(get_state()), locked_jar()).await;

        let Err(error) = result else {
            panic!("want an error for a missing person");
        };
        assert_eq!(error, Error::NotFound);
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }
}
