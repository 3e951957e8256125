//! The overview, leaderboard and recent activity cards.

use maud::{Markup, html};

use crate::{
    dashboard::summary::{
        RecentActivity, average_debt, count_people_with_debt, max_debt, total_debt,
    },
    endpoints,
    html::{CARD_STYLE, LINK_STYLE, format_amount, format_date},
    person::Person,
    transaction::{TransactionKind, kind_badge},
};

fn stat(label: &str, value: &str, id: &str, highlight: bool) -> Markup {
    let value_style = if highlight {
        "text-2xl font-bold text-red-600 dark:text-red-400"
    } else {
        "text-2xl font-bold"
    };

    html! {
        div class="space-y-1"
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p id=(id) class=(value_style) { (value) }
        }
    }
}

/// Total, number of people with debt, average and highest debt.
pub(super) fn overview_card(people: &[Person]) -> Markup {
    html! {
        section class=(CARD_STYLE) aria-labelledby="overview-heading"
        {
            h2 id="overview-heading" class="text-lg font-semibold mb-4" { "Overview" }

            div class="grid grid-cols-2 gap-4"
            {
                (stat("Total Debt", &format_amount(total_debt(people)), "total-debt", true))
                (stat(
                    "People with Debt",
                    &count_people_with_debt(people).to_string(),
                    "people-with-debt",
                    false,
                ))
                (stat("Average Debt", &format_amount(average_debt(people)), "average-debt", false))
                (stat("Highest Debt", &format_amount(max_debt(people)), "highest-debt", true))
            }
        }
    }
}

/// Everyone ranked by how much they owe.
pub(super) fn leaderboard_card(ranked: &[&Person]) -> Markup {
    html! {
        section class=(CARD_STYLE) aria-labelledby="leaderboard-heading"
        {
            h2 id="leaderboard-heading" class="text-lg font-semibold mb-4" { "Leaderboard" }

            ol id="leaderboard" class="space-y-3 max-h-64 overflow-y-auto pr-2"
            {
                @for (rank, person) in ranked.iter().enumerate() {
                    li class="flex items-center justify-between"
                    {
                        div class="flex items-center gap-3 min-w-0"
                        {
                            span class="text-sm font-medium text-gray-500" { "#" (rank + 1) }
                            a
                                href=(endpoints::format_endpoint(endpoints::PERSON_VIEW, person.id))
                                class=(LINK_STYLE)
                            {
                                (person.name)
                            }
                        }

                        span class="text-sm font-semibold text-red-600 dark:text-red-400"
                        {
                            (format_amount(person.total_debt))
                        }
                    }
                }
            }
        }
    }
}

/// The latest debts and payments across everyone.
pub(super) fn recent_activity_card(recent: &[RecentActivity<'_>]) -> Markup {
    html! {
        section class=(CARD_STYLE) aria-labelledby="recent-heading"
        {
            h2 id="recent-heading" class="text-lg font-semibold mb-4" { "Recent" }

            @if recent.is_empty() {
                p class="text-center text-gray-500 py-4" { "No recent transactions" }
            } @else {
                ul id="recent-activity" class="space-y-3"
                {
                    @for entry in recent {
                        @let amount_style = match entry.transaction.kind {
                            TransactionKind::Debt => "font-semibold text-red-600 dark:text-red-400",
                            TransactionKind::Payment => "font-semibold text-green-600 dark:text-green-400",
                        };

                        li class="flex items-center justify-between"
                        {
                            div
                            {
                                div class="font-medium" { (entry.person_name) }
                                div class="text-xs text-gray-500" { (format_date(entry.transaction.date)) }
                            }

                            div class="text-right"
                            {
                                div class=(amount_style) { (format_amount(entry.transaction.amount)) }
                                (kind_badge(entry.transaction.kind))
                            }
                        }
                    }
                }
            }
        }
    }
}
