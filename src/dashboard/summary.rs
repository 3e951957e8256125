//! Figures derived from the people and transactions for the dashboard.

use std::collections::HashMap;

use crate::{
    person::{Person, PersonId},
    transaction::Transaction,
};

/// How many transactions the recent activity list shows.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// The name shown for a transaction whose person no longer exists.
pub const UNKNOWN_PERSON_NAME: &str = "Unknown";

/// The sum of everyone's total debt.
pub fn total_debt(people: &[Person]) -> f64 {
    people.iter().map(|person| person.total_debt).sum()
}

/// The number of people who still owe something.
pub fn count_people_with_debt(people: &[Person]) -> usize {
    people.iter().filter(|person| person.total_debt > 0.0).count()
}

/// The mean total debt over everyone in the ledger, or zero if it is empty.
pub fn average_debt(people: &[Person]) -> f64 {
    if people.is_empty() {
        return 0.0;
    }

    total_debt(people) / people.len() as f64
}

/// The largest total debt, or zero if the ledger is empty.
pub fn max_debt(people: &[Person]) -> f64 {
    people
        .iter()
        .map(|person| person.total_debt)
        .reduce(f64::max)
        .unwrap_or(0.0)
}

/// People ordered from the largest total debt to the smallest.
///
/// People with equal totals keep their order in `people`.
pub fn leaderboard(people: &[Person]) -> Vec<&Person> {
    let mut ranked: Vec<&Person> = people.iter().collect();
    ranked.sort_by(|a, b| b.total_debt.total_cmp(&a.total_debt));
    ranked
}

/// A transaction with the name of the person it belongs to.
#[derive(Debug, PartialEq)]
pub struct RecentActivity<'a> {
    pub transaction: &'a Transaction,
    pub person_name: &'a str,
}

/// The newest transactions across all people, at most [RECENT_ACTIVITY_LIMIT].
pub fn recent_activity<'a>(
    people: &'a [Person],
    transactions: &'a [Transaction],
) -> Vec<RecentActivity<'a>> {
    let names: HashMap<PersonId, &str> = people
        .iter()
        .map(|person| (person.id, person.name.as_ref()))
        .collect();

    let mut newest_first: Vec<&Transaction> = transactions.iter().collect();
    newest_first.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

    newest_first
        .into_iter()
        .take(RECENT_ACTIVITY_LIMIT)
        .map(|transaction| RecentActivity {
            transaction,
            person_name: names
                .get(&transaction.person_id)
                .copied()
                .unwrap_or(UNKNOWN_PERSON_NAME),
        })
        .collect()
}
