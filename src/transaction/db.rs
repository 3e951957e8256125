//! Database operations for transactions.
//!
//! Every write also recomputes the owning person's total debt inside the same
//! SQLite transaction, so the stored total always matches the transaction rows.

use rusqlite::{Connection, Row, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    person::PersonId,
    transaction::{
        NewTransaction, Transaction, TransactionId, TransactionKind, TransactionUpdate,
        validate_amount,
    },
};

const TRANSACTION_COLUMNS: &str =
    "id, person_id, amount, kind, description, date, created_at, updated_at";

/// Create a transaction and update the person's total debt.
///
/// # Errors
/// Returns:
/// - [Error::InvalidAmount] if the amount is negative, NaN or infinite.
/// - [Error::InvalidPerson] if `new_transaction.person_id` does not refer to a person.
/// - [Error::SqlError] if there was some other SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let amount = validate_amount(new_transaction.amount)?;
    let now = OffsetDateTime::now_utc();

    let sql_transaction = connection.unchecked_transaction()?;

    let transaction = sql_transaction
        .prepare(&format!(
            "INSERT INTO debt_transaction (person_id, amount, kind, description, date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                new_transaction.person_id,
                amount,
                new_transaction.kind.as_str(),
                &new_transaction.description,
                new_transaction.date,
                now,
            ),
            map_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidPerson(new_transaction.person_id),
            error => error.into(),
        })?;

    recompute_total_debt(transaction.person_id, &sql_transaction)?;
    sql_transaction.commit()?;

    Ok(transaction)
}

/// Retrieve a transaction by its ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no transaction with `id`.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM debt_transaction WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve transactions newest first, either for everyone or only for `person_id`.
///
/// Transactions on the same date are ordered by ID, so the most recently
/// added comes first.
pub fn get_transactions(
    person_id: Option<PersonId>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM debt_transaction
             WHERE ?1 IS NULL OR person_id = ?1
             ORDER BY date DESC, id DESC"
        ))?
        .query_map([person_id], map_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Change some fields of a transaction and update the person's total debt.
///
/// Returns the transaction as it is after the update.
///
/// # Errors
/// Returns:
/// - [Error::InvalidAmount] if the new amount is negative, NaN or infinite.
/// - [Error::UpdateMissingTransaction] if there is no transaction with `id`.
pub fn update_transaction(
    id: TransactionId,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if let Some(amount) = update.amount {
        validate_amount(amount)?;
    }

    let sql_transaction = connection.unchecked_transaction()?;

    let current = match get_transaction(id, &sql_transaction) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };

    let updated = Transaction {
        amount: update.amount.unwrap_or(current.amount),
        kind: update.kind.unwrap_or(current.kind),
        description: update.description.unwrap_or(current.description),
        date: update.date.unwrap_or(current.date),
        updated_at: OffsetDateTime::now_utc(),
        ..current
    };

    sql_transaction.execute(
        "UPDATE debt_transaction
         SET amount = ?1, kind = ?2, description = ?3, date = ?4, updated_at = ?5
         WHERE id = ?6",
        (
            updated.amount,
            updated.kind.as_str(),
            &updated.description,
            updated.date,
            updated.updated_at,
            id,
        ),
    )?;

    recompute_total_debt(updated.person_id, &sql_transaction)?;
    sql_transaction.commit()?;

    get_transaction(id, connection)
}

/// Delete a transaction and update the person's total debt.
///
/// Returns the deleted transaction.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if there is no transaction with `id`.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let transaction = match get_transaction(id, &sql_transaction) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::DeleteMissingTransaction),
        Err(error) => return Err(error),
    };

    sql_transaction.execute("DELETE FROM debt_transaction WHERE id = ?1", [id])?;

    recompute_total_debt(transaction.person_id, &sql_transaction)?;
    sql_transaction.commit()?;

    Ok(transaction)
}

/// Set a person's stored total debt to the signed sum of their transactions
/// and mark it as updated now.
///
/// # Errors
/// Returns [Error::NotFound] if there is no person with `person_id`.
pub fn recompute_total_debt(person_id: PersonId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE person
         SET total_debt = COALESCE(
                (SELECT SUM(CASE kind WHEN 'debt' THEN amount ELSE -amount END)
                 FROM debt_transaction
                 WHERE person_id = ?1),
                0),
             last_updated = ?2,
             updated_at = ?2
         WHERE id = ?1",
        (person_id, OffsetDateTime::now_utc()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Initialize the transaction table and indexes.
///
/// The person table must exist first.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS debt_transaction (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            person_id INTEGER NOT NULL REFERENCES person(id) ON DELETE CASCADE,
            amount REAL NOT NULL CHECK (amount >= 0),
            kind TEXT NOT NULL CHECK (kind IN ('debt', 'payment')),
            description TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_debt_transaction_person_date
            ON debt_transaction(person_id, date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_kind: String = row.get(3)?;
    let kind = raw_kind
        .parse::<TransactionKind>()
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error)))?;

    Ok(Transaction {
        id: row.get(0)?,
        person_id: row.get(1)?,
        amount: row.get(2)?,
        kind,
        description: row.get(4)?,
        date: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

#[cfg(test)]
mod transaction_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        person::{Person, PersonName, create_person, get_person},
        test_utils::get_test_db_connection,
        transaction::{
            NewTransaction, TransactionKind, TransactionUpdate, create_transaction,
            delete_transaction, get_transaction, get_transactions, update_transaction,
        },
    };

    use super::recompute_total_debt;

    fn create_test_person(name: &str, connection: &Connection) -> Person {
        create_person(PersonName::new_unchecked(name), connection).unwrap()
    }

    fn total_debt(person: &Person, connection: &Connection) -> f64 {
        get_person(person.id, connection).unwrap().total_debt
    }

    #[test]
    fn create_debt_increases_total() {
        let connection = get_test_db_connection();
        let ann = create_test_person("Ann", &connection);

        let transaction = create_transaction(
            NewTransaction::new(ann.id, 50_000.0, TransactionKind::Debt, date!(2025 - 01 - 01))
                .description("Coffee"),
            &connection,
        )
        .expect("Could not create transaction");

        assert_eq!(transaction.person_id, ann.id);
        assert_eq!(transaction.amount, 50_000.0);
        assert_eq!(transaction.kind, TransactionKind::Debt);
        assert_eq!(transaction.description, "Coffee");
        assert_eq!(transaction.date, date!(2025 - 01 - 01));
        assert_eq!(total_debt(&ann, &connection), 50_000.0);
    }

    #[test]
    fn create_payment_decreases_total() {
        let connection = get_test_db_connection();
        let ann = create_test_person("Ann", &connection);
        create_transaction(
            NewTransaction::new(ann.id, 50_000.0, TransactionKind::Debt, date!(2025 - 01 - 01)),
            &connection,
        )
        .unwrap();

        create_transaction(
            NewTransaction::new(
                ann.id,
                20_000.0,
                TransactionKind::Payment,
                date!(2025 - 01 - 02),
            ),
            &connection,
        )
        .unwrap();

        assert_eq!(total_debt(&ann, &connection), 30_000.0);
    }

    #[test]
    fn create_bumps_last_updated() {
        let connection = get_test_db_connection();
        let ann = create_test_person("Ann", &connection);

        create_transaction(
            NewTransaction::new(ann.id, 1.0, TransactionKind::Debt, date!(2025 - 01 - 01)),
            &connection,
        )
        .unwrap();

        let updated = get_person(ann.id, &connection).unwrap();
        assert!(updated.last_updated >= ann.last_updated);
        assert_eq!(updated.created_at, ann.created_at);
    }

    #[test]
    fn create_fails_on_invalid_person() {
        let connection = get_test_db_connection();

        let result = create_transaction(
            NewTransaction::new(42, 1.0, TransactionKind::Debt, date!(2025 - 01 - 01)),
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidPerson(42)));
        assert_eq!(get_transactions(None, &connection), Ok(vec![]));
    }

    #[test]
    fn create_fails_on_negative_amount() {
        let connection = get_test_db_connection();
        let ann = create_test_person("Ann", &connection);

        let result = create_transaction(
            NewTransaction::new(ann.id, -5.0, TransactionKind::Debt, date!(2025 - 01 - 01)),
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidAmount(-5.0)));
        assert_eq!(total_debt(&ann, &connection), 0.0);
    }

    #[test]
    fn get_transaction_with_invalid_id_returns_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(get_transaction(1, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_transactions_filters_and_sorts_newest_first() {
        let connection = get_test_db_connection();
        let ann = create_test_person("Ann", &connection);
        let bao = create_test_person("Bao", &connection);
        let old = create_transaction(
            NewTransaction::new(ann.id, 1.0, TransactionKind::Debt, date!(2025 - 01 - 01)),
            &connection,
        )
        .unwrap();
        let new = create_transaction(
            NewTransaction::new(ann.id, 2.0, TransactionKind::Debt, date!(2025 - 03 - 01)),
            &connection,
        )
        .unwrap();
        let same_day = create_transaction(
            NewTransaction::new(ann.id, 3.0, TransactionKind::Payment, date!(2025 - 03 - 01)),
            &connection,
        )
        .unwrap();
        let baos = create_transaction(
            NewTransaction::new(bao.id, 4.0, TransactionKind::Debt, date!(2025 - 02 - 01)),
            &connection,
        )
        .unwrap();

        let anns = get_transactions(Some(ann.id), &connection).unwrap();
        let everyone = get_transactions(None, &connection).unwrap();

        let ids = |transactions: &[crate::transaction::Transaction]| {
            transactions.iter().map(|t| t.id).collect::<Vec<_>>()
        };
        assert_eq!(ids(&anns), [same_day.id, new.id, old.id]);
        assert_eq!(ids(&everyone), [same_day.id, new.id, baos.id, old.id]);
    }

    #[test]
    fn update_transaction_recomputes_total() {
        let connection = get_test_db_connection();
        let ann = create_test_person("Ann", &connection);
        let transaction = create_transaction(
            NewTransaction::new(ann.id, 50_000.0, TransactionKind::Debt, date!(2025 - 01 - 01)),
            &connection,
        )
        .unwrap();

        let updated = update_transaction(
            transaction.id,
            TransactionUpdate {
                amount: Some(20_000.0),
                kind: Some(TransactionKind::Payment),
                ..Default::default()
            },
            &connection,
        )
        .expect("Could not update transaction");

        assert_eq!(updated.amount, 20_000.0);
        assert_eq!(updated.kind, TransactionKind::Payment);
        assert_eq!(updated.date, transaction.date);
        assert_eq!(updated.description, transaction.description);
        assert_eq!(total_debt(&ann, &connection), -20_000.0);
    }

    #[test]
    fn update_transaction_keeps_unset_fields() {
        let connection = get_test_db_connection();
        let ann = create_test_person("Ann", &connection);
        let transaction = create_transaction(
            NewTransaction::new(ann.id, 10.0, TransactionKind::Debt, date!(2025 - 01 - 01))
                .description("Taxi"),
            &connection,
        )
        .unwrap();

        let updated = update_transaction(
            transaction.id,
            TransactionUpdate {
                date: Some(date!(2025 - 01 - 15)),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();

        assert_eq!(updated.date, date!(2025 - 01 - 15));
        assert_eq!(updated.amount, 10.0);
        assert_eq!(updated.description, "Taxi");
        assert_eq!(updated.created_at, transaction.created_at);
    }

    #[test]
    fn update_missing_transaction_fails() {
        let connection = get_test_db_connection();

        let result = update_transaction(42, TransactionUpdate::default(), &connection);

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn update_with_invalid_amount_changes_nothing() {
        let connection = get_test_db_connection();
        let ann = create_test_person("Ann", &connection);
        let transaction = create_transaction(
            NewTransaction::new(ann.id, 10.0, TransactionKind::Debt, date!(2025 - 01 - 01)),
            &connection,
        )
        .unwrap();

        let result = update_transaction(
            transaction.id,
            TransactionUpdate {
                amount: Some(f64::INFINITY),
                ..Default::default()
            },
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidAmount(f64::INFINITY)));
        assert_eq!(get_transaction(transaction.id, &connection), Ok(transaction));
    }

    #[test]
    fn delete_transaction_recomputes_total() {
        let connection = get_test_db_connection();
        let ann = create_test_person("Ann", &connection);
        let kept = create_transaction(
            NewTransaction::new(ann.id, 30_000.0, TransactionKind::Debt, date!(2025 - 01 - 01)),
            &connection,
        )
        .unwrap();
        let removed = create_transaction(
            NewTransaction::new(ann.id, 20_000.0, TransactionKind::Debt, date!(2025 - 01 - 02)),
            &connection,
        )
        .unwrap();

        let deleted = delete_transaction(removed.id, &connection).expect("Could not delete");

        assert_eq!(deleted, removed);
        assert_eq!(get_transactions(Some(ann.id), &connection), Ok(vec![kept]));
        assert_eq!(total_debt(&ann, &connection), 30_000.0);
    }

    #[test]
    fn delete_missing_transaction_fails() {
        let connection = get_test_db_connection();

        assert_eq!(
            delete_transaction(42, &connection),
            Err(Error::DeleteMissingTransaction)
        );
    }

    #[test]
    fn recompute_repairs_stale_total() {
        let connection = get_test_db_connection();
        let ann = create_test_person("Ann", &connection);
        create_transaction(
            NewTransaction::new(ann.id, 70.0, TransactionKind::Debt, date!(2025 - 01 - 01)),
            &connection,
        )
        .unwrap();
        connection
            .execute("UPDATE person SET total_debt = 999 WHERE id = ?1", [ann.id])
            .unwrap();

        recompute_total_debt(ann.id, &connection).unwrap();

        assert_eq!(total_debt(&ann, &connection), 70.0);
    }

    #[test]
    fn recompute_missing_person_returns_not_found() {
        let connection = get_test_db_connection();

        assert_eq!(recompute_total_debt(42, &connection), Err(Error::NotFound));
    }
}
