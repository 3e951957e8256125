//! Database operations for people.

use std::collections::HashMap;

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    person::{Person, PersonId, PersonName},
};

const PERSON_COLUMNS: &str = "id, name, total_debt, last_updated, created_at, updated_at";

/// Create a person with no debt and return them with their generated ID.
pub fn create_person(name: PersonName, connection: &Connection) -> Result<Person, Error> {
    let now = OffsetDateTime::now_utc();

    connection
        .prepare(&format!(
            "INSERT INTO person (name, total_debt, last_updated, created_at, updated_at)
             VALUES (?1, 0, ?2, ?2, ?2)
             RETURNING {PERSON_COLUMNS}"
        ))?
        .query_row((name.as_ref(), now), map_row)
        .map_err(|error| error.into())
}

/// Retrieve a single person by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no person with `person_id`.
pub fn get_person(person_id: PersonId, connection: &Connection) -> Result<Person, Error> {
    connection
        .prepare(&format!(
            "SELECT {PERSON_COLUMNS} FROM person WHERE id = :id;"
        ))?
        .query_row(&[(":id", &person_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve everyone ordered alphabetically by name.
pub fn get_all_people(connection: &Connection) -> Result<Vec<Person>, Error> {
    connection
        .prepare(&format!(
            "SELECT {PERSON_COLUMNS} FROM person ORDER BY name ASC, id ASC;"
        ))?
        .query_map([], map_row)?
        .map(|maybe_person| maybe_person.map_err(|error| error.into()))
        .collect()
}

/// Change a person's name. Returns an error if the person doesn't exist.
pub fn rename_person(
    person_id: PersonId,
    new_name: PersonName,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE person SET name = ?1, updated_at = ?2 WHERE id = ?3",
        (new_name.as_ref(), OffsetDateTime::now_utc(), person_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingPerson);
    }

    Ok(())
}

/// Delete a person and, through the foreign key, all of their transactions.
///
/// Returns an error if the person doesn't exist.
pub fn delete_person(person_id: PersonId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM person WHERE id = ?1", [person_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingPerson);
    }

    Ok(())
}

/// Count the transactions that belong to each person.
///
/// People with no transactions are left out of the map.
pub fn count_transactions_per_person(
    connection: &Connection,
) -> Result<HashMap<PersonId, u32>, Error> {
    let result: Result<HashMap<PersonId, u32>, rusqlite::Error> = connection
        .prepare("SELECT person_id, COUNT(1) FROM debt_transaction GROUP BY person_id")?
        .query_map((), |row| {
            let person_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((person_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

/// Initialize the person table and indexes.
pub fn create_person_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS person (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            total_debt REAL NOT NULL DEFAULT 0,
            last_updated TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_person_name ON person(name);",
    )?;

    Ok(())
}

pub(crate) fn map_row(row: &Row) -> Result<Person, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = PersonName::new_unchecked(&raw_name);

    Ok(Person {
        id,
        name,
        total_debt: row.get(2)?,
        last_updated: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
