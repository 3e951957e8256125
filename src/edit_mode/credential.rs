//! Storage for the single edit password.

use rusqlite::{Connection, OptionalExtension};

use crate::{Error, edit_mode::PasswordHash};

/// Create the table holding the edit password hash.
///
/// The table only ever has one row, with the id 1.
pub fn create_edit_password_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS edit_password (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                password TEXT NOT NULL
            )",
        (),
    )?;

    Ok(())
}

/// Get the stored edit password hash.
///
/// # Errors
/// Returns [Error::EditPasswordNotSet] if no password has been stored yet, or
/// [Error::SqlError] for any other SQL error.
pub fn get_edit_password(connection: &Connection) -> Result<PasswordHash, Error> {
    let password: Option<String> = connection
        .query_row("SELECT password FROM edit_password WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()?;

    password
        .map(|password| PasswordHash::new_unchecked(&password))
        .ok_or(Error::EditPasswordNotSet)
}

/// Store `password_hash` as the edit password, replacing any existing one.
pub fn set_edit_password(password_hash: PasswordHash, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO edit_password (id, password) VALUES (1, ?1)
            ON CONFLICT(id) DO UPDATE SET password = excluded.password",
        (password_hash.as_ref(),),
    )?;

    Ok(())
}
