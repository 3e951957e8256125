//! Sets up the application's SQLite database.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{
    Error, edit_mode::create_edit_password_table, person::create_person_table,
    transaction::create_transaction_table,
};

/// Create the tables for all domain models if they do not already exist.
///
/// Also turns on foreign key enforcement for `connection`, which SQLite
/// leaves off by default. Deleting a person relies on it to remove their
/// transactions.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must come first.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_person_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_edit_password_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
