/*! This module defines and implements traits for interacting with the application's database. */

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, database_id::SpenderId, transaction::Transaction};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The type produced from a row.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type.
    ///
    /// The `offset` indicates which column the row should be read from.
    /// This is useful in cases where tables have been joined and you want to construct two different types from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// An account holder. Spenders are managed outside this crate, the table only
/// exists so that transactions can reference their owner.
struct Spender;

impl CreateTable for Spender {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS spender (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE
                )",
            (),
        )?;

        Ok(())
    }
}

/// Insert a spender and return its ID.
///
/// Used to seed databases for manual testing and by tests.
///
/// # Errors
/// Returns an [Error::SqlError] if the email already exists or there is some other SQL error.
pub fn create_spender(name: &str, email: &str, connection: &Connection) -> Result<SpenderId, Error> {
    connection
        .prepare("INSERT INTO spender (name, email) VALUES (?1, ?2) RETURNING id")?
        .query_row((name, email), |row| row.get(0))
        .map_err(Error::from)
}

/// Create all of the database tables for the application.
///
/// Foreign key enforcement is switched on for `connection` first, since
/// SQLite ignores the pragma inside a transaction.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    Spender::create_table(&transaction)?;
    Transaction::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{create_spender, initialize};

    #[test]
    fn initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).unwrap();
        initialize(&conn).unwrap();
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let enabled: bool = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();

        assert!(enabled);
    }

    #[test]
    fn spender_ids_start_at_one() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let alice = create_spender("Alice", "alice@example.com", &conn).unwrap();
        let bob = create_spender("Bob", "bob@example.com", &conn).unwrap();

        assert_eq!((alice, bob), (1, 2));
    }
}
