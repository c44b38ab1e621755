//! Implements a SQLite backed key-value store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension};

use crate::{Error, storage::KeyValueStore};

/// Stores values in the `key_value` table of a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Create a new store for the SQLite `connection`, creating the table if
    /// it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the table could not be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        create_table(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }
}

fn create_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS key_value (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        connection
            .query_row(
                "SELECT value FROM key_value WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Error::from)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        connection.execute(
            "INSERT INTO key_value (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, value),
        )?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        connection.execute("DELETE FROM key_value WHERE key = ?1", [key])?;

        Ok(())
    }
}
