//! Contains the key-value store trait, its implementations and the code that
//! saves and loads the budget through it.

mod snapshot;
mod sqlite;

use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

pub use snapshot::{LoadOutcome, STORAGE_KEY, load_budget, save_budget};
pub(crate) use snapshot::{MissingLists, ParsedSnapshot, parse_snapshot, plural};
pub use sqlite::SqliteStore;

use crate::Error;

/// A store of string values under string keys, like the browser's local
/// storage.
pub trait KeyValueStore: Debug + Send + Sync {
    /// Get the value stored under `key`, `None` if there is none.
    ///
    /// # Errors
    /// Returns an error if the store could not be read.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the store could not be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove the value stored under `key`. Removing a missing key is not an
    /// error.
    ///
    /// # Errors
    /// Returns an error if the store could not be written.
    fn remove(&self, key: &str) -> Result<(), Error>;
}

/// Keeps values in memory. Values are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call to [KeyValueStore::set] and
    /// [KeyValueStore::remove] fail, e.g. to simulate a full disk.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(Error::StoreError("the store is not writable".to_owned()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let values = self.values.lock().map_err(|_| Error::DatabaseLockError)?;

        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.check_writable()?;
        let mut values = self.values.lock().map_err(|_| Error::DatabaseLockError)?;
        values.insert(key.to_owned(), value.to_owned());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.check_writable()?;
        let mut values = self.values.lock().map_err(|_| Error::DatabaseLockError)?;
        values.remove(key);

        Ok(())
    }
}
