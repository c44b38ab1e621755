//! Implements a struct that holds the state of the server and the single
//! place where the budget is changed.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    budget::Budget,
    events::{BudgetEvent, EventBus},
    storage::{KeyValueStore, LoadOutcome, load_budget, save_budget},
    timezone::get_local_offset,
};

/// The state of the server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The income and expense records.
    pub budget: Arc<Mutex<Budget>>,

    /// Where the budget is saved after every change.
    pub store: Arc<dyn KeyValueStore>,

    /// Notifies open pages about changes to the budget.
    pub events: EventBus,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// Why the saved budget could not be fully loaded, shown on the dashboard
    /// until the next successful save.
    pub load_warning: Arc<Mutex<Option<String>>>,
}

impl AppState {
    /// Create a new [AppState] with the budget saved in `store`.
    ///
    /// Loading never fails: unreadable data results in an empty budget and a
    /// warning for the user. `local_timezone` should be a valid, canonical
    /// timezone name, e.g. "Pacific/Auckland".
    pub fn new(store: Arc<dyn KeyValueStore>, local_timezone: &str) -> Self {
        let LoadOutcome { budget, warning } = load_budget(store.as_ref());

        Self {
            budget: Arc::new(Mutex::new(budget)),
            store,
            events: EventBus::new(),
            local_timezone: local_timezone.to_owned(),
            load_warning: Arc::new(Mutex::new(warning)),
        }
    }
}

/// The state needed to read and change the budget.
#[derive(Debug, Clone)]
pub struct BudgetState {
    pub budget: Arc<Mutex<Budget>>,
    pub store: Arc<dyn KeyValueStore>,
    pub events: EventBus,
    pub local_timezone: String,
    pub load_warning: Arc<Mutex<Option<String>>>,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            budget: state.budget.clone(),
            store: state.store.clone(),
            events: state.events.clone(),
            local_timezone: state.local_timezone.clone(),
            load_warning: state.load_warning.clone(),
        }
    }
}

/// The result of a change that was applied to the budget.
///
/// The change is kept even if it could not be saved, in which case
/// `save_error` holds the reason.
#[derive(Debug)]
pub struct Commit<T> {
    pub value: T,
    pub save_error: Option<Error>,
}

impl BudgetState {
    /// The current time in the configured timezone.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the timezone is not a valid,
    /// canonical timezone name.
    pub fn local_now(&self) -> Result<OffsetDateTime, Error> {
        let offset = get_local_offset(&self.local_timezone)
            .ok_or_else(|| Error::InvalidTimezoneError(self.local_timezone.clone()))?;

        Ok(OffsetDateTime::now_utc().to_offset(offset))
    }

    /// Today's date in the configured timezone.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the timezone is not a valid,
    /// canonical timezone name.
    pub fn local_today(&self) -> Result<Date, Error> {
        self.local_now().map(|now| now.date())
    }

    /// Lock the budget for reading.
    ///
    /// # Errors
    /// Returns [Error::BudgetLockError] if the lock is poisoned.
    pub fn lock(&self) -> Result<MutexGuard<'_, Budget>, Error> {
        self.budget.lock().map_err(|error| {
            tracing::error!("Could not acquire budget lock: {error}");
            Error::BudgetLockError
        })
    }

    /// Apply `change` to the budget, save the budget and publish the event
    /// built by `event`.
    ///
    /// Nothing is saved or published if `change` fails.
    ///
    /// # Errors
    /// Returns the error from `change`, or [Error::BudgetLockError] if the
    /// lock is poisoned. A failed save is reported in [Commit::save_error].
    pub fn commit<T>(
        &self,
        now: OffsetDateTime,
        change: impl FnOnce(&mut Budget) -> Result<T, Error>,
        event: impl FnOnce(&T) -> BudgetEvent,
    ) -> Result<Commit<T>, Error> {
        let mut budget = self.lock()?;
        let value = change(&mut *budget)?;

        let save_error = match save_budget(self.store.as_ref(), &budget, now) {
            Ok(()) => {
                self.clear_load_warning();
                None
            }
            Err(error) => Some(error),
        };

        drop(budget);
        self.events.publish(event(&value));

        Ok(Commit { value, save_error })
    }

    /// The warning from loading the saved budget, if any.
    pub fn load_warning(&self) -> Option<String> {
        self.load_warning
            .lock()
            .map(|warning| warning.clone())
            .unwrap_or_else(|error| {
                tracing::error!("Could not acquire load warning lock: {error}");
                None
            })
    }

    fn clear_load_warning(&self) {
        if let Ok(mut warning) = self.load_warning.lock() {
            *warning = None;
        }
    }
}
