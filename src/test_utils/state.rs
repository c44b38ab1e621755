use std::sync::Arc;

use axum::extract::FromRef;
use time::{Date, OffsetDateTime};

use crate::{
    AppState,
    app_state::BudgetState,
    record::{NewRecord, Record},
    storage::MemoryStore,
};

pub(crate) fn get_test_app_state() -> AppState {
    AppState::new(Arc::new(MemoryStore::new()), "Etc/UTC")
}

pub(crate) fn get_test_budget_state() -> BudgetState {
    BudgetState::from_ref(&get_test_app_state())
}

/// Add `new_record` to the budget of `state` without saving it.
#[track_caller]
pub(crate) fn add_record(state: &BudgetState, new_record: NewRecord) -> Record {
    let now = OffsetDateTime::now_utc();

    state
        .lock()
        .expect("Could not lock budget")
        .add(new_record, now)
        .expect("Could not add record")
}

pub(crate) fn today() -> Date {
    OffsetDateTime::now_utc().date()
}
