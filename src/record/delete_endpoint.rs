//! Defines the endpoints for deleting one record or every record.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    alert::Alert,
    app_state::BudgetState,
    events::{BudgetEvent, budget_changed_response},
    record::RecordId,
    storage::plural,
};

/// A route handler for deleting a single record, responds with an alert and
/// tells the page to refresh.
pub async fn delete_record_endpoint(
    State(state): State<BudgetState>,
    Path(record_id): Path<String>,
) -> Response {
    let Some(id) = RecordId::parse(&record_id) else {
        return Error::InvalidRecordId(record_id).into_alert_response();
    };

    let now = match state.local_now() {
        Ok(now) => now,
        Err(error) => return error.into_alert_response(),
    };

    let commit = state.commit(
        now,
        |budget| budget.remove(&id),
        |record| BudgetEvent::RecordDeleted {
            id: record.id().clone(),
        },
    );

    match commit {
        Ok(commit) => {
            let record = &commit.value;
            tracing::info!(
                "Deleted {} record {}",
                record.kind().as_query_value(),
                record.id()
            );

            let alert = Alert::SuccessSimple {
                message: format!("Deleted \"{}\"", record.description()),
            };

            budget_changed_response(alert, commit.save_error)
        }
        Err(error) => {
            tracing::warn!("Could not delete record {id}: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for deleting every record, responds with an alert and
/// tells the page to refresh.
pub async fn delete_all_records_endpoint(State(state): State<BudgetState>) -> Response {
    let is_empty = match state.lock() {
        Ok(budget) => budget.is_empty(),
        Err(error) => return error.into_alert_response(),
    };

    if is_empty {
        return Alert::Info {
            message: "Nothing to delete".to_owned(),
            details: "There are no records yet.".to_owned(),
        }
        .into_response();
    }

    let now = match state.local_now() {
        Ok(now) => now,
        Err(error) => return error.into_alert_response(),
    };

    match state.commit(
        now,
        |budget| Ok(budget.clear()),
        |&removed| BudgetEvent::Cleared { removed },
    ) {
        Ok(commit) => {
            let removed = commit.value;
            tracing::info!("Deleted all {removed} records");

            let alert = Alert::SuccessSimple {
                message: format!(
                    "Deleted {removed} {}",
                    plural(removed, "record", "records")
                ),
            };

            budget_changed_response(alert, commit.save_error)
        }
        Err(error) => error.into_alert_response(),
    }
}
