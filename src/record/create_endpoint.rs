//! Defines the endpoint for creating a new income or expense record.

use axum::{extract::State, response::Response};
use axum_extra::extract::Form;
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    alert::Alert,
    app_state::BudgetState,
    events::{BudgetEvent, budget_changed_response},
    html::format_currency,
    record::{NewRecord, RecordKind},
};

const DATE_INPUT_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The form data for creating a record.
///
/// The amount and date are kept as text so that bad input is reported as a
/// validation error instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct RecordForm {
    pub kind: RecordKind,
    #[serde(default)]
    pub description: String,
    pub amount: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
}

impl RecordForm {
    fn into_new_record(self) -> NewRecord {
        NewRecord {
            kind: self.kind,
            description: self.description,
            amount: self
                .amount
                .and_then(|amount| amount.trim().parse::<f64>().ok()),
            date: self
                .date
                .and_then(|date| Date::parse(date.trim(), DATE_INPUT_FORMAT).ok()),
            category: self.category,
        }
    }
}

/// A route handler for creating a new record, responds with an alert and
/// tells the page to refresh.
pub async fn create_record_endpoint(
    State(state): State<BudgetState>,
    Form(form): Form<RecordForm>,
) -> Response {
    let now = match state.local_now() {
        Ok(now) => now,
        Err(error) => return error.into_alert_response(),
    };
    let new_record = form.into_new_record();

    let commit = state.commit(
        now,
        |budget| budget.add(new_record, now),
        |record| BudgetEvent::RecordAdded {
            id: record.id().clone(),
            kind: record.kind(),
        },
    );

    match commit {
        Ok(commit) => {
            let record = &commit.value;
            tracing::info!(
                "Added {} record {} for {}",
                record.kind().as_query_value(),
                record.id(),
                format_currency(record.amount())
            );

            let alert = Alert::success(
                &format!("{} added", record.kind().label()),
                &format!(
                    "\"{}\" for {} on {}.",
                    record.description(),
                    format_currency(record.amount()),
                    record.local_date()
                ),
            );

            budget_changed_response(alert, commit.save_error)
        }
        Err(error) => {
            tracing::debug!("Rejected new record: {error}");
            error.into_alert_response()
        }
    }
}
