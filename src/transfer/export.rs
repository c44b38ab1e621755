//! Defines the endpoint for downloading every record as JSON.

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{Error, analytics::Totals, app_state::BudgetState, budget::Budget, record::Record};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportFile<'a> {
    income: &'a [Record],
    expenses: &'a [Record],
    #[serde(with = "time::serde::rfc3339")]
    exported_at: OffsetDateTime,
    summary: ExportSummary,
}

/// Totals for people reading the file, ignored on import.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportSummary {
    total_income: f64,
    total_expenses: f64,
    balance: f64,
}

impl From<Totals> for ExportSummary {
    fn from(totals: Totals) -> Self {
        Self {
            total_income: totals.income,
            total_expenses: totals.expenses,
            balance: totals.balance,
        }
    }
}

/// A route handler that responds with every record as a JSON file download
/// named after the current date, e.g. `budget_2025-10-05.json`.
pub async fn get_export(State(state): State<BudgetState>) -> Result<Response, Error> {
    let now = state.local_now()?;
    let budget = state.lock()?;
    let json = export_json(&budget, now)?;
    tracing::info!("Exporting {} records", budget.len());

    Ok((
        [
            (CONTENT_TYPE, "application/json".to_owned()),
            (CONTENT_DISPOSITION, content_disposition(now)),
        ],
        json,
    )
        .into_response())
}

fn export_json(budget: &Budget, now: OffsetDateTime) -> Result<String, Error> {
    let file = ExportFile {
        income: budget.income(),
        expenses: budget.expenses(),
        exported_at: now,
        summary: budget.totals().into(),
    };

    serde_json::to_string_pretty(&file).map_err(|error| {
        tracing::error!("Could not serialize export: {error}");
        Error::JsonSerializationError(error.to_string())
    })
}

fn content_disposition(now: OffsetDateTime) -> String {
    format!("attachment; filename=\"budget_{}.json\"", now.date())
}
