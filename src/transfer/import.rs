//! Defines the endpoint for replacing the budget with an uploaded JSON file.

use axum::{
    extract::{Multipart, State, multipart::Field},
    response::Response,
};

use crate::{
    Error,
    alert::Alert,
    app_state::BudgetState,
    events::{BudgetEvent, budget_changed_response},
    storage::{MissingLists, ParsedSnapshot, parse_snapshot, plural},
};

/// The name of the form field that holds the uploaded file.
const FILE_FIELD: &str = "file";

/// A route handler for importing a file exported by [get_export](super::get_export).
///
/// The records in the file replace every current record. Invalid and
/// duplicate entries are skipped and reported in the alert.
pub async fn import_budget_endpoint(
    State(state): State<BudgetState>,
    multipart: Multipart,
) -> Response {
    let json = match read_file(multipart).await {
        Ok(json) => json,
        Err(error) => return error.into_alert_response(),
    };

    let ParsedSnapshot { budget, skipped } = match parse_snapshot(&json, MissingLists::Reject) {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::info!("Rejected import: {error}");
            return error.into_alert_response();
        }
    };

    let now = match state.local_now() {
        Ok(now) => now,
        Err(error) => return error.into_alert_response(),
    };
    let count = budget.len();

    let commit = match state.commit(
        now,
        |current| Ok(current.replace(budget)),
        |_| BudgetEvent::Imported { count, skipped },
    ) {
        Ok(commit) => commit,
        Err(error) => return error.into_alert_response(),
    };
    tracing::info!(
        "Imported {count} records, replaced {} and skipped {skipped}",
        commit.value.len()
    );

    let details = if skipped > 0 {
        format!(
            "{skipped} invalid or duplicate {} skipped.",
            plural(skipped, "entry was", "entries were")
        )
    } else {
        "Your previous records were replaced.".to_owned()
    };
    let alert = Alert::success(
        &format!("Imported {count} {}", plural(count, "record", "records")),
        &details,
    );

    budget_changed_response(alert, commit.save_error)
}

/// The text of the uploaded file.
async fn read_file(mut multipart: Multipart) -> Result<String, Error> {
    loop {
        let field = multipart.next_field().await.map_err(|error| {
            tracing::error!("Could not read multipart form: {error}");
            Error::MultipartError("The upload could not be read, try again.".to_owned())
        })?;

        match field {
            Some(field) if field.name() == Some(FILE_FIELD) => {
                return parse_multipart_field(field).await;
            }
            Some(_) => continue,
            None => {
                return Err(Error::MultipartError(
                    "Choose a file to import.".to_owned(),
                ));
            }
        }
    }
}

async fn parse_multipart_field(field: Field<'_>) -> Result<String, Error> {
    let file_name = field.file_name().unwrap_or("<unnamed>").to_owned();

    let data = match field.text().await {
        Ok(data) => data,
        Err(error) => {
            tracing::error!("Could not read data from multipart form field: {error}");
            return Err(Error::MultipartError(
                "Could not read data from multipart form field.".to_owned(),
            ));
        }
    };

    tracing::debug!("Received file '{}' that is {} bytes", file_name, data.len());

    Ok(data)
}
