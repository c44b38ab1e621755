//! Budget Tracker is a web app for keeping track of personal income and
//! expenses.
//!
//! Records are entered through forms and summarised as totals, a calendar of
//! daily balances and category and trend analytics. Every record lives in a
//! single entry of a local key-value store and can be exported to and
//! imported from JSON.
//!
//! This library provides a single-user server that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod alert;
mod analytics;
mod app_state;
mod budget;
mod calendar;
mod charts;
mod dashboard;
mod demo;
mod endpoints;
mod events;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod period_controls;
mod record;
mod routing;
mod storage;
mod timezone;
mod transfer;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use budget::Budget;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use record::{NewRecord, Record, RecordId, RecordKind};
pub use routing::build_router;
pub use storage::{
    KeyValueStore, LoadOutcome, MemoryStore, STORAGE_KEY, SqliteStore, load_budget, save_budget,
};
pub use timezone::get_local_offset;

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response, record::RecordId as Id,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A record was created with a description that is empty or only
    /// whitespace.
    #[error("the description cannot be empty")]
    EmptyDescription,

    /// A record was created with an amount that is missing, not a number, not
    /// greater than zero or larger than [record::MAX_AMOUNT].
    #[error("the amount must be a number greater than zero and at most one billion")]
    InvalidAmount,

    /// A record was created without a date.
    #[error("the date is missing")]
    MissingDate,

    /// A date in the future was used to create a record.
    ///
    /// Records describe money that has already been earned or spent,
    /// therefore future dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A saved or imported record had an ID that is empty or contains
    /// characters other than letters, digits, `-` and `_`.
    #[error("\"{0}\" is not a valid record ID")]
    InvalidRecordId(String),

    /// A saved or imported record declared a kind that does not match the
    /// list it was found in, e.g. an expense in the income list.
    #[error("the record {0} is in the wrong list for its kind")]
    KindMismatch(Id),

    /// A record with the same ID already exists.
    #[error("a record with the ID {0} already exists")]
    DuplicateRecordId(Id),

    /// No record has the given ID.
    #[error("could not find a record with the ID {0}")]
    RecordNotFound(Id),

    /// An imported file is JSON but does not describe a budget.
    #[error("the file is not a valid budget export: {0}")]
    InvalidImportFormat(String),

    /// An imported file is not valid JSON.
    #[error("the file is not valid JSON")]
    NotJson,

    /// The multipart form could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The budget could not be written to the store.
    ///
    /// Changes stay visible until the server restarts.
    #[error("could not save the budget: {0}")]
    SaveFailed(String),

    /// The key-value store could not be read or written.
    #[error("the store failed: {0}")]
    StoreError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JsonSerializationError(String),

    /// Could not acquire the budget lock
    #[error("could not acquire the budget lock")]
    BudgetLockError,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::RecordNotFound(_) | Error::InvalidRecordId(_) => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::BudgetLockError | Error::DatabaseLockError => {
                InternalServerError::default().into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert for htmx to swap into the alert container.
    fn into_alert_response(self) -> Response {
        let (status, alert) = match self {
            Error::EmptyDescription => (
                StatusCode::BAD_REQUEST,
                Alert::error("Missing description", "Enter what the money was for."),
            ),
            Error::InvalidAmount => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid amount",
                    "Enter an amount greater than zero and at most $1,000,000,000.00, e.g. 12.50.",
                ),
            ),
            Error::MissingDate => (
                StatusCode::BAD_REQUEST,
                Alert::error("Missing date", "Choose the date of the record."),
            ),
            Error::FutureDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid date",
                    &format!(
                        "{date} is a date in the future, which is not allowed. \
                        Change the date to today or earlier."
                    ),
                ),
            ),
            Error::RecordNotFound(_) | Error::InvalidRecordId(_) => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not delete record",
                    "The record could not be found. \
                    Try refreshing the page to see if the record has already been deleted.",
                ),
            ),
            Error::DuplicateRecordId(id) => (
                StatusCode::CONFLICT,
                Alert::error(
                    "Duplicate record",
                    &format!("A record with the ID {id} already exists."),
                ),
            ),
            Error::NotJson => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid file",
                    "The file is not valid JSON. Choose a file exported from this app.",
                ),
            ),
            Error::InvalidImportFormat(details) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid file",
                    &format!(
                        "The file does not contain an income and an expense list ({details}). \
                        Your records were not changed."
                    ),
                ),
            ),
            Error::MultipartError(details) => (
                StatusCode::BAD_REQUEST,
                Alert::error("Could not read the upload", &details),
            ),
            Error::SaveFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Could not save your changes",
                    "The change is shown but will be lost when the app restarts. \
                    Check the server logs for more details.",
                ),
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                ),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    ),
                )
            }
        };

        (status, alert.into_html()).into_response()
    }
}
