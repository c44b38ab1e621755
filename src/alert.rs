//! Alert system for displaying success, warning and error messages to users.
//!
//! Alerts are rendered as HTML fragments that htmx swaps into the
//! `#alert-container` element of the base page.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// A message shown to the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success { message: String, details: String },
    SuccessSimple { message: String },
    Warning { message: String, details: String },
    Info { message: String, details: String },
    Error { message: String, details: String },
    ErrorSimple { message: String },
}

impl Alert {
    /// Create a new success alert
    pub fn success(message: &str, details: &str) -> Self {
        Self::Success {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new warning alert
    pub fn warning(message: &str, details: &str) -> Self {
        Self::Warning {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    fn parts(&self) -> (AlertLevel, &str, &str) {
        match self {
            Alert::Success { message, details } => (AlertLevel::Success, message, details),
            Alert::SuccessSimple { message } => (AlertLevel::Success, message, ""),
            Alert::Warning { message, details } => (AlertLevel::Warning, message, details),
            Alert::Info { message, details } => (AlertLevel::Info, message, details),
            Alert::Error { message, details } => (AlertLevel::Error, message, details),
            Alert::ErrorSimple { message } => (AlertLevel::Error, message, ""),
        }
    }

    pub fn into_html(self) -> Markup {
        let (level, message, details) = self.parts();

        html! {
            div
                role="alert"
                data-alert-level=(level.as_str())
                class={ "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg border shadow-lg " (level.style()) }
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (message) }

                    @if !details.is_empty()
                    {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="ms-auto font-bold opacity-70 hover:opacity-100"
                    onclick="dismissAlert()"
                {
                    "×"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}

#[derive(Debug, Clone, Copy)]
enum AlertLevel {
    Success,
    Warning,
    Info,
    Error,
}

impl AlertLevel {
    fn as_str(self) -> &'static str {
        match self {
            AlertLevel::Success => "success",
            AlertLevel::Warning => "warning",
            AlertLevel::Info => "info",
            AlertLevel::Error => "error",
        }
    }

    fn style(self) -> &'static str {
        match self {
            AlertLevel::Success => {
                "text-green-800 bg-green-50 border-green-300 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
            }
            AlertLevel::Warning => {
                "text-yellow-800 bg-yellow-50 border-yellow-300 \
                dark:bg-gray-800 dark:text-yellow-300 dark:border-yellow-800"
            }
            AlertLevel::Info => {
                "text-blue-800 bg-blue-50 border-blue-300 \
                dark:bg-gray-800 dark:text-blue-400 dark:border-blue-800"
            }
            AlertLevel::Error => {
                "text-red-800 bg-red-50 border-red-300 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            }
        }
    }
}
