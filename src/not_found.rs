//! The page to display when a route or record cannot be found.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    let view = error_view(
        "Not Found",
        "404",
        "Sorry, we couldn't find that page.",
        "Check the address, or use the button below to go back to the dashboard.",
    );

    (StatusCode::NOT_FOUND, Html(view.into_string())).into_response()
}
