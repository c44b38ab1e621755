//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/records/{record_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page with the budget summary.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The summary section of the dashboard, re-fetched when the budget changes.
pub const DASHBOARD_SUMMARY: &str = "/dashboard/summary";
/// The page for adding, filtering and deleting records.
pub const RECORDS_VIEW: &str = "/records";
/// The filtered record lists of the records page.
pub const RECORDS_CONTENT: &str = "/records/content";
/// The page with the month calendar of daily balances.
pub const CALENDAR_VIEW: &str = "/calendar";
/// The page with the category and trend analytics.
pub const ANALYTICS_VIEW: &str = "/analytics";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to create records and to delete all records.
pub const RECORDS_API: &str = "/api/records";
/// The route to delete a single record.
pub const DELETE_RECORD: &str = "/api/records/{record_id}";
/// The route to download every record as JSON.
pub const EXPORT: &str = "/api/export";
/// The route to upload a JSON file that replaces every record.
pub const IMPORT: &str = "/api/import";
/// The route to replace every record with sample data.
pub const DEMO: &str = "/api/demo";
/// The route for the server-sent stream of budget changes.
pub const EVENTS: &str = "/api/events";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/records/{record_id}', '{record_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_SUMMARY);
        assert_endpoint_is_valid_uri(endpoints::RECORDS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::RECORDS_CONTENT);
        assert_endpoint_is_valid_uri(endpoints::CALENDAR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::ANALYTICS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::RECORDS_API);
        assert_endpoint_is_valid_uri(endpoints::DELETE_RECORD);
        assert_endpoint_is_valid_uri(endpoints::EXPORT);
        assert_endpoint_is_valid_uri(endpoints::IMPORT);
        assert_endpoint_is_valid_uri(endpoints::DEMO);
        assert_endpoint_is_valid_uri(endpoints::EVENTS);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", "lnz5v2kq4f7d");

        assert_eq!(formatted_path, "/hello/lnz5v2kq4f7d");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", "1");

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", "1");

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", "1");

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
