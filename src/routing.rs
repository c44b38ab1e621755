//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    analytics::get_analytics_page,
    calendar::get_calendar_page,
    dashboard::{get_dashboard_page, get_dashboard_summary},
    demo::load_demo_endpoint,
    endpoints,
    events::get_event_stream,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    record::{
        create_record_endpoint, delete_all_records_endpoint, delete_record_endpoint,
        get_records_content, get_records_page,
    },
    transfer::{get_export, import_budget_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::DASHBOARD_SUMMARY, get(get_dashboard_summary))
        .route(endpoints::RECORDS_VIEW, get(get_records_page))
        .route(endpoints::RECORDS_CONTENT, get(get_records_content))
        .route(endpoints::CALENDAR_VIEW, get(get_calendar_page))
        .route(endpoints::ANALYTICS_VIEW, get(get_analytics_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::RECORDS_API,
            post(create_record_endpoint).delete(delete_all_records_endpoint),
        )
        .route(endpoints::DELETE_RECORD, delete(delete_record_endpoint))
        .route(endpoints::EXPORT, get(get_export))
        .route(endpoints::IMPORT, post(import_budget_endpoint))
        .route(endpoints::DEMO, post(load_demo_endpoint))
        .route(endpoints::EVENTS, get(get_event_stream));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    use crate::{
        endpoints, events::BUDGET_CHANGED, record::RecordKind, test_utils::get_test_app_state,
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        let app = build_router(get_test_app_state());

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn serves_every_page() {
        let server = get_test_server();

        for page in [
            endpoints::DASHBOARD_VIEW,
            endpoints::DASHBOARD_SUMMARY,
            endpoints::RECORDS_VIEW,
            endpoints::RECORDS_CONTENT,
            endpoints::CALENDAR_VIEW,
            endpoints::ANALYTICS_VIEW,
        ] {
            let response = server.get(page).await;

            assert_eq!(response.status_code(), StatusCode::OK, "GET {page}");
        }

        server
            .get(endpoints::INTERNAL_ERROR_VIEW)
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn serves_periods_at_last_supported_month() {
        let server = get_test_server();

        for page in [
            endpoints::RECORDS_VIEW,
            endpoints::RECORDS_CONTENT,
            endpoints::ANALYTICS_VIEW,
        ] {
            let response = server
                .get(page)
                .add_query_param("period", "month")
                .add_query_param("anchor", "9999-12-15")
                .await;

            assert_eq!(response.status_code(), StatusCode::OK, "GET {page}");
        }
    }

    #[tokio::test]
    async fn large_amounts_are_rejected() {
        let server = get_test_server();
        let today = time::OffsetDateTime::now_utc().date().to_string();

        server
            .post(endpoints::RECORDS_API)
            .form(&[
                ("kind", "income"),
                ("description", "Lottery"),
                ("amount", "1e20"),
                ("date", today.as_str()),
            ])
            .await
            .assert_status_bad_request();

        let export: Value = server.get(endpoints::EXPORT).await.json();
        assert_eq!(export["income"], Value::Array(Vec::new()));
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let server = get_test_server();

        server
            .get("/does/not/exist")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn create_export_and_delete_all() {
        let server = get_test_server();
        let today = time::OffsetDateTime::now_utc().date().to_string();

        for (kind, description, amount) in [
            ("income", "Salary", "500"),
            ("income", "Bonus", "300"),
            ("expense", "Rent", "200"),
        ] {
            let response = server
                .post(endpoints::RECORDS_API)
                .form(&[
                    ("kind", kind),
                    ("description", description),
                    ("amount", amount),
                    ("date", today.as_str()),
                    ("category", ""),
                ])
                .await;

            response.assert_status_ok();
            response.assert_header("hx-trigger", BUDGET_CHANGED);
        }

        let export: Value = server.get(endpoints::EXPORT).await.json();
        assert_eq!(export["summary"]["totalIncome"], 800.0);
        assert_eq!(export["summary"]["totalExpenses"], 200.0);
        assert_eq!(export["summary"]["balance"], 600.0);
        assert_eq!(
            export["income"][0]["kind"],
            RecordKind::Income.as_query_value()
        );

        let response = server.delete(endpoints::RECORDS_API).await;
        response.assert_status_ok();
        response.assert_header("hx-trigger", BUDGET_CHANGED);

        let export: Value = server.get(endpoints::EXPORT).await.json();
        assert_eq!(export["income"], Value::Array(Vec::new()));
        assert_eq!(export["summary"]["balance"], 0.0);
    }

    #[tokio::test]
    async fn invalid_form_is_bad_request() {
        let server = get_test_server();

        server
            .post(endpoints::RECORDS_API)
            .form(&[
                ("kind", "expense"),
                ("description", "  "),
                ("amount", "10"),
                ("date", "2025-01-01"),
            ])
            .await
            .assert_status_bad_request();
    }
}
