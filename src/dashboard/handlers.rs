//! Dashboard HTTP handlers and view rendering.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    alert::Alert,
    analytics::Totals,
    app_state::BudgetState,
    charts::chart_view,
    dashboard::{
        cards::{expense_ratio_view, summary_cards},
        charts::{BALANCE_CHART_ID, income_expense_chart},
    },
    endpoints,
    html::{CARD_STYLE, ECHARTS_SCRIPT, HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    record::refresh_trigger,
};

/// Everything shown in the summary section of the dashboard.
struct DashboardSummary {
    totals: Totals,
    has_records: bool,
    load_warning: Option<String>,
}

impl DashboardSummary {
    fn from_state(state: &BudgetState) -> Result<Self, Error> {
        let load_warning = state.load_warning();
        let budget = state.lock()?;

        Ok(Self {
            totals: budget.totals(),
            has_records: !budget.is_empty(),
            load_warning,
        })
    }
}

/// Display a page with an overview of the budget.
pub async fn get_dashboard_page(State(state): State<BudgetState>) -> Result<Response, Error> {
    let summary = DashboardSummary::from_state(&state)?;

    Ok(dashboard_view(&summary).into_response())
}

/// Renders the summary section of the dashboard, used to refresh the section
/// after the budget changes.
pub async fn get_dashboard_summary(State(state): State<BudgetState>) -> Result<Response, Error> {
    let summary = DashboardSummary::from_state(&state)?;

    Ok(summary_view(&summary).into_response())
}

fn dashboard_view(summary: &DashboardSummary) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Dashboard" }

                (summary_view(summary))
            }
        }
    );

    base(
        "Dashboard",
        &[HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned())],
        &content,
    )
}

fn summary_view(summary: &DashboardSummary) -> Markup {
    html!(
        div
            id="dashboard-summary"
            hx-get=(endpoints::DASHBOARD_SUMMARY)
            hx-trigger=(refresh_trigger())
            hx-swap="outerHTML"
            class="space-y-6 w-full"
        {
            @if let Some(warning) = &summary.load_warning {
                (Alert::warning("Some saved data could not be loaded", warning).into_html())
            }

            (summary_cards(&summary.totals))

            @if summary.has_records {
                div class=(CARD_STYLE)
                {
                    h2 class="text-lg font-semibold mb-2" { "Income vs expenses" }

                    (chart_view(BALANCE_CHART_ID, &income_expense_chart(&summary.totals)))

                    (expense_ratio_view(&summary.totals))
                }
            } @else {
                (welcome_view())
            }
        }
    )
}

fn welcome_view() -> Markup {
    let records_link = link(endpoints::RECORDS_VIEW, "records page");

    html!(
        div data-welcome class={ "text-center " (CARD_STYLE) }
        {
            h2 class="text-xl font-bold mb-2" { "Welcome to Budget Tracker" }

            p
            {
                "Start by adding your income and expenses on the " (records_link) ".
                You can also import a file you exported earlier or load the demo data there."
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use scraper::Selector;

    use crate::{
        endpoints,
        record::NewRecord,
        test_utils::{
            add_record, assert_status_ok, assert_valid_html, get_test_budget_state,
            parse_html_document, parse_html_fragment, today,
        },
    };

    use super::{get_dashboard_page, get_dashboard_summary};

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let state = get_test_budget_state();
        add_record(&state, NewRecord::income("Salary", 500.0, today()));
        add_record(&state, NewRecord::income("Bonus", 300.0, today()));
        add_record(&state, NewRecord::expense("Rent", 200.0, today()));

        let response = get_dashboard_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let balance = Selector::parse("[data-total=balance] p").unwrap();
        let balance: String = html.select(&balance).flat_map(|p| p.text()).collect();
        assert_eq!(balance, "$600.00");

        let chart = Selector::parse("#balance-chart").unwrap();
        assert!(html.select(&chart).next().is_some(), "chart not found");

        let welcome = Selector::parse("[data-welcome]").unwrap();
        assert!(html.select(&welcome).next().is_none());
    }

    #[tokio::test]
    async fn displays_welcome_on_no_data() {
        let state = get_test_budget_state();

        let response = get_dashboard_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let welcome = Selector::parse("[data-welcome]").unwrap();
        assert!(html.select(&welcome).next().is_some());

        let chart = Selector::parse("[data-chart]").unwrap();
        assert!(html.select(&chart).next().is_none());

        let income = Selector::parse("[data-total=income] p").unwrap();
        let income: String = html.select(&income).flat_map(|p| p.text()).collect();
        assert_eq!(income, "$0.00");
    }

    #[tokio::test]
    async fn summary_refreshes_itself() {
        let state = get_test_budget_state();

        let response = get_dashboard_summary(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let summary = Selector::parse("#dashboard-summary").unwrap();
        let summary = html.select(&summary).next().unwrap();
        assert_eq!(
            summary.value().attr("hx-get"),
            Some(endpoints::DASHBOARD_SUMMARY)
        );
        assert!(
            summary
                .value()
                .attr("hx-trigger")
                .unwrap_or_default()
                .contains("sse:budget-changed")
        );
    }

    #[tokio::test]
    async fn shows_load_warning() {
        let state = get_test_budget_state();
        *state.load_warning.lock().unwrap() = Some("The saved data is not valid JSON.".to_owned());

        let response = get_dashboard_summary(State(state)).await.unwrap();

        let html = parse_html_fragment(response).await;
        let warning = Selector::parse("[data-alert-level=warning]").unwrap();
        let text: String = html.select(&warning).flat_map(|alert| alert.text()).collect();
        assert!(text.contains("not valid JSON"), "got {text:?}");
    }
}
