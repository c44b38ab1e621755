//! The records page: the forms for adding records, the data controls, the
//! period and filter controls and the filtered record lists.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    analytics::{
        ActivePeriod, FilterQuery, PeriodNavigation, PeriodQuery, RecordFilter, UNCATEGORIZED,
        category_labels, date_bounds, resolve_period,
    },
    app_state::BudgetState,
    budget::Budget,
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, base, dollar_input_styles,
    },
    navigation::NavBar,
    period_controls::period_controls,
    record::{
        RecordKind,
        form::record_form,
        view::{RECORDS_CONTENT_ID, RecordsContent, records_content_view},
    },
};

/// Renders the records page for the period and filters in the query string.
pub async fn get_records_page(
    State(state): State<BudgetState>,
    Query(period_query): Query<PeriodQuery>,
    Query(filter_query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let today = state.local_today()?;
    let budget = state.lock()?;

    Ok(records_page_view(&budget, &period_query, &filter_query, today).into_response())
}

/// Renders the filtered record lists, used to refresh the lists without
/// reloading the page.
pub async fn get_records_content(
    State(state): State<BudgetState>,
    Query(period_query): Query<PeriodQuery>,
    Query(filter_query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let today = state.local_today()?;
    let budget = state.lock()?;
    let active = resolve_period(&period_query, today);
    let content = build_content(&budget, &active, &filter_query);

    Ok(records_content_view(&content).into_response())
}

fn build_content<'a>(
    budget: &'a Budget,
    active: &ActivePeriod,
    filter_query: &FilterQuery,
) -> RecordsContent<'a> {
    let filter = RecordFilter::from_query(filter_query, active.range);

    RecordsContent {
        query: join_queries(&active.to_query(), filter_query),
        income: filter.apply(budget.income()),
        expenses: filter.apply(budget.expenses()),
        has_records: !budget.is_empty(),
    }
}

fn join_queries(period_query: &str, filter_query: &FilterQuery) -> String {
    let filter_query = serde_urlencoded::to_string(filter_query).unwrap_or_default();

    [period_query, filter_query.as_str()]
        .into_iter()
        .filter(|query| !query.is_empty())
        .collect::<Vec<_>>()
        .join("&")
}

/// The key-value pairs of `query` as they appear in a query string.
fn query_pairs(query: &impl Serialize) -> Vec<(String, String)> {
    serde_urlencoded::to_string(query)
        .ok()
        .and_then(|query| serde_urlencoded::from_str(&query).ok())
        .unwrap_or_default()
}

fn records_page_view(
    budget: &Budget,
    period_query: &PeriodQuery,
    filter_query: &FilterQuery,
    today: Date,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::RECORDS_VIEW).into_html();
    let active = resolve_period(period_query, today);
    let navigation = PeriodNavigation::new(&active, date_bounds(budget.all_records()), today);
    let content = build_content(budget, &active, filter_query);

    let all_categories = category_labels(budget.all_records());
    let known_categories: Vec<String> = all_categories
        .iter()
        .filter(|label| label.as_str() != UNCATEGORIZED)
        .cloned()
        .collect();

    let filter_pairs = query_pairs(filter_query);
    let filter_extra: Vec<(&str, &str)> = filter_pairs
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    let period_pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(&active.to_query()).unwrap_or_default();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Records" }

                    (data_controls())
                }

                div class="grid gap-6 md:grid-cols-2"
                {
                    (record_form(RecordKind::Income, today, &known_categories))
                    (record_form(RecordKind::Expense, today, &known_categories))
                }

                (period_controls(&active, &navigation, endpoints::RECORDS_VIEW, &filter_extra))

                (filter_form(filter_query, &period_pairs, &all_categories))

                (records_content_view(&content))
            }
        }
    );

    base("Records", &[dollar_input_styles()], &content)
}

fn data_controls() -> Markup {
    html! {
        div class="flex flex-wrap items-center gap-3 text-sm"
        {
            a href=(endpoints::EXPORT) download class=(LINK_STYLE) { "Export JSON" }

            form
                hx-post=(endpoints::IMPORT)
                hx-encoding="multipart/form-data"
                hx-target="#alert-container"
                hx-target-error="#alert-container"
                hx-confirm="Importing replaces all of your records. Continue?"
                class="flex items-center gap-2"
            {
                label for="import-file" class="sr-only" { "Import file" }
                input
                    id="import-file"
                    name="file"
                    type="file"
                    accept=".json,application/json"
                    required
                    class="text-sm";
                button type="submit" class=(LINK_STYLE) { "Import" }
            }

            button
                hx-post=(endpoints::DEMO)
                hx-confirm="Loading the demo data replaces all of your records. Continue?"
                hx-target="#alert-container"
                hx-target-error="#alert-container"
                class=(LINK_STYLE)
            {
                "Load demo data"
            }

            button
                hx-delete=(endpoints::RECORDS_API)
                hx-confirm="Are you sure you want to delete every record? This cannot be undone."
                hx-target="#alert-container"
                hx-target-error="#alert-container"
                class=(BUTTON_DELETE_STYLE)
            {
                "Delete all"
            }
        }
    }
}

fn filter_form(
    filter_query: &FilterQuery,
    period_pairs: &[(String, String)],
    categories: &[String],
) -> Markup {
    let selected_category = filter_query.category.as_deref().unwrap_or_default();
    let kind_options = [
        ("", "Income and expenses", filter_query.kind.is_none()),
        (
            "income",
            "Income",
            filter_query.kind == Some(RecordKind::Income),
        ),
        (
            "expense",
            "Expenses",
            filter_query.kind == Some(RecordKind::Expense),
        ),
    ];

    html! {
        form
            id="record-filters"
            method="get"
            action=(endpoints::RECORDS_VIEW)
            hx-get=(endpoints::RECORDS_CONTENT)
            hx-target={ "#" (RECORDS_CONTENT_ID) }
            hx-swap="outerHTML"
            hx-trigger="change, submit, input[target.name=='search'] delay:300ms"
            class="grid gap-3 sm:grid-cols-3 items-end"
        {
            @for (name, value) in period_pairs {
                input type="hidden" name=(name) value=(value);
            }

            div
            {
                label for="filter-kind" class=(FORM_LABEL_STYLE) { "Show" }
                select id="filter-kind" name="kind" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (value, label, selected) in kind_options {
                        option value=(value) selected[selected] { (label) }
                    }
                }
            }

            div
            {
                label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }
                select id="filter-category" name="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[selected_category.is_empty()] { "All categories" }

                    @for category in categories {
                        option
                            value=(category)
                            selected[category.eq_ignore_ascii_case(selected_category)]
                        { (category) }
                    }
                }
            }

            div
            {
                label for="filter-search" class=(FORM_LABEL_STYLE) { "Search" }
                input
                    id="filter-search"
                    name="search"
                    type="search"
                    placeholder="Description or category"
                    value=[filter_query.search.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            noscript
            {
                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Filter" }
            }
        }
    }
}
