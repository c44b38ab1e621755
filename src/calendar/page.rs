//! The calendar page with the daily totals and running balance of a month.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, Month};

use crate::{
    Error,
    analytics::Totals,
    app_state::BudgetState,
    calendar::{CalendarDay, MonthCalendar},
    endpoints,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, balance_style, base, format_currency},
    navigation::NavBar,
    not_found::get_404_not_found_response,
    record::refresh_trigger,
};

const CALENDAR_ID: &str = "calendar";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// The month shown on the calendar page. Missing or invalid values fall back
/// to the current month.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
    pub month: Option<u8>,
}

/// Renders the calendar for the month in the query string.
pub async fn get_calendar_page(
    State(state): State<BudgetState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Response, Error> {
    let today = state.local_today()?;
    let budget = state.lock()?;

    let calendar = resolve_month(&query, today)
        .and_then(|(year, month)| MonthCalendar::build(year, month, &budget))
        .or_else(|| MonthCalendar::build(today.year(), today.month(), &budget));

    let Some(calendar) = calendar else {
        tracing::warn!("Could not build the calendar for {query:?}");
        return Ok(get_404_not_found_response());
    };

    Ok(calendar_view(&calendar, today).into_response())
}

fn resolve_month(query: &CalendarQuery, today: Date) -> Option<(i32, Month)> {
    let month = match query.month {
        Some(month) => Month::try_from(month).ok()?,
        None => today.month(),
    };

    Some((query.year.unwrap_or(today.year()), month))
}

fn month_url(year: i32, month: Month) -> String {
    format!("{}?year={year}&month={}", endpoints::CALENDAR_VIEW, month as u8)
}

fn calendar_view(calendar: &MonthCalendar, today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::CALENDAR_VIEW).into_html();
    let (previous_year, previous_month) = calendar.previous_month();
    let (next_year, next_month) = calendar.next_month();
    let current_url = month_url(calendar.year, calendar.month);

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section
                id=(CALENDAR_ID)
                hx-get=(current_url)
                hx-trigger=(refresh_trigger())
                hx-select={ "#" (CALENDAR_ID) }
                hx-swap="outerHTML"
                class="space-y-6 w-full lg:max-w-5xl"
            {
                nav class="flex items-center justify-between" aria-label="Month navigation"
                {
                    a href=(month_url(previous_year, previous_month)) class=(LINK_STYLE) rel="prev"
                    { "← " (previous_month) " " (previous_year) }

                    h1 class="text-xl font-bold" { (calendar.month) " " (calendar.year) }

                    a href=(month_url(next_year, next_month)) class=(LINK_STYLE) rel="next"
                    { (next_month) " " (next_year) " →" }
                }

                (month_totals(&calendar.totals()))

                div class="overflow-x-auto"
                {
                    table class="w-full table-fixed text-sm text-gray-500 dark:text-gray-400"
                    {
                        thead class="text-xs text-gray-700 uppercase dark:text-gray-400"
                        {
                            tr
                            {
                                @for weekday in WEEKDAYS {
                                    th scope="col" class="px-2 py-2" { (weekday) }
                                }
                            }
                        }

                        tbody
                        {
                            @for week in &calendar.weeks {
                                tr
                                {
                                    @for day in week {
                                        (day_cell(day, today))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Calendar", &[], &content)
}

fn month_totals(totals: &Totals) -> Markup {
    html! {
        div class={ "grid grid-cols-3 gap-4 text-center " (CARD_STYLE) }
        {
            div data-total="income"
            {
                p class="text-sm" { "Income" }
                p class="font-semibold text-green-600 dark:text-green-400"
                { (format_currency(totals.income)) }
            }

            div data-total="expenses"
            {
                p class="text-sm" { "Expenses" }
                p class="font-semibold text-red-600 dark:text-red-400"
                { (format_currency(totals.expenses)) }
            }

            div data-total="balance"
            {
                p class="text-sm" { "Net" }
                p class={ "font-semibold " (balance_style(totals.balance)) }
                { (format_currency(totals.balance)) }
            }
        }
    }
}

fn day_cell(day: &CalendarDay, today: Date) -> Markup {
    let is_today = day.date == today;
    let mut style = String::from("align-top h-24 p-2 border border-gray-200 dark:border-gray-700");

    if !day.in_month {
        style.push_str(" opacity-40");
    }
    if is_today {
        style.push_str(" bg-blue-50 dark:bg-blue-900/30");
    }

    html! {
        td
            class=(style)
            data-date=(day.date)
            aria-current=[is_today.then_some("date")]
        {
            div class="font-semibold text-gray-900 dark:text-white" { (day.date.day()) }

            @if day.has_records() {
                div data-net class=(balance_style(day.net)) { (format_currency(day.net)) }
            }

            div data-balance class="text-xs" title="Balance at the end of the day"
            { (format_currency(day.balance)) }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use axum_extra::extract::Query;
    use scraper::Selector;
    use time::{Month, macros::date};

    use crate::{
        record::NewRecord,
        test_utils::{
            add_record, assert_status_ok, assert_valid_html, get_test_budget_state,
            parse_html_document, today,
        },
    };

    use super::{CalendarQuery, get_calendar_page, resolve_month};

    #[test]
    fn month_falls_back_to_today() {
        let today = date!(2025 - 10 - 20);

        let cases = [
            ((None, None), Some((2025, Month::October))),
            ((Some(2024), Some(2)), Some((2024, Month::February))),
            ((Some(2024), None), Some((2024, Month::October))),
            ((None, Some(3)), Some((2025, Month::March))),
            ((Some(2024), Some(13)), None),
            ((Some(2024), Some(0)), None),
        ];

        for ((year, month), want) in cases {
            assert_eq!(
                resolve_month(&CalendarQuery { year, month }, today),
                want,
                "year {year:?}, month {month:?}"
            );
        }
    }

    #[tokio::test]
    async fn shows_month_with_daily_balances() {
        let state = get_test_budget_state();
        add_record(&state, NewRecord::income("Salary", 500.0, date!(2025 - 03 - 03)));
        add_record(&state, NewRecord::expense("Rent", 200.0, date!(2025 - 03 - 04)));

        let response = get_calendar_page(
            State(state),
            Query(CalendarQuery {
                year: Some(2025),
                month: Some(3),
            }),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let title: String = document
            .select(&Selector::parse("h1").unwrap())
            .flat_map(|h1| h1.text())
            .collect();
        assert_eq!(title, "March 2025");

        let cell = |date: &str| {
            let selector = Selector::parse(&format!("td[data-date='{date}']")).unwrap();
            document
                .select(&selector)
                .next()
                .unwrap_or_else(|| panic!("no cell for {date}"))
        };
        let text = |date: &str, part: &str| -> String {
            cell(date)
                .select(&Selector::parse(part).unwrap())
                .flat_map(|element| element.text())
                .collect()
        };

        assert_eq!(text("2025-03-03", "[data-net]"), "$500.00");
        assert_eq!(text("2025-03-04", "[data-net]"), "-$200.00");
        assert_eq!(text("2025-03-04", "[data-balance]"), "$300.00");
        assert_eq!(text("2025-03-31", "[data-balance]"), "$300.00");

        let prev = Selector::parse("a[rel=prev]").unwrap();
        let prev = document.select(&prev).next().unwrap();
        assert_eq!(prev.value().attr("href"), Some("/calendar?year=2025&month=2"));
    }

    #[tokio::test]
    async fn highlights_today() {
        let state = get_test_budget_state();

        let response = get_calendar_page(State(state), Query(CalendarQuery::default()))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let current = Selector::parse("td[aria-current=date]").unwrap();
        let cells: Vec<_> = document.select(&current).collect();
        assert_eq!(cells.len(), 1);
        assert_eq!(
            cells[0].value().attr("data-date"),
            Some(today().to_string().as_str())
        );
    }

    #[tokio::test]
    async fn invalid_month_shows_current_month() {
        let state = get_test_budget_state();

        let response = get_calendar_page(
            State(state),
            Query(CalendarQuery {
                year: Some(2025),
                month: Some(42),
            }),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        let current = Selector::parse("td[aria-current=date]").unwrap();
        assert_eq!(document.select(&current).count(), 1);
    }
}
