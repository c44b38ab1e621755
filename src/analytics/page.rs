//! The analytics page: category breakdowns, the trend chart, summary
//! statistics and outliers for the selected period.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use charming::{
    Chart,
    component::{Axis, Grid, Legend},
    element::{AxisLabel, AxisType, Color},
    series::{Line, bar::Bar},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    analytics::{
        ActivePeriod, Bucket, BucketTotals, CategoryTotal, FilterQuery, Outlier, PeriodNavigation,
        PeriodQuery, RecordFilter, SummaryStatistics, Totals, date_bounds, find_outliers,
        format_date_label, format_percent, group_by_bucket, group_by_category, month_abbrev,
        resolve_period, running_balances, total,
    },
    app_state::BudgetState,
    budget::Budget,
    charts::{chart_view, currency_axis_tooltip, currency_formatter},
    endpoints,
    html::{
        CARD_STYLE, ECHARTS_SCRIPT, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, balance_style, base,
        format_currency,
    },
    navigation::NavBar,
    period_controls::{period_controls, period_url},
    record::{Record, RecordKind, refresh_trigger},
};

const ANALYTICS_CONTENT_ID: &str = "analytics-content";
const TREND_CHART_ID: &str = "trend-chart";

/// The length of the buckets in the trend chart.
#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    pub bucket: Option<Bucket>,
}

/// The records of the active period, split by kind.
struct PeriodRecords<'a> {
    income: Vec<&'a Record>,
    expenses: Vec<&'a Record>,
}

impl<'a> PeriodRecords<'a> {
    fn new(budget: &'a Budget, active: &ActivePeriod) -> Self {
        let filter = RecordFilter::from_query(&FilterQuery::default(), active.range);

        Self {
            income: filter.apply(budget.income()),
            expenses: filter.apply(budget.expenses()),
        }
    }

    fn of_kind(&self, kind: RecordKind) -> &[&'a Record] {
        match kind {
            RecordKind::Income => &self.income,
            RecordKind::Expense => &self.expenses,
        }
    }

    fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expenses.is_empty()
    }
}

/// Renders the analytics for the period and trend bucket in the query string.
pub async fn get_analytics_page(
    State(state): State<BudgetState>,
    Query(period_query): Query<PeriodQuery>,
    Query(trend_query): Query<TrendQuery>,
) -> Result<Response, Error> {
    let today = state.local_today()?;
    let budget = state.lock()?;
    let bucket = trend_query.bucket.unwrap_or_default();

    Ok(analytics_view(&budget, &period_query, bucket, today).into_response())
}

fn analytics_view(budget: &Budget, period_query: &PeriodQuery, bucket: Bucket, today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::ANALYTICS_VIEW).into_html();
    let active = resolve_period(period_query, today);
    let navigation = PeriodNavigation::new(&active, date_bounds(budget.all_records()), today);
    let records = PeriodRecords::new(budget, &active);
    let bucket_extra = [("bucket", bucket.as_query_value())];
    let current_url = period_url(endpoints::ANALYTICS_VIEW, &active.to_query(), &bucket_extra);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Analytics" }

                (period_controls(&active, &navigation, endpoints::ANALYTICS_VIEW, &bucket_extra))

                div
                    id=(ANALYTICS_CONTENT_ID)
                    hx-get=(current_url)
                    hx-trigger=(refresh_trigger())
                    hx-select={ "#" (ANALYTICS_CONTENT_ID) }
                    hx-swap="outerHTML"
                    class="space-y-6"
                {
                    (period_totals(&Totals::new(
                        records.income.iter().copied(),
                        records.expenses.iter().copied(),
                    )))

                    @if records.is_empty() {
                        p data-empty class="text-center text-gray-600 dark:text-gray-400"
                        {
                            "No records in this period."
                        }
                    } @else {
                        (trend_section(&records, &active, bucket))

                        div class="grid gap-6 md:grid-cols-2"
                        {
                            (category_table(RecordKind::Income, records.of_kind(RecordKind::Income)))
                            (category_table(RecordKind::Expense, records.of_kind(RecordKind::Expense)))
                        }

                        (statistics_table(&records))

                        (outliers_section(&records))
                    }
                }
            }
        }
    );

    base(
        "Analytics",
        &[HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned())],
        &content,
    )
}

fn period_totals(totals: &Totals) -> Markup {
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
                p class="text-sm" { "Balance" }
                p class={ "font-semibold " (balance_style(totals.balance)) }
                { (format_currency(totals.balance)) }
            }
        }
    }
}

fn trend_section(records: &PeriodRecords, active: &ActivePeriod, bucket: Bucket) -> Markup {
    let buckets = group_by_bucket(
        records.income.iter().copied(),
        records.expenses.iter().copied(),
        bucket,
    );
    let period_query = active.to_query();

    html! {
        div class=(CARD_STYLE)
        {
            div class="flex flex-wrap justify-between items-baseline gap-2 mb-2"
            {
                h2 class="text-lg font-semibold" { "Trend" }

                div class="flex gap-3 text-sm" aria-label="Trend bucket"
                {
                    @for option in Bucket::ALL {
                        @if option == bucket {
                            span aria-current="true" class="font-semibold" { (option.label()) }
                        } @else {
                            a
                                href=(period_url(
                                    endpoints::ANALYTICS_VIEW,
                                    &period_query,
                                    &[("bucket", option.as_query_value())],
                                ))
                                class=(LINK_STYLE)
                            { (option.label()) }
                        }
                    }
                }
            }

            (chart_view(TREND_CHART_ID, &trend_chart(&buckets, bucket)))
        }
    }
}

/// Income and expense bars per bucket with a line for the running balance.
fn trend_chart(buckets: &[BucketTotals], bucket: Bucket) -> Chart {
    let labels: Vec<String> = buckets
        .iter()
        .map(|totals| bucket_label(totals, bucket))
        .collect();
    let income: Vec<f64> = buckets.iter().map(|totals| totals.income).collect();
    let expenses: Vec<f64> = buckets.iter().map(|totals| totals.expenses).collect();
    let balances = running_balances(buckets);

    Chart::new()
        .color(vec![
            Color::from("#10b981"),
            Color::from("#ef4444"),
            Color::from("#3b82f6"),
        ])
        .tooltip(currency_axis_tooltip())
        .legend(Legend::new().top("bottom"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom(40)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Income").data(income))
        .series(Bar::new().name("Expenses").data(expenses))
        .series(Line::new().name("Balance").data(balances))
}

fn bucket_label(totals: &BucketTotals, bucket: Bucket) -> String {
    match bucket {
        Bucket::Day => format_date_label(totals.start),
        Bucket::Week => format!("Week of {}", format_date_label(totals.start)),
        Bucket::Month => format!("{} {}", month_abbrev(totals.start.month()), totals.start.year()),
    }
}

fn category_table(kind: RecordKind, records: &[&Record]) -> Markup {
    let categories: Vec<CategoryTotal> = group_by_category(records.iter().copied());
    let group_total = total(records.iter().copied());

    html! {
        section class=(CARD_STYLE) data-categories=(kind.as_query_value())
        {
            h2 class="text-lg font-semibold mb-2" { (kind.plural_label()) " by category" }

            @if categories.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400"
                { "No " (kind.plural_label().to_lowercase()) " in this period." }
            } @else {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Records" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Share" }
                        }
                    }

                    tbody
                    {
                        @for category in &categories {
                            tr class=(TABLE_ROW_STYLE) data-category=(category.label)
                            {
                                td class=(TABLE_CELL_STYLE) { (category.label) }
                                td class=(TABLE_CELL_STYLE) { (category.count) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(category.total)) }
                                td class=(TABLE_CELL_STYLE) data-share
                                { (format_percent(category.total, group_total)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn statistics_table(records: &PeriodRecords) -> Markup {
    let rows = [RecordKind::Income, RecordKind::Expense]
        .map(|kind| (kind, SummaryStatistics::new(records.of_kind(kind))));

    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-lg font-semibold mb-2" { "Summary statistics" }

            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Records" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Average" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Std. deviation" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Largest" }
                    }
                }

                tbody
                {
                    @for (kind, statistics) in rows {
                        tr class=(TABLE_ROW_STYLE) data-statistics=(kind.as_query_value())
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { (kind.plural_label()) }

                            @if let Some(statistics) = statistics {
                                td class=(TABLE_CELL_STYLE) { (statistics.count) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(statistics.mean)) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(statistics.std_dev)) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(statistics.largest)) }
                            } @else {
                                td class=(TABLE_CELL_STYLE) colspan="4" { "No records" }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn outliers_section(records: &PeriodRecords) -> Markup {
    let outliers: Vec<(RecordKind, Outlier)> = [RecordKind::Income, RecordKind::Expense]
        .into_iter()
        .flat_map(|kind| {
            find_outliers(records.of_kind(kind))
                .into_iter()
                .map(move |outlier| (kind, outlier))
        })
        .collect();

    html! {
        section class=(CARD_STYLE)
        {
            h2 class="text-lg font-semibold mb-2" { "Unusual records" }

            @if outliers.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400"
                { "Nothing unusual: every amount is within two standard deviations of the average." }
            } @else {
                ul class="space-y-2 text-sm"
                {
                    @for (kind, outlier) in &outliers {
                        li data-outlier=(outlier.record.id())
                        {
                            span class="font-semibold" { (outlier.record.description()) }
                            " ("
                            time datetime=(outlier.record.local_date())
                            { (format_date_label(outlier.record.local_date())) }
                            "): "
                            (format_currency(outlier.record.amount()))
                            ", "
                            (format!("{:.1}", outlier.z_score.abs()))
                            " standard deviations "
                            @if outlier.z_score > 0.0 { "above" } @else { "below" }
                            " the average " (kind.label().to_lowercase())
                        }
                    }
                }
            }
        }
    }
}
