//! The filtered income and expense lists shown on the records page.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    analytics::Totals,
    endpoints::{self, format_endpoint},
    events::BUDGET_CHANGED,
    html::{
        BUTTON_DELETE_STYLE, CARD_STYLE, CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, balance_style, format_currency,
    },
    record::{Record, RecordKind},
};

/// The max number of graphemes to display in the record table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// The id of the element that holds the record lists.
pub(crate) const RECORDS_CONTENT_ID: &str = "records-content";

/// The attribute value that makes a partial re-fetch itself when the budget
/// changes, either from this page or from another tab.
pub(crate) fn refresh_trigger() -> String {
    format!("{BUDGET_CHANGED} from:body, sse:{BUDGET_CHANGED}")
}

/// The data shown in the record lists.
pub(crate) struct RecordsContent<'a> {
    /// The query string that reproduces the current period and filters.
    pub query: String,
    pub income: Vec<&'a Record>,
    pub expenses: Vec<&'a Record>,
    /// Whether any record exists before filtering.
    pub has_records: bool,
}

/// The totals card and the income and expense tables.
///
/// The element re-fetches itself with the same query whenever the budget
/// changes.
pub(crate) fn records_content_view(content: &RecordsContent<'_>) -> Markup {
    let totals = Totals::new(content.income.iter().copied(), content.expenses.iter().copied());
    let refresh_url = if content.query.is_empty() {
        endpoints::RECORDS_CONTENT.to_owned()
    } else {
        format!("{}?{}", endpoints::RECORDS_CONTENT, content.query)
    };

    html! {
        div
            id=(RECORDS_CONTENT_ID)
            hx-get=(refresh_url)
            hx-trigger=(refresh_trigger())
            hx-swap="outerHTML"
            class="space-y-6"
        {
            section class={ (CARD_STYLE) " grid grid-cols-3 gap-4 text-center" } aria-label="Filtered totals"
            {
                div
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Income" }
                    p class="text-lg font-semibold text-green-600 dark:text-green-400" data-total="income"
                    { (format_currency(totals.income)) }
                }
                div
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Expenses" }
                    p class="text-lg font-semibold text-red-600 dark:text-red-400" data-total="expenses"
                    { (format_currency(totals.expenses)) }
                }
                div
                {
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Balance" }
                    p class={ "text-lg font-semibold " (balance_style(totals.balance)) } data-total="balance"
                    { (format_currency(totals.balance)) }
                }
            }

            div class="grid gap-6 lg:grid-cols-2"
            {
                (records_table(RecordKind::Income, &content.income, content.has_records))
                (records_table(RecordKind::Expense, &content.expenses, content.has_records))
            }
        }
    }
}

fn records_table(kind: RecordKind, records: &[&Record], has_records: bool) -> Markup {
    let empty_message = match (has_records, kind) {
        (false, RecordKind::Income) => "No income yet. Add your first income above.",
        (false, RecordKind::Expense) => "No expenses yet. Add your first expense above.",
        (true, _) => "No records match the current filters.",
    };

    html! {
        section class="w-full overflow-x-auto" data-record-list=(kind.as_query_value())
        {
            h2 class="text-lg font-semibold mb-2" { (kind.plural_label()) }

            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                    }
                }

                tbody
                {
                    @for record in records {
                        (record_row(record))
                    }

                    @if records.is_empty() {
                        tr
                        {
                            td colspan="4" class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            { (empty_message) }
                        }
                    }
                }
            }
        }
    }
}

fn record_row(record: &Record) -> Markup {
    let (description, full_description) = format_description(record.description());
    let amount_style = match record.kind() {
        RecordKind::Income => "px-6 py-4 text-right text-green-700 dark:text-green-300",
        RecordKind::Expense => "px-6 py-4 text-right text-red-700 dark:text-red-300",
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-record-id=(record.id())
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(record.local_date()) { (record.local_date()) }
            }

            td class=(TABLE_CELL_STYLE)
            {
                span title=[full_description] { (description) }

                @if let Some(category) = record.category() {
                    " "
                    span class=(CATEGORY_BADGE_STYLE) { (category) }
                }
            }

            td class=(amount_style) { (format_currency(record.amount())) }

            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(format_endpoint(endpoints::DELETE_RECORD, record.id().as_str()))
                    hx-confirm={
                        "Are you sure you want to delete '" (record.description()) "'? This cannot be undone."
                    }
                    hx-target="#alert-container"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::{OffsetDateTime, macros::date};

    use crate::{
        budget::Budget,
        record::NewRecord,
        test_utils::assert_valid_html,
    };

    use super::{RecordsContent, format_description, records_content_view};

    fn budget() -> Budget {
        let now = OffsetDateTime::now_utc();
        let mut budget = Budget::new();
        for new_record in [
            NewRecord::income("Salary", 500.0, date!(2025 - 10 - 01)),
            NewRecord::income("Bonus", 300.0, date!(2025 - 10 - 02)),
            NewRecord::expense("Rent", 200.0, date!(2025 - 10 - 03)).category("Housing"),
        ] {
            budget.add(new_record, now).unwrap();
        }
        budget
    }

    fn select_text(document: &Html, selector: &str) -> Vec<String> {
        document
            .select(&Selector::parse(selector).unwrap())
            .map(|element| element.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[test]
    fn shows_totals_and_rows() {
        let budget = budget();
        let content = RecordsContent {
            query: "period=all".to_owned(),
            income: budget.income().iter().collect(),
            expenses: budget.expenses().iter().collect(),
            has_records: true,
        };

        let html = records_content_view(&content).into_string();
        let document = Html::parse_fragment(&html);
        assert_valid_html(&document);

        assert_eq!(select_text(&document, "[data-total=income]"), vec!["$800.00"]);
        assert_eq!(select_text(&document, "[data-total=expenses]"), vec!["$200.00"]);
        assert_eq!(select_text(&document, "[data-total=balance]"), vec!["$600.00"]);
        assert_eq!(
            document
                .select(&Selector::parse("[data-record-list=income] tbody tr[data-record-id]").unwrap())
                .count(),
            2
        );

        let expense = &budget.expenses()[0];
        let delete_url = format!("/api/records/{}", expense.id());
        let button = document
            .select(&Selector::parse("[data-record-list=expense] button").unwrap())
            .next()
            .expect("no delete button");
        assert_eq!(button.value().attr("hx-delete"), Some(delete_url.as_str()));
        assert!(button.value().attr("hx-confirm").is_some());
    }

    #[test]
    fn refreshes_with_same_query() {
        let content = RecordsContent {
            query: "period=all&search=rent".to_owned(),
            income: vec![],
            expenses: vec![],
            has_records: true,
        };

        let html = records_content_view(&content).into_string();
        let document = Html::parse_fragment(&html);
        let container = document
            .select(&Selector::parse("#records-content").unwrap())
            .next()
            .expect("no container");

        assert_eq!(
            container.value().attr("hx-get"),
            Some("/records/content?period=all&search=rent")
        );
        assert_eq!(
            container.value().attr("hx-trigger"),
            Some("budget-changed from:body, sse:budget-changed")
        );
    }

    #[test]
    fn empty_lists_show_messages() {
        let content = RecordsContent {
            query: String::new(),
            income: vec![],
            expenses: vec![],
            has_records: false,
        };

        let html = records_content_view(&content).into_string();
        let document = Html::parse_fragment(&html);

        assert_eq!(select_text(&document, "[data-total=balance]"), vec!["$0.00"]);
        assert!(html.contains("No income yet."));
        assert!(html.contains("No expenses yet."));

        let filtered = RecordsContent {
            has_records: true,
            ..content
        };
        let html = records_content_view(&filtered).into_string();
        assert!(html.contains("No records match the current filters."));
    }

    #[test]
    fn truncates_long_descriptions() {
        let long = "ü".repeat(40);

        let (short, full) = format_description(&long);

        assert_eq!(short.chars().count(), 32);
        assert!(short.ends_with("..."));
        assert_eq!(full, Some(long.as_str()));
        assert_eq!(format_description("Rent"), ("Rent".to_owned(), None));
    }
}
