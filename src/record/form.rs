//! The forms for entering income and expense records.

use maud::{Markup, html};
use time::Date;

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    record::{MAX_AMOUNT, RecordKind},
};

/// A form that posts a new record of `kind` and reports the result in the
/// alert container.
///
/// `categories` are offered as suggestions, any other category can be typed
/// in.
pub(crate) fn record_form(kind: RecordKind, max_date: Date, categories: &[String]) -> Markup {
    let prefix = kind.as_query_value();
    let id = |field: &str| format!("{prefix}-{field}");
    let datalist_id = id("categories");
    let (title, description_placeholder, category_placeholder) = match kind {
        RecordKind::Income => ("Add income", "e.g. Salary", "e.g. Work"),
        RecordKind::Expense => ("Add expense", "e.g. Weekly shop", "e.g. Groceries"),
    };

    html! {
        form
            hx-post=(endpoints::RECORDS_API)
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            hx-on::after-request="if (event.detail.successful) this.reset()"
            class={ (CARD_STYLE) " space-y-4" }
            data-record-kind=(prefix)
        {
            h2 class="text-lg font-semibold text-gray-900 dark:text-white" { (title) }

            input type="hidden" name="kind" value=(prefix);

            div
            {
                label for=(id("description")) class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id=(id("description"))
                    type="text"
                    placeholder=(description_placeholder)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for=(id("amount")) class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id=(id("amount"))
                        type="number"
                        step="0.01"
                        min="0.01"
                        max=(MAX_AMOUNT)
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for=(id("date")) class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id=(id("date"))
                    type="date"
                    max=(max_date)
                    value=(max_date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for=(id("category")) class=(FORM_LABEL_STYLE) { "Category (optional)" }

                input
                    name="category"
                    id=(id("category"))
                    type="text"
                    list=(datalist_id)
                    placeholder=(category_placeholder)
                    class=(FORM_TEXT_INPUT_STYLE);

                datalist id=(datalist_id)
                {
                    @for category in categories {
                        option value=(category) {}
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (title) }
        }
    }
}
