//! The summary cards with the budget totals.

use maud::{Markup, html};

use crate::{
    analytics::{Totals, format_percent},
    html::{CARD_STYLE, balance_style, format_currency},
};

/// Cards for the total income, the total expenses and the balance.
pub(super) fn summary_cards(totals: &Totals) -> Markup {
    html! {
        div class="grid grid-cols-1 sm:grid-cols-3 gap-4 w-full"
        {
            (summary_card(
                "Total income",
                "income",
                totals.income,
                "text-green-600 dark:text-green-400",
            ))
            (summary_card(
                "Total expenses",
                "expenses",
                totals.expenses,
                "text-red-600 dark:text-red-400",
            ))
            (summary_card("Balance", "balance", totals.balance, balance_style(totals.balance)))
        }
    }
}

fn summary_card(title: &str, total: &str, amount: f64, amount_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE) data-total=(total)
        {
            h2 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (title) }
            p class={ "mt-1 text-3xl font-bold " (amount_style) } { (format_currency(amount)) }
        }
    }
}

/// How much of the income was spent, e.g. "25.0% of income spent".
pub(super) fn expense_ratio_view(totals: &Totals) -> Markup {
    html! {
        p data-expense-ratio class="text-sm text-gray-600 dark:text-gray-400"
        {
            @if totals.income > 0.0 {
                span class="font-semibold" { (format_percent(totals.expenses, totals.income)) }
                " of income spent"
            } @else if totals.expenses > 0.0 {
                "Expenses with no income to cover them"
            } @else {
                span class="font-semibold" { "0.0%" }
                " of income spent"
            }
        }
    }
}
