//! The income versus expenses doughnut chart.

use charming::{
    Chart,
    component::Legend,
    element::{Color, JsFunction, Tooltip, Trigger},
    series::Pie,
};

use crate::analytics::Totals;

pub(super) const BALANCE_CHART_ID: &str = "balance-chart";

const INCOME_COLOR: &str = "#10b981";
const EXPENSE_COLOR: &str = "#ef4444";

/// A doughnut chart comparing total income with total expenses.
pub(super) fn income_expense_chart(totals: &Totals) -> Chart {
    Chart::new()
        .color(vec![Color::from(INCOME_COLOR), Color::from(EXPENSE_COLOR)])
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .formatter(percentage_formatter()),
        )
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Income vs expenses")
                .radius(vec!["45%", "70%"])
                .data(vec![
                    (totals.income, "Income"),
                    (totals.expenses, "Expenses"),
                ]),
        )
}

/// Shows the amount and its share of the chart, e.g. "Income: $800.00 (80.0%)".
fn percentage_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "params",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            const percent = Number.isFinite(params.percent) ? params.percent : 0;
            return `${params.name}: ${currencyFormatter.format(params.value)} (${percent.toFixed(1)}%)`;",
    )
}
