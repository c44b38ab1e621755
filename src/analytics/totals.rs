//! Sums, balances and percentages over records.

use crate::record::{Record, RecordKind};

/// The sum of income, the sum of expenses and their difference.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts.
    pub expenses: f64,
    /// Income minus expenses.
    pub balance: f64,
}

impl Totals {
    /// Compute the totals from separate income and expense records.
    pub fn new<'a>(
        income: impl IntoIterator<Item = &'a Record>,
        expenses: impl IntoIterator<Item = &'a Record>,
    ) -> Self {
        Self::from_sums(total(income), total(expenses))
    }

    /// Compute the totals from records of both kinds.
    pub fn from_mixed<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let (income, expenses) =
            records
                .into_iter()
                .fold((0.0, 0.0), |(income, expenses), record| match record.kind() {
                    RecordKind::Income => (income + record.amount(), expenses),
                    RecordKind::Expense => (income, expenses + record.amount()),
                });

        Self::from_sums(income, expenses)
    }

    fn from_sums(income: f64, expenses: f64) -> Self {
        Self {
            income,
            expenses,
            balance: income - expenses,
        }
    }

    /// Expenses as a percentage of income, zero when there is no income.
    pub fn expense_ratio(&self) -> f64 {
        percent_of(self.expenses, self.income)
    }
}

/// The sum of the amounts of `records`, zero for no records.
pub fn total<'a>(records: impl IntoIterator<Item = &'a Record>) -> f64 {
    records.into_iter().map(Record::amount).sum()
}

/// `value` as a percentage of `total`, zero when `total` is zero.
pub fn percent_of(value: f64, total: f64) -> f64 {
    if total == 0.0 || !total.is_finite() {
        0.0
    } else {
        value / total * 100.0
    }
}

/// `value` as a percentage of `total` with one decimal place, e.g. "37.5%".
pub fn format_percent(value: f64, total: f64) -> String {
    format!("{:.1}%", percent_of(value, total))
}
