//! Lays out the days of a month in Monday-first weeks.

use std::collections::HashMap;

use time::{Date, Month};

use crate::{
    analytics::{DateRange, Totals, days_in, month_bounds, week_bounds},
    budget::Budget,
    record::RecordKind,
};

/// The totals of a single day in the calendar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDay {
    pub date: Date,
    /// Whether the day belongs to the displayed month rather than padding
    /// the first or last week.
    pub in_month: bool,
    pub income: f64,
    pub expenses: f64,
    /// Income minus expenses for the day.
    pub net: f64,
    /// The balance of every record up to and including this day.
    pub balance: f64,
}

impl CalendarDay {
    /// Whether any record is dated on this day.
    pub fn has_records(&self) -> bool {
        self.income != 0.0 || self.expenses != 0.0
    }
}

/// The weeks of a month, Monday first, padded with days from the
/// neighbouring months.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCalendar {
    pub year: i32,
    pub month: Month,
    pub weeks: Vec<[CalendarDay; 7]>,
}

impl MonthCalendar {
    /// Build the calendar for `month` of `year` from the records in `budget`.
    ///
    /// Returns `None` if the year is outside the range of supported dates.
    pub fn build(year: i32, month: Month, budget: &Budget) -> Option<Self> {
        // The padding days of the first and last supported years are not
        // valid dates.
        if year <= Date::MIN.year() || year >= Date::MAX.year() {
            return None;
        }

        let first_day = Date::from_calendar_date(year, month, 1).ok()?;
        let month_range = month_bounds(first_day);
        let grid = DateRange {
            start: week_bounds(month_range.start).start,
            end: week_bounds(month_range.end).end,
        };

        let mut daily: HashMap<Date, (f64, f64)> = HashMap::new();
        let mut balance = 0.0;

        for record in budget.all_records() {
            let date = record.local_date();
            let signed_amount = match record.kind() {
                RecordKind::Income => record.amount(),
                RecordKind::Expense => -record.amount(),
            };

            if date < grid.start {
                balance += signed_amount;
                continue;
            }

            let (income, expenses) = daily.entry(date).or_default();
            match record.kind() {
                RecordKind::Income => *income += record.amount(),
                RecordKind::Expense => *expenses += record.amount(),
            }
        }

        let days: Vec<CalendarDay> = days_in(grid)
            .map(|date| {
                let (income, expenses) = daily.get(&date).copied().unwrap_or_default();
                let net = income - expenses;
                balance += net;

                CalendarDay {
                    date,
                    in_month: month_range.contains(date),
                    income,
                    expenses,
                    net,
                    balance,
                }
            })
            .collect();

        let weeks = days
            .chunks_exact(7)
            .filter_map(|week| <[CalendarDay; 7]>::try_from(week).ok())
            .collect();

        Some(Self { year, month, weeks })
    }

    /// The totals of the days in the month, excluding the padding days.
    pub fn totals(&self) -> Totals {
        let (income, expenses) = self
            .days()
            .filter(|day| day.in_month)
            .fold((0.0, 0.0), |(income, expenses), day| {
                (income + day.income, expenses + day.expenses)
            });

        Totals {
            income,
            expenses,
            balance: income - expenses,
        }
    }

    /// Every day in the grid, in order.
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.weeks.iter().flatten()
    }

    /// The year and month before this one.
    pub fn previous_month(&self) -> (i32, Month) {
        match self.month {
            Month::January => (self.year - 1, Month::December),
            month => (self.year, month.previous()),
        }
    }

    /// The year and month after this one.
    pub fn next_month(&self) -> (i32, Month) {
        match self.month {
            Month::December => (self.year + 1, Month::January),
            month => (self.year, month.next()),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::{
        Month, Weekday,
        macros::{date, datetime},
    };

    use crate::{budget::Budget, record::NewRecord};

    use super::MonthCalendar;

    fn budget() -> Budget {
        let now = datetime!(2025-11-20 12:00:00 UTC);
        let mut budget = Budget::new();

        for new_record in [
            NewRecord::income("Savings", 1000.0, date!(2025 - 09 - 15)),
            NewRecord::income("Salary", 500.0, date!(2025 - 10 - 01)),
            NewRecord::expense("Rent", 200.0, date!(2025 - 10 - 01)),
            NewRecord::expense("Food", 50.0, date!(2025 - 10 - 10)),
            NewRecord::expense("Later", 25.0, date!(2025 - 11 - 01)),
        ] {
            budget.add(new_record, now).unwrap();
        }

        budget
    }

    #[test]
    fn weeks_start_on_monday_and_cover_month() {
        let calendar = MonthCalendar::build(2025, Month::October, &Budget::new()).unwrap();

        // 1 Oct 2025 is a Wednesday and 31 Oct 2025 is a Friday.
        assert_eq!(calendar.weeks.len(), 5);
        assert_eq!(calendar.weeks[0][0].date, date!(2025 - 09 - 29));
        assert_eq!(calendar.weeks[4][6].date, date!(2025 - 11 - 02));
        assert!(
            calendar
                .weeks
                .iter()
                .all(|week| week[0].date.weekday() == Weekday::Monday)
        );
        assert_eq!(calendar.days().filter(|day| day.in_month).count(), 31);
        assert!(!calendar.weeks[0][0].in_month);
        assert!(calendar.weeks[0][2].in_month);
    }

    #[test]
    fn running_balance_includes_earlier_records() {
        let calendar = MonthCalendar::build(2025, Month::October, &budget()).unwrap();
        let day = |date| {
            calendar
                .days()
                .find(|day| day.date == date)
                .copied()
                .unwrap()
        };

        let padding = day(date!(2025 - 09 - 29));
        assert_eq!(padding.balance, 1000.0);
        assert_eq!(padding.net, 0.0);

        let first = day(date!(2025 - 10 - 01));
        assert_eq!(first.income, 500.0);
        assert_eq!(first.expenses, 200.0);
        assert_eq!(first.net, 300.0);
        assert_eq!(first.balance, 1300.0);
        assert!(first.has_records());

        assert_eq!(day(date!(2025 - 10 - 10)).balance, 1250.0);
        assert_eq!(day(date!(2025 - 10 - 31)).balance, 1250.0);
        assert_eq!(day(date!(2025 - 11 - 01)).balance, 1225.0);
    }

    #[test]
    fn totals_exclude_padding_days() {
        let calendar = MonthCalendar::build(2025, Month::October, &budget()).unwrap();

        let totals = calendar.totals();

        assert_eq!(totals.income, 500.0);
        assert_eq!(totals.expenses, 250.0);
        assert_eq!(totals.balance, 250.0);
    }

    #[test]
    fn steps_between_years() {
        let january = MonthCalendar::build(2025, Month::January, &Budget::new()).unwrap();
        let december = MonthCalendar::build(2025, Month::December, &Budget::new()).unwrap();

        assert_eq!(january.previous_month(), (2024, Month::December));
        assert_eq!(january.next_month(), (2025, Month::February));
        assert_eq!(december.next_month(), (2026, Month::January));
    }

    #[test]
    fn unsupported_year_has_no_calendar() {
        assert!(MonthCalendar::build(i32::MAX, Month::January, &Budget::new()).is_none());
    }
}
