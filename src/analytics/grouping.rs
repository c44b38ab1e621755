//! Grouping records by category and by time bucket.

use std::collections::HashMap;

use serde::Deserialize;
use time::{Date, Duration};

use crate::{
    analytics::{
        DateRange, UNCATEGORIZED, category_label, month_bounds, percent_of, week_bounds,
    },
    record::Record,
};

/// The total of one category within a group of records.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub label: String,
    pub total: f64,
    pub count: usize,
    /// The share of the group total, between 0 and 100.
    pub percent: f64,
}

/// Sum `records` per category, largest total first with [UNCATEGORIZED] last.
///
/// Categories are compared ignoring case; the first spelling seen is used as
/// the label.
pub fn group_by_category<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<CategoryTotal> {
    let mut by_key: HashMap<String, CategoryTotal> = HashMap::new();
    let mut group_total = 0.0;

    for record in records {
        let label = category_label(record.category());
        let entry = by_key
            .entry(label.to_lowercase())
            .or_insert_with(|| CategoryTotal {
                label: label.to_owned(),
                total: 0.0,
                count: 0,
                percent: 0.0,
            });

        entry.total += record.amount();
        entry.count += 1;
        group_total += record.amount();
    }

    let mut categories: Vec<CategoryTotal> = by_key
        .into_values()
        .map(|category| CategoryTotal {
            percent: percent_of(category.total, group_total),
            ..category
        })
        .collect();

    categories.sort_by(|a, b| {
        let a_uncategorized = a.label == UNCATEGORIZED;
        let b_uncategorized = b.label == UNCATEGORIZED;

        a_uncategorized
            .cmp(&b_uncategorized)
            .then_with(|| {
                b.total
                    .partial_cmp(&a.total)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.label.cmp(&b.label))
    });

    categories
}

/// The length of time that records are grouped into for trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    Day,
    /// Monday to Sunday.
    #[default]
    Week,
    Month,
}

impl Bucket {
    pub const ALL: [Self; 3] = [Self::Day, Self::Week, Self::Month];

    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Daily",
            Self::Week => "Weekly",
            Self::Month => "Monthly",
        }
    }

    /// The bucket that contains `date`.
    pub fn range_of(self, date: Date) -> DateRange {
        match self {
            Self::Day => DateRange {
                start: date,
                end: date,
            },
            Self::Week => week_bounds(date),
            Self::Month => month_bounds(date),
        }
    }
}

/// The income and expenses within one time bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketTotals {
    pub start: Date,
    pub end: Date,
    pub income: f64,
    pub expenses: f64,
    /// Income minus expenses.
    pub net: f64,
}

/// Sum income and expenses per time bucket, oldest bucket first.
///
/// Only buckets that contain at least one record are returned.
pub fn group_by_bucket<'a>(
    income: impl IntoIterator<Item = &'a Record>,
    expenses: impl IntoIterator<Item = &'a Record>,
    bucket: Bucket,
) -> Vec<BucketTotals> {
    let mut by_start: HashMap<Date, BucketTotals> = HashMap::new();

    for record in income {
        let totals = bucket_entry(&mut by_start, bucket, record.local_date());
        totals.income += record.amount();
        totals.net += record.amount();
    }

    for record in expenses {
        let totals = bucket_entry(&mut by_start, bucket, record.local_date());
        totals.expenses += record.amount();
        totals.net -= record.amount();
    }

    let mut buckets: Vec<BucketTotals> = by_start.into_values().collect();
    buckets.sort_by_key(|totals| totals.start);
    buckets
}

fn bucket_entry(
    by_start: &mut HashMap<Date, BucketTotals>,
    bucket: Bucket,
    date: Date,
) -> &mut BucketTotals {
    let range = bucket.range_of(date);

    by_start.entry(range.start).or_insert(BucketTotals {
        start: range.start,
        end: range.end,
        income: 0.0,
        expenses: 0.0,
        net: 0.0,
    })
}

/// The cumulative net at the end of each bucket.
pub fn running_balances(buckets: &[BucketTotals]) -> Vec<f64> {
    buckets
        .iter()
        .scan(0.0, |balance, bucket| {
            *balance += bucket.net;
            Some(*balance)
        })
        .collect()
}

/// Every date from `range.start` to `range.end`, inclusive.
pub(crate) fn days_in(range: DateRange) -> impl Iterator<Item = Date> {
    let length = (range.end - range.start).whole_days().max(-1) + 1;

    (0..length).map(move |offset| range.start + Duration::days(offset))
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::{
        analytics::DateRange,
        budget::Budget,
        record::{NewRecord, Record, RecordKind, StoredRecord},
    };

    use super::{
        Bucket, BucketTotals, days_in, group_by_bucket, group_by_category, running_balances,
    };

    fn expenses_budget() -> Budget {
        let now = datetime!(2025-10-20 12:00:00 UTC);
        let mut budget = Budget::new();

        for (description, amount, category) in [
            ("Rent", 800.0, Some("Housing")),
            ("Groceries", 120.0, Some("Food")),
            ("Takeaway", 30.0, Some("food")),
            ("Bus", 50.0, None),
        ] {
            let mut new_record = NewRecord::expense(description, amount, date!(2025 - 10 - 01));
            if let Some(category) = category {
                new_record = new_record.category(category);
            }
            budget.add(new_record, now).unwrap();
        }

        budget
    }

    #[test]
    fn groups_by_category_with_uncategorized_last() {
        let budget = expenses_budget();

        let categories = group_by_category(budget.expenses());

        let labels: Vec<_> = categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Housing", "Food", "Uncategorized"]);
        assert_eq!(categories[1].total, 150.0);
        assert_eq!(categories[1].count, 2);
        assert_eq!(categories[0].percent, 80.0);
        assert_eq!(categories[2].percent, 5.0);
    }

    #[test]
    fn group_by_category_of_nothing_is_empty() {
        let budget = Budget::new();

        assert!(group_by_category(budget.expenses()).is_empty());
    }

    #[test]
    fn groups_by_week_starting_monday() {
        let now = datetime!(2025-10-20 12:00:00 UTC);
        let mut budget = Budget::new();
        budget
            .add(NewRecord::income("Pay", 1000.0, date!(2025 - 10 - 05)), now)
            .unwrap();
        budget
            .add(NewRecord::expense("Rent", 400.0, date!(2025 - 10 - 06)), now)
            .unwrap();
        budget
            .add(NewRecord::expense("Food", 100.0, date!(2025 - 10 - 12)), now)
            .unwrap();

        let buckets = group_by_bucket(budget.income(), budget.expenses(), Bucket::Week);

        assert_eq!(
            buckets,
            vec![
                BucketTotals {
                    start: date!(2025 - 09 - 29),
                    end: date!(2025 - 10 - 05),
                    income: 1000.0,
                    expenses: 0.0,
                    net: 1000.0,
                },
                BucketTotals {
                    start: date!(2025 - 10 - 06),
                    end: date!(2025 - 10 - 12),
                    income: 0.0,
                    expenses: 500.0,
                    net: -500.0,
                },
            ]
        );
        assert_eq!(running_balances(&buckets), vec![1000.0, 500.0]);
    }

    #[test]
    fn groups_by_month() {
        let now = datetime!(2025-10-20 12:00:00 UTC);
        let mut budget = Budget::new();
        budget
            .add(NewRecord::income("Pay", 1000.0, date!(2025 - 09 - 30)), now)
            .unwrap();
        budget
            .add(NewRecord::income("Pay", 1000.0, date!(2025 - 10 - 01)), now)
            .unwrap();

        let buckets = group_by_bucket(budget.income(), budget.expenses(), Bucket::Month);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].end, date!(2025 - 09 - 30));
        assert_eq!(buckets[1].start, date!(2025 - 10 - 01));
    }

    #[test]
    fn buckets_records_on_last_supported_date() {
        let json = r#"{
            "id": "lnz5v2kq4f7d",
            "description": "Far future",
            "amount": 10,
            "date": "9999-12-31T12:00:00Z"
        }"#;
        let stored: StoredRecord = serde_json::from_str(json).unwrap();
        let record = Record::from_stored(stored, RecordKind::Income).unwrap();

        for bucket in Bucket::ALL {
            let buckets = group_by_bucket([&record], [], bucket);

            assert_eq!(buckets.len(), 1, "{bucket:?}");
            assert_eq!(buckets[0].end, date!(9999 - 12 - 31), "{bucket:?}");
            assert_eq!(buckets[0].income, 10.0);
        }
    }

    #[test]
    fn running_balance_of_nothing_is_empty() {
        assert!(running_balances(&[]).is_empty());
    }

    #[test]
    fn days_in_range_is_inclusive() {
        let days: Vec<_> =
            days_in(DateRange::new(date!(2025 - 02 - 27), date!(2025 - 03 - 02))).collect();

        assert_eq!(
            days,
            vec![
                date!(2025 - 02 - 27),
                date!(2025 - 02 - 28),
                date!(2025 - 03 - 01),
                date!(2025 - 03 - 02)
            ]
        );
    }
}
