//! Narrowing the records shown to the user.

use serde::{Deserialize, Serialize};

use crate::{
    analytics::DateRange,
    record::{Record, RecordKind},
};

/// The label used for records without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Criteria a record must meet to be displayed. Unset criteria match every
/// record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Inclusive range of calendar dates.
    pub range: Option<DateRange>,
    pub kind: Option<RecordKind>,
    /// Case-insensitive category name, [UNCATEGORIZED] matches records
    /// without a category.
    pub category: Option<String>,
    /// Case-insensitive text to look for in the description or category.
    pub search: Option<String>,
}

/// The filter fields that come from the filter bar, see [RecordFilter].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<RecordKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl RecordFilter {
    /// Combine the filter bar input with a resolved date range.
    pub fn from_query(query: &FilterQuery, range: Option<DateRange>) -> Self {
        Self {
            range,
            kind: query.kind,
            category: non_blank(query.category.as_deref()),
            search: non_blank(query.search.as_deref()),
        }
    }

    /// Whether `record` meets every criterion.
    pub fn matches(&self, record: &Record) -> bool {
        if self
            .range
            .is_some_and(|range| !range.contains(record.local_date()))
        {
            return false;
        }

        if self.kind.is_some_and(|kind| kind != record.kind()) {
            return false;
        }

        if self
            .category
            .as_deref()
            .is_some_and(|category| !category_matches(category, record.category()))
        {
            return false;
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_description = record.description().to_lowercase().contains(&needle);
            let in_category = record
                .category()
                .is_some_and(|category| category.to_lowercase().contains(&needle));

            if !in_description && !in_category {
                return false;
            }
        }

        true
    }

    /// The records that meet every criterion, newest first. Records on the
    /// same date and time are ordered by ID.
    pub fn apply<'a>(&self, records: impl IntoIterator<Item = &'a Record>) -> Vec<&'a Record> {
        let mut matching: Vec<&Record> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect();

        matching.sort_by(|a, b| b.date().cmp(&a.date()).then_with(|| a.id().cmp(b.id())));

        matching
    }
}

/// The label a record is grouped under: its category or [UNCATEGORIZED].
pub fn category_label(category: Option<&str>) -> &str {
    category.unwrap_or(UNCATEGORIZED)
}

/// The distinct category labels used by `records`, sorted alphabetically
/// ignoring case.
pub fn category_labels<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();

    for record in records {
        let label = category_label(record.category());

        if !labels.iter().any(|known| known.eq_ignore_ascii_case(label)) {
            labels.push(label.to_owned());
        }
    }

    labels.sort_by_key(|label| label.to_lowercase());
    labels
}

fn category_matches(wanted: &str, category: Option<&str>) -> bool {
    match category {
        Some(category) => category.to_lowercase() == wanted.to_lowercase(),
        None => wanted.eq_ignore_ascii_case(UNCATEGORIZED),
    }
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}
