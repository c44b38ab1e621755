//! Saving the budget to and loading it from a [KeyValueStore].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::{
    Error,
    budget::Budget,
    record::{Record, RecordKind, StoredRecord},
    storage::KeyValueStore,
};

/// The key the budget is saved under.
pub const STORAGE_KEY: &str = "budget-tracker";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    income: &'a [Record],
    expenses: &'a [Record],
    #[serde(with = "time::serde::rfc3339")]
    saved_at: OffsetDateTime,
}

/// Save every record of `budget` to `store`.
///
/// # Errors
/// Returns [Error::SaveFailed] if the store could not be written. The budget
/// is left as is so the change is still visible until the app restarts.
pub fn save_budget(
    store: &dyn KeyValueStore,
    budget: &Budget,
    now: OffsetDateTime,
) -> Result<(), Error> {
    let snapshot = Snapshot {
        income: budget.income(),
        expenses: budget.expenses(),
        saved_at: now,
    };
    let json = serde_json::to_string(&snapshot)
        .map_err(|error| Error::JsonSerializationError(error.to_string()))?;

    store.set(STORAGE_KEY, &json).map_err(|error| {
        tracing::error!("Could not save budget: {error}");
        Error::SaveFailed(error.to_string())
    })
}

/// The budget read from the store and what went wrong while reading it.
#[derive(Debug, Default, PartialEq)]
pub struct LoadOutcome {
    pub budget: Budget,
    /// A message for the user if data could not be read, `None` otherwise.
    pub warning: Option<String>,
}

/// Load the budget saved by [save_budget].
///
/// Never fails: an unreadable store or malformed data results in an empty
/// budget with a warning, and invalid records are skipped with a warning.
pub fn load_budget(store: &dyn KeyValueStore) -> LoadOutcome {
    let json = match store.get(STORAGE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return LoadOutcome::default(),
        Err(error) => {
            tracing::warn!("Could not read saved budget: {error}");
            return LoadOutcome {
                budget: Budget::new(),
                warning: Some(
                    "Your saved data could not be read, starting with an empty budget.".to_owned(),
                ),
            };
        }
    };

    match parse_snapshot(&json, MissingLists::AsEmpty) {
        Ok(ParsedSnapshot { budget, skipped }) if skipped > 0 => {
            tracing::warn!("Skipped {skipped} invalid saved records");
            LoadOutcome {
                budget,
                warning: Some(format!(
                    "{skipped} saved {} could not be read and {} skipped.",
                    plural(skipped, "record", "records"),
                    plural(skipped, "was", "were"),
                )),
            }
        }
        Ok(ParsedSnapshot { budget, .. }) => {
            tracing::info!("Loaded {} records", budget.len());
            LoadOutcome {
                budget,
                warning: None,
            }
        }
        Err(error) => {
            tracing::warn!("Saved budget is malformed: {error}");
            LoadOutcome {
                budget: Budget::new(),
                warning: Some(
                    "Your saved data is corrupted, starting with an empty budget.".to_owned(),
                ),
            }
        }
    }
}

pub(crate) fn plural<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

/// The record lists of a saved or exported file. Any other fields, such as
/// the export summary, are ignored.
#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default, alias = "ingresos")]
    income: Option<Vec<Value>>,
    #[serde(default, alias = "gastos")]
    expenses: Option<Vec<Value>>,
}

/// How to treat a file without an income or expense list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MissingLists {
    /// Read a missing list as an empty list.
    AsEmpty,
    /// Reject the file with [Error::InvalidImportFormat].
    Reject,
}

/// The valid records of a file and the number of entries that were skipped.
#[derive(Debug, PartialEq)]
pub(crate) struct ParsedSnapshot {
    pub(crate) budget: Budget,
    pub(crate) skipped: usize,
}

/// Read the income and expense lists from `json`.
///
/// Entries that are not valid records, or whose ID was already seen, are
/// skipped and counted.
///
/// # Errors
/// This function will return a:
/// - [Error::NotJson] if `json` is not valid JSON,
/// - or [Error::InvalidImportFormat] if the lists are not arrays, or a list is
///   missing and `missing_lists` is [MissingLists::Reject].
pub(crate) fn parse_snapshot(json: &str, missing_lists: MissingLists) -> Result<ParsedSnapshot, Error> {
    let value: Value = serde_json::from_str(json).map_err(|_| Error::NotJson)?;
    let raw: RawSnapshot = serde_json::from_value(value)
        .map_err(|error| Error::InvalidImportFormat(error.to_string()))?;

    let (income, expenses) = match (raw.income, raw.expenses, missing_lists) {
        (Some(income), Some(expenses), _) => (income, expenses),
        (income, expenses, MissingLists::AsEmpty) => {
            (income.unwrap_or_default(), expenses.unwrap_or_default())
        }
        (None, _, MissingLists::Reject) => {
            return Err(Error::InvalidImportFormat(
                "the file has no \"income\" list".to_owned(),
            ));
        }
        (_, None, MissingLists::Reject) => {
            return Err(Error::InvalidImportFormat(
                "the file has no \"expenses\" list".to_owned(),
            ));
        }
    };

    let mut budget = Budget::new();
    let mut skipped = 0;

    for (entries, kind) in [(income, RecordKind::Income), (expenses, RecordKind::Expense)] {
        for entry in entries {
            let record = serde_json::from_value::<StoredRecord>(entry)
                .map_err(|error| Error::InvalidImportFormat(error.to_string()))
                .and_then(|stored| Record::from_stored(stored, kind))
                .and_then(|record| budget.insert(record));

            if let Err(error) = record {
                tracing::warn!("Skipping {} entry: {error}", kind.as_query_value());
                skipped += 1;
            }
        }
    }

    Ok(ParsedSnapshot { budget, skipped })
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::{
        Error,
        budget::Budget,
        record::NewRecord,
        storage::{KeyValueStore, MemoryStore},
    };

    use super::{
        LoadOutcome, MissingLists, STORAGE_KEY, load_budget, parse_snapshot, save_budget,
    };

    fn sample_budget() -> Budget {
        let now = datetime!(2025-10-05 12:00:00 UTC);
        let mut budget = Budget::new();
        budget
            .add(
                NewRecord::income("Salary", 500.0, date!(2025 - 10 - 01)).category("Work"),
                now,
            )
            .unwrap();
        budget
            .add(NewRecord::income("Gift", 300.0, date!(2025 - 10 - 02)), now)
            .unwrap();
        budget
            .add(NewRecord::expense("Rent", 200.0, date!(2025 - 10 - 03)), now)
            .unwrap();
        budget
    }

    #[test]
    fn save_then_load_restores_budget() {
        let store = MemoryStore::new();
        let budget = sample_budget();

        save_budget(&store, &budget, datetime!(2025-10-05 12:00:00 UTC)).unwrap();
        let outcome = load_budget(&store);

        assert_eq!(
            outcome,
            LoadOutcome {
                budget,
                warning: None
            }
        );
    }

    #[test]
    fn saved_json_has_lists_and_timestamp() {
        let store = MemoryStore::new();

        save_budget(&store, &sample_budget(), datetime!(2025-10-05 12:00:00 UTC)).unwrap();

        let json = store.get(STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["income"].as_array().unwrap().len(), 2);
        assert_eq!(value["expenses"].as_array().unwrap().len(), 1);
        assert_eq!(value["savedAt"], "2025-10-05T12:00:00Z");
    }

    #[test]
    fn failed_save_is_reported() {
        let store = MemoryStore::new();
        store.fail_writes(true);

        let result = save_budget(&store, &sample_budget(), datetime!(2025-10-05 12:00:00 UTC));

        assert!(matches!(result, Err(Error::SaveFailed(_))));
    }

    #[test]
    fn load_without_saved_data_is_empty_without_warning() {
        let store = MemoryStore::new();

        assert_eq!(load_budget(&store), LoadOutcome::default());
    }

    #[test]
    fn load_corrupted_data_warns() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();

        let outcome = load_budget(&store);

        assert!(outcome.budget.is_empty());
        assert!(outcome.warning.unwrap().contains("corrupted"));
    }

    #[test]
    fn load_skips_invalid_entries_and_duplicates() {
        let store = MemoryStore::new();
        let json = r#"{
            "income": [
                {"id": "a1", "description": "Salary", "amount": 500, "date": "2025-10-01T09:00:00Z"},
                {"id": "a2", "description": "", "amount": 10, "date": "2025-10-01T09:00:00Z"},
                {"id": "a1", "description": "Copy", "amount": 5, "date": "2025-10-01T09:00:00Z"}
            ],
            "expenses": [
                {"id": "b1", "description": "Rent", "amount": "lots", "date": "2025-10-01T09:00:00Z"},
                {"id": "b2", "description": "Food", "amount": 20, "date": "yesterday"},
                {"id": "b3", "description": "Bus", "amount": 3, "date": "2025-10-02T09:00:00Z"}
            ]
        }"#;
        store.set(STORAGE_KEY, json).unwrap();

        let outcome = load_budget(&store);

        assert_eq!(outcome.budget.len(), 2);
        assert_eq!(outcome.budget.income()[0].description(), "Salary");
        assert_eq!(outcome.budget.expenses()[0].description(), "Bus");
        assert_eq!(
            outcome.warning,
            Some("4 saved records could not be read and were skipped.".to_owned())
        );
    }

    #[test]
    fn load_treats_missing_list_as_empty() {
        let store = MemoryStore::new();
        store
            .set(
                STORAGE_KEY,
                r#"{"income": [{"id": "a1", "description": "Pay", "amount": 5, "date": "2025-10-01T09:00:00Z"}]}"#,
            )
            .unwrap();

        let outcome = load_budget(&store);

        assert_eq!(outcome.budget.len(), 1);
        assert_eq!(outcome.warning, None);
    }

    #[test]
    fn strict_parse_requires_both_lists() {
        let result = parse_snapshot(r#"{"income": []}"#, MissingLists::Reject);

        assert!(matches!(result, Err(Error::InvalidImportFormat(_))));
    }

    #[test]
    fn parse_rejects_non_json() {
        let result = parse_snapshot("income,expenses", MissingLists::Reject);

        assert_eq!(result, Err(Error::NotJson));
    }

    #[test]
    fn parse_rejects_lists_that_are_not_arrays() {
        let result = parse_snapshot(r#"{"income": 5, "expenses": []}"#, MissingLists::Reject);

        assert!(matches!(result, Err(Error::InvalidImportFormat(_))));
    }

    #[test]
    fn parse_accepts_spanish_keys() {
        let json = r#"{
            "ingresos": [{"id": "x1", "descripcion": "Salario", "monto": 2500, "fecha": "2023-10-20T10:00:00.000Z", "tipo": "ingreso"}],
            "gastos": [{"id": "x2", "descripcion": "Alquiler", "monto": 800, "fecha": "2023-10-22T10:00:00.000Z", "tipo": "gasto"}]
        }"#;

        let parsed = parse_snapshot(json, MissingLists::Reject).unwrap();

        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.budget.totals().balance, 1700.0);
    }
}
