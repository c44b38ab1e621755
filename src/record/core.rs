//! Defines the core data model for income and expense records.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, record::RecordId};

// ============================================================================
// MODELS
// ============================================================================

/// The largest amount a single record may have.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// Whether a record is money earned or money spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Money earned, e.g. a salary.
    #[serde(alias = "ingreso")]
    Income,
    /// Money spent, e.g. rent.
    #[serde(alias = "gasto")]
    Expense,
}

impl RecordKind {
    /// The value used for this kind in query strings and form fields.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// A human readable, singular label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// A human readable, plural label.
    pub fn plural_label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expenses",
        }
    }
}

/// A single user-entered monetary transaction.
///
/// Records are never edited: the amount is always positive and the kind is
/// fixed when the record is created. To create a record use [NewRecord].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    id: RecordId,
    description: String,
    amount: f64,
    #[serde(with = "time::serde::rfc3339")]
    date: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    kind: RecordKind,
}

impl Record {
    /// The unique ID of the record.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// A text description of what the record was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The amount of money earned or spent, always greater than zero.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// When the money was earned or spent.
    pub fn date(&self) -> OffsetDateTime {
        self.date
    }

    /// The calendar date of the record in the offset it was recorded in.
    pub fn local_date(&self) -> Date {
        self.date.date()
    }

    /// The user supplied category, e.g. "Groceries".
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether the record is income or an expense.
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Build a record from its serialized form.
    ///
    /// `list_kind` is the kind of the list the entry was stored in. An entry
    /// that declares a different kind is rejected.
    ///
    /// # Errors
    /// Returns an error describing the first invalid field.
    pub(crate) fn from_stored(stored: StoredRecord, list_kind: RecordKind) -> Result<Self, Error> {
        let id = RecordId::parse(stored.id.trim())
            .ok_or_else(|| Error::InvalidRecordId(stored.id.clone()))?;
        let description = validate_description(&stored.description)?;
        let amount = validate_amount(Some(stored.amount))?;

        if stored.kind.is_some_and(|kind| kind != list_kind) {
            return Err(Error::KindMismatch(id));
        }

        Ok(Self {
            id,
            description,
            amount,
            date: stored.date,
            category: normalize_category(stored.category),
            kind: list_kind,
        })
    }
}

/// The serialized form of a [Record] as found in saved and imported files.
///
/// Also accepts the Spanish field names used by files exported from the
/// Spanish-language version of the app.
#[derive(Debug, Deserialize)]
pub(crate) struct StoredRecord {
    id: String,
    #[serde(alias = "descripcion")]
    description: String,
    #[serde(alias = "monto")]
    amount: f64,
    #[serde(alias = "fecha", with = "time::serde::rfc3339")]
    date: OffsetDateTime,
    #[serde(default, alias = "categoria")]
    category: Option<String>,
    #[serde(default, alias = "tipo")]
    kind: Option<RecordKind>,
}

/// The user input for creating a new [Record].
///
/// Fields are optional so that missing input can be reported as a validation
/// error rather than a parsing error.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// let new_record = NewRecord::expense("Groceries run", 54.20, date!(2025 - 01 - 15))
///     .category("Groceries");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// Whether the record is income or an expense.
    pub kind: RecordKind,
    /// A text description, must not be empty after trimming.
    pub description: String,
    /// The amount, must be greater than zero and at most [MAX_AMOUNT].
    pub amount: Option<f64>,
    /// The calendar date of the record, must not be in the future.
    pub date: Option<Date>,
    /// An optional category. Blank categories are ignored.
    pub category: Option<String>,
}

impl NewRecord {
    /// Shortcut for creating a new income record.
    pub fn income(description: &str, amount: f64, date: Date) -> Self {
        Self {
            kind: RecordKind::Income,
            description: description.to_owned(),
            amount: Some(amount),
            date: Some(date),
            category: None,
        }
    }

    /// Shortcut for creating a new expense record.
    pub fn expense(description: &str, amount: f64, date: Date) -> Self {
        Self {
            kind: RecordKind::Expense,
            description: description.to_owned(),
            amount: Some(amount),
            date: Some(date),
            category: None,
        }
    }

    /// Set the category of the record.
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_owned());
        self
    }

    /// Validate the input and create a [Record] with the given `id`.
    ///
    /// `now` is the current local time. It is used to reject future dates and
    /// provides the time of day for the record.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyDescription] if the description is blank,
    /// - [Error::InvalidAmount] if the amount is missing, not positive or above [MAX_AMOUNT],
    /// - [Error::MissingDate] if the date is missing,
    /// - or [Error::FutureDate] if the date is after today.
    pub fn finalize(self, id: RecordId, now: OffsetDateTime) -> Result<Record, Error> {
        let description = validate_description(&self.description)?;
        let amount = validate_amount(self.amount)?;
        let date = self.date.ok_or(Error::MissingDate)?;

        if date > now.date() {
            return Err(Error::FutureDate(date));
        }

        Ok(Record {
            id,
            description,
            amount,
            date: date.with_time(now.time()).assume_offset(now.offset()),
            category: normalize_category(self.category),
            kind: self.kind,
        })
    }
}

fn validate_description(description: &str) -> Result<String, Error> {
    let description = description.trim();

    if description.is_empty() {
        Err(Error::EmptyDescription)
    } else {
        Ok(description.to_owned())
    }
}

fn validate_amount(amount: Option<f64>) -> Result<f64, Error> {
    match amount {
        Some(amount) if amount.is_finite() && amount > 0.0 && amount <= MAX_AMOUNT => Ok(amount),
        _ => Err(Error::InvalidAmount),
    }
}

fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|category| category.trim().to_owned())
        .filter(|category| !category.is_empty())
}

// ============================================================================
// TESTS
// ============================================================================
