//! The application state: every income and expense record of the user.
//!
//! A [Budget] is a plain value. It is owned by [crate::AppState] behind a
//! mutex and passed by reference to the pure functions in [crate::analytics].
//! Mutations never touch storage; persisting and announcing changes is the
//! job of the caller (see [crate::app_state::BudgetState::commit]).

use std::mem;

use time::OffsetDateTime;

use crate::{
    Error,
    analytics::Totals,
    record::{NewRecord, Record, RecordId, RecordKind},
};

/// The income and expense records of the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Budget {
    income: Vec<Record>,
    expenses: Vec<Record>,
}

impl Budget {
    /// Create an empty budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// The income records in the order they were added.
    pub fn income(&self) -> &[Record] {
        &self.income
    }

    /// The expense records in the order they were added.
    pub fn expenses(&self) -> &[Record] {
        &self.expenses
    }

    /// The records of the given `kind`.
    pub fn records(&self, kind: RecordKind) -> &[Record] {
        match kind {
            RecordKind::Income => &self.income,
            RecordKind::Expense => &self.expenses,
        }
    }

    /// All records, income first.
    pub fn all_records(&self) -> impl Iterator<Item = &Record> {
        self.income.iter().chain(self.expenses.iter())
    }

    /// The total number of records.
    pub fn len(&self) -> usize {
        self.income.len() + self.expenses.len()
    }

    /// Whether the budget has no records at all.
    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expenses.is_empty()
    }

    /// Find the record with the given `id`.
    pub fn find(&self, id: &RecordId) -> Option<&Record> {
        self.all_records().find(|record| record.id() == id)
    }

    /// Validate `new_record`, give it a fresh ID and add it to the budget.
    ///
    /// # Errors
    /// Returns the validation error from [NewRecord::finalize].
    pub fn add(&mut self, new_record: NewRecord, now: OffsetDateTime) -> Result<Record, Error> {
        let mut id = RecordId::generate(now);

        while self.find(&id).is_some() {
            id = RecordId::generate(now);
        }

        let record = new_record.finalize(id, now)?;
        self.insert(record.clone())?;

        Ok(record)
    }

    /// Add an existing record to the list matching its kind.
    ///
    /// # Errors
    /// Returns [Error::DuplicateRecordId] if a record with the same ID exists.
    pub fn insert(&mut self, record: Record) -> Result<(), Error> {
        if self.find(record.id()).is_some() {
            return Err(Error::DuplicateRecordId(record.id().clone()));
        }

        match record.kind() {
            RecordKind::Income => self.income.push(record),
            RecordKind::Expense => self.expenses.push(record),
        }

        Ok(())
    }

    /// Remove the record with the given `id`, keeping the order of the rest.
    ///
    /// # Errors
    /// Returns [Error::RecordNotFound] if no record has the ID.
    pub fn remove(&mut self, id: &RecordId) -> Result<Record, Error> {
        for list in [&mut self.income, &mut self.expenses] {
            if let Some(position) = list.iter().position(|record| record.id() == id) {
                return Ok(list.remove(position));
            }
        }

        Err(Error::RecordNotFound(id.clone()))
    }

    /// Remove every record, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.len();
        self.income.clear();
        self.expenses.clear();
        count
    }

    /// Swap the contents of the budget for `other`, returning the old contents.
    pub fn replace(&mut self, other: Budget) -> Budget {
        mem::replace(self, other)
    }

    /// The income, expense and balance totals over every record.
    pub fn totals(&self) -> Totals {
        Totals::new(&self.income, &self.expenses)
    }
}
