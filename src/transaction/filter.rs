//! Turns raw query string filters into a validated set of equality predicates.

use serde::Deserialize;

use crate::{Error, database_id::SpenderId, transaction::Transaction};

/// The raw, string-typed filters as they arrive in a query string.
///
/// Empty strings are treated the same as absent fields.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawFilters {
    /// Match transactions on this date, e.g. "2024-04-30".
    pub date: Option<String>,
    /// Match transactions with exactly this amount.
    pub amount: Option<String>,
    /// Match transactions with exactly this category.
    pub category: Option<String>,
    /// Match transactions with exactly this type label.
    pub transaction_type: Option<String>,
}

/// A single equality predicate. Each variant carries the value to bind.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `date = ?`, compared as `YYYY-MM-DD` text.
    Date(String),
    /// `amount = ?`
    Amount(f64),
    /// `category = ?`
    Category(String),
    /// `transaction_type = ?`
    TransactionType(String),
    /// `spender_id = ?`
    Spender(SpenderId),
}

impl Predicate {
    /// Whether `transaction` satisfies the predicate.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            Predicate::Date(date) => transaction.date.to_string() == *date,
            Predicate::Amount(amount) => transaction.amount == *amount,
            Predicate::Category(category) => transaction.category == *category,
            Predicate::TransactionType(transaction_type) => {
                transaction.transaction_type == *transaction_type
            }
            Predicate::Spender(spender_id) => transaction.spender_id == *spender_id,
        }
    }
}

/// The conjunction of zero or more [Predicate]s.
///
/// An empty filter set matches every transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
}

impl FilterSet {
    /// A filter set that matches every transaction.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter set that matches the transactions owned by `spender_id`.
    pub fn for_spender(spender_id: SpenderId) -> Self {
        Self {
            predicates: vec![Predicate::Spender(spender_id)],
        }
    }

    /// Validate `raw` filters.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmountFormat] if the amount filter is present
    /// but is not a finite number.
    pub fn parse(raw: &RawFilters) -> Result<Self, Error> {
        let mut predicates = Vec::new();

        if let Some(date) = non_empty(&raw.date) {
            predicates.push(Predicate::Date(date.to_owned()));
        }

        if let Some(amount) = non_empty(&raw.amount) {
            let amount = amount
                .parse::<f64>()
                .ok()
                .filter(|amount| amount.is_finite())
                .ok_or(Error::InvalidAmountFormat)?;
            predicates.push(Predicate::Amount(amount));
        }

        if let Some(category) = non_empty(&raw.category) {
            predicates.push(Predicate::Category(category.to_owned()));
        }

        if let Some(transaction_type) = non_empty(&raw.transaction_type) {
            predicates.push(Predicate::TransactionType(transaction_type.to_owned()));
        }

        Ok(Self { predicates })
    }

    /// The predicates in the order they were added.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Whether `transaction` satisfies every predicate.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches(transaction))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
