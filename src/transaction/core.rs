//! Defines the core data models for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    database_id::{SpenderId, TransactionId},
    db::{CreateTable, MapRow},
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where a spender either spent or earned money.
///
/// The amount is always a non-negative magnitude. Whether it adds to or
/// subtracts from the spender's balance is decided by `transaction_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID assigned by storage when the transaction was created.
    pub id: TransactionId,
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// A free-text label, e.g. "Food" or "Salary".
    pub category: String,
    /// The type label, either "income" or "expense".
    ///
    /// Kept as text because rows written before the type constraint existed
    /// may hold other labels. Use [TransactionKind::classify] to interpret it.
    pub transaction_type: String,
    /// The spender that owns this transaction.
    pub spender_id: SpenderId,
    /// An optional note, empty when not given.
    pub note: String,
    /// An optional URI to a receipt image, empty when not given.
    pub image_url: String,
}

/// The client supplied fields of a transaction, used for both create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionBody {
    /// When the transaction happened.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// A free-text label.
    pub category: String,
    /// Either "income" or "expense".
    pub transaction_type: String,
    /// The spender that owns the transaction.
    pub spender_id: SpenderId,
    /// An optional note.
    #[serde(default)]
    pub note: String,
    /// An optional URI to a receipt image.
    #[serde(default)]
    pub image_url: String,
}

impl TransactionBody {
    /// Attach a storage-assigned `id`, giving the persisted representation.
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            date: self.date,
            amount: self.amount,
            category: self.category,
            transaction_type: self.transaction_type,
            spender_id: self.spender_id,
            note: self.note,
            image_url: self.image_url,
        }
    }
}

/// Which summary bucket a transaction's amount counts towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionKind {
    /// Interpret a type label case-insensitively.
    ///
    /// Returns `None` for labels that are neither "income" nor "expense".
    pub fn classify(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("income") {
            Some(Self::Income)
        } else if label.eq_ignore_ascii_case("expense") {
            Some(Self::Expense)
        } else {
            None
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The transaction columns in the order expected by [MapRow].
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, date, amount, category, transaction_type, spender_id, note, image_url";

impl CreateTable for Transaction {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount >= 0),
                category TEXT NOT NULL,
                transaction_type TEXT NOT NULL
                    CHECK (LOWER(transaction_type) IN ('income', 'expense')),
                spender_id INTEGER NOT NULL,
                note TEXT NOT NULL DEFAULT '',
                image_url TEXT NOT NULL DEFAULT '',
                FOREIGN KEY(spender_id) REFERENCES spender(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
            (),
        )?;

        // Used by the per-spender listing and summary.
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transaction_spender ON \"transaction\"(spender_id, id);",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Transaction {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(offset)?,
            date: row.get(offset + 1)?,
            amount: row.get(offset + 2)?,
            category: row.get(offset + 3)?,
            transaction_type: row.get(offset + 4)?,
            spender_id: row.get(offset + 5)?,
            note: row.get(offset + 6)?,
            image_url: row.get(offset + 7)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use crate::database_id::TransactionId;

    use super::{TransactionBody, TransactionKind};

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(
            TransactionKind::classify("Income"),
            Some(TransactionKind::Income)
        );
        assert_eq!(
            TransactionKind::classify("EXPENSE"),
            Some(TransactionKind::Expense)
        );
        assert_eq!(TransactionKind::classify("refund"), None);
        assert_eq!(TransactionKind::classify(""), None);
    }

    #[test]
    fn body_deserializes_with_optional_fields_missing() {
        let body: TransactionBody = serde_json::from_value(json!({
            "date": "2021-08-01",
            "amount": 1000,
            "category": "food",
            "transaction_type": "expense",
            "spender_id": 1
        }))
        .unwrap();

        assert_eq!(body.date, date!(2021 - 08 - 01));
        assert_eq!(body.amount, 1000.0);
        assert_eq!(body.note, "");
        assert_eq!(body.image_url, "");
    }

    #[test]
    fn transaction_serializes_with_wire_field_names() {
        let transaction = TransactionBody {
            date: date!(2021 - 08 - 01),
            amount: 1000.0,
            category: "food".to_owned(),
            transaction_type: "expense".to_owned(),
            spender_id: 1,
            note: "lunch".to_owned(),
            image_url: "http://image.com".to_owned(),
        }
        .into_transaction(TransactionId::new(1));

        let got = serde_json::to_value(&transaction).unwrap();

        assert_eq!(
            got,
            json!({
                "id": "1",
                "date": "2021-08-01",
                "amount": 1000.0,
                "category": "food",
                "transaction_type": "expense",
                "spender_id": 1,
                "note": "lunch",
                "image_url": "http://image.com"
            })
        );
    }
}
