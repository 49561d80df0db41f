//! Database ID type definitions.

use std::{fmt::Display, num::ParseIntError, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of the spender (account holder) that owns a transaction.
pub type SpenderId = DatabaseId;

/// The storage-assigned identity of a transaction.
///
/// Clients treat the ID as an opaque string, e.g. `"1"`, so it is serialized
/// as a JSON string. Deserialization accepts either a string or an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(DatabaseId);

impl TransactionId {
    /// Wrap a raw database ID.
    pub const fn new(id: DatabaseId) -> Self {
        Self(id)
    }

    /// The raw database ID.
    pub const fn get(self) -> DatabaseId {
        self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl de::Visitor<'_> for IdVisitor {
            type Value = TransactionId;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a transaction ID as an integer or numeric string")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(TransactionId(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                i64::try_from(value)
                    .map(TransactionId)
                    .map_err(|_| E::custom(format!("transaction ID {value} is too large")))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value
                    .parse()
                    .map_err(|_| E::custom(format!("invalid transaction ID \"{value}\"")))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

impl ToSql for TransactionId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for TransactionId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        DatabaseId::column_result(value).map(Self)
    }
}
