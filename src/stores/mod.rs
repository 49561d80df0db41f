//! Contains traits and implementations for objects that store [transactions](crate::transaction).

mod memory;
mod transaction;

pub mod sqlite;

pub use memory::MemoryTransactionStore;
pub use sqlite::SQLiteTransactionStore;
pub use transaction::{RowsAffected, TransactionReader, TransactionStore};
