//! Defines the transaction store traits.

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{
        Transaction, TransactionBody,
        query::{CountQuery, RowQuery, TotalsQuery},
    },
};

/// The number of rows changed by a write.
pub type RowsAffected = usize;

/// Read access to transactions, bound to a single consistent snapshot.
///
/// Obtain one with [TransactionStore::read_snapshot].
pub trait TransactionReader {
    /// Call `visit` with each row matching `query`, in ID order.
    ///
    /// Stops at, and returns, the first error raised by `visit`.
    fn for_each_row(
        &self,
        query: &RowQuery,
        visit: &mut dyn FnMut(Transaction) -> Result<(), Error>,
    ) -> Result<(), Error>;

    /// Collect the rows matching `query`, in ID order.
    fn query_rows(&self, query: &RowQuery) -> Result<Vec<Transaction>, Error> {
        let mut transactions = Vec::new();

        self.for_each_row(query, &mut |transaction| {
            transactions.push(transaction);
            Ok(())
        })?;

        Ok(transactions)
    }

    /// Count the rows matching `query`.
    fn count_rows(&self, query: &CountQuery) -> Result<u64, Error>;

    /// Sum the income and expense amounts of the rows matching `query`,
    /// returned as `(total_income, total_expenses)`.
    fn sum_totals(&self, query: &TotalsQuery) -> Result<(f64, f64), Error>;
}

/// Handles the storage and retrieval of transactions.
///
/// Implementers acquire whatever connection they need per call and must
/// release it on every exit path, including errors.
pub trait TransactionStore: Clone + Send + Sync + 'static {
    /// Run `read` against a reader that sees one consistent snapshot of the
    /// store, so that several queries cannot observe different data.
    fn read_snapshot<T>(
        &self,
        read: impl FnOnce(&dyn TransactionReader) -> Result<T, Error>,
    ) -> Result<T, Error>;

    /// Insert a new transaction and return its storage-assigned ID.
    fn insert(&self, body: &TransactionBody) -> Result<TransactionId, Error>;

    /// Replace every field of the transaction `id` with `body`.
    ///
    /// Returns zero if no transaction has the ID `id`.
    fn update(&self, id: TransactionId, body: &TransactionBody) -> Result<RowsAffected, Error>;

    /// Check that the store is reachable.
    fn ping(&self) -> Result<(), Error>;
}
