//! An in-memory transaction store for tests and throwaway servers.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    Error,
    database_id::TransactionId,
    stores::{RowsAffected, TransactionReader, TransactionStore},
    transaction::{
        Transaction, TransactionBody,
        query::{CountQuery, RowQuery, TotalsQuery},
        summary::Totals,
    },
};

#[derive(Debug, Default)]
struct MemoryState {
    /// Kept sorted by ID.
    rows: Vec<Transaction>,
    last_id: i64,
}

/// Keeps transactions in a vector behind a mutex.
///
/// Unlike [super::SQLiteTransactionStore] there are no storage constraints:
/// any row, including ones with unknown type labels, can be stored.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransactionStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryTransactionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `rows` as is, IDs included.
    pub fn with_rows(mut rows: Vec<Transaction>) -> Self {
        rows.sort_by_key(|row| row.id);
        let last_id = rows.last().map_or(0, |row| row.id.get());

        Self {
            state: Arc::new(Mutex::new(MemoryState { rows, last_id })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, Error> {
        self.state.lock().map_err(|error| {
            tracing::error!("could not acquire in-memory store lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl TransactionStore for MemoryTransactionStore {
    /// Holding the lock for the whole of `read` keeps writers out.
    fn read_snapshot<T>(
        &self,
        read: impl FnOnce(&dyn TransactionReader) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let state = self.lock()?;

        read(&MemoryReader { rows: &state.rows })
    }

    fn insert(&self, body: &TransactionBody) -> Result<TransactionId, Error> {
        let mut state = self.lock()?;

        state.last_id += 1;
        let id = TransactionId::new(state.last_id);
        state.rows.push(body.clone().into_transaction(id));

        Ok(id)
    }

    fn update(&self, id: TransactionId, body: &TransactionBody) -> Result<RowsAffected, Error> {
        let mut state = self.lock()?;

        match state.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                *row = body.clone().into_transaction(id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn ping(&self) -> Result<(), Error> {
        self.lock().map(|_| ())
    }
}

struct MemoryReader<'a> {
    rows: &'a [Transaction],
}

impl TransactionReader for MemoryReader<'_> {
    fn for_each_row(
        &self,
        query: &RowQuery,
        visit: &mut dyn FnMut(Transaction) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let (skip, take) = match query.page {
            Some(page) => (
                usize::try_from(page.offset()).unwrap_or(usize::MAX),
                usize::try_from(page.size()).unwrap_or(usize::MAX),
            ),
            None => (0, usize::MAX),
        };

        self.rows
            .iter()
            .filter(|row| query.filters.matches(row))
            .skip(skip)
            .take(take)
            .try_for_each(|row| visit(row.clone()))
    }

    fn count_rows(&self, query: &CountQuery) -> Result<u64, Error> {
        let count = self
            .rows
            .iter()
            .filter(|row| query.filters.matches(row))
            .count();

        Ok(count as u64)
    }

    fn sum_totals(&self, query: &TotalsQuery) -> Result<(f64, f64), Error> {
        let summary = self
            .rows
            .iter()
            .filter(|row| query.filters.matches(row))
            .collect::<Totals>()
            .summary();

        Ok((summary.total_income, summary.total_expenses))
    }
}
