//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, TransactionBehavior, params, params_from_iter};

use crate::{
    Error,
    database_id::TransactionId,
    db::MapRow,
    stores::{RowsAffected, TransactionReader, TransactionStore},
    transaction::{
        Transaction, TransactionBody,
        query::{CountQuery, RowQuery, TotalsQuery},
    },
};

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction depends on a spender, the spender table
/// must be set up in the database, see [crate::initialize_db].
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// The guard releases the connection when dropped, on every exit path.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Run `read` inside a deferred SQLite transaction.
    ///
    /// SQLite holds a single read snapshot from the first query until the
    /// transaction ends, so every query issued through the reader sees the
    /// same rows. The transaction is rolled back if `read` fails.
    fn read_snapshot<T>(
        &self,
        read: impl FnOnce(&dyn TransactionReader) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let connection = self.lock()?;
        let transaction =
            rusqlite::Transaction::new_unchecked(&connection, TransactionBehavior::Deferred)?;

        let result = read(&SQLiteReader {
            connection: &transaction,
        })?;

        transaction.commit()?;

        Ok(result)
    }

    /// Insert a transaction in a single statement.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidSpender] if `spender_id` does not refer to a valid spender,
    /// - [Error::InvalidTransaction] if the amount is negative or the type is not income/expense,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn insert(&self, body: &TransactionBody) -> Result<TransactionId, Error> {
        let connection = self.lock()?;

        let id = connection
            .prepare(
                "INSERT INTO \"transaction\" \
                    (date, amount, category, transaction_type, spender_id, note, image_url) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
                 RETURNING id",
            )?
            .query_row(
                params![
                    body.date,
                    body.amount,
                    body.category,
                    body.transaction_type,
                    body.spender_id,
                    body.note,
                    body.image_url,
                ],
                |row| row.get(0),
            )?;

        Ok(id)
    }

    /// Replace all mutable fields of a transaction in a single statement.
    ///
    /// # Errors
    /// Same as [SQLiteTransactionStore::insert]. A missing transaction is not
    /// an error here, it is reported as zero rows affected.
    fn update(&self, id: TransactionId, body: &TransactionBody) -> Result<RowsAffected, Error> {
        let connection = self.lock()?;

        connection
            .execute(
                "UPDATE \"transaction\" \
                SET \
                    date = ?1, \
                    amount = ?2, \
                    category = ?3, \
                    transaction_type = ?4, \
                    spender_id = ?5, \
                    note = ?6, \
                    image_url = ?7 \
                WHERE id = ?8;",
                params![
                    body.date,
                    body.amount,
                    body.category,
                    body.transaction_type,
                    body.spender_id,
                    body.note,
                    body.image_url,
                    id,
                ],
            )
            .map_err(Error::from)
    }

    fn ping(&self) -> Result<(), Error> {
        self.lock()?
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;

        Ok(())
    }
}

/// Runs queries against a connection that is inside a read transaction.
struct SQLiteReader<'a> {
    connection: &'a Connection,
}

impl TransactionReader for SQLiteReader<'_> {
    fn for_each_row(
        &self,
        query: &RowQuery,
        visit: &mut dyn FnMut(Transaction) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let statement = query.to_sql();
        let mut prepared = self.connection.prepare(&statement.sql)?;
        let mut rows = prepared.query(params_from_iter(statement.params.iter()))?;

        while let Some(row) = rows.next()? {
            visit(Transaction::map_row(row)?)?;
        }

        Ok(())
    }

    fn count_rows(&self, query: &CountQuery) -> Result<u64, Error> {
        let statement = query.to_sql();

        let count: i64 = self.connection.query_row(
            &statement.sql,
            params_from_iter(statement.params.iter()),
            |row| row.get(0),
        )?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    fn sum_totals(&self, query: &TotalsQuery) -> Result<(f64, f64), Error> {
        let statement = query.to_sql();

        self.connection
            .query_row(
                &statement.sql,
                params_from_iter(statement.params.iter()),
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod sqlite_transaction_store_tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        database_id::TransactionId,
        db::{create_spender, initialize},
        pagination::{PageRequest, PaginationConfig},
        stores::TransactionStore,
        transaction::{
            TransactionBody,
            filter::{FilterSet, RawFilters},
            query::{CountQuery, RowQuery, TotalsQuery},
        },
    };

    use super::SQLiteTransactionStore;

    fn get_store() -> SQLiteTransactionStore {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_spender("Alice", "alice@example.com", &conn).unwrap();
        create_spender("Bob", "bob@example.com", &conn).unwrap();

        SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)))
    }

    fn body(amount: f64, category: &str, transaction_type: &str, spender_id: i64) -> TransactionBody {
        TransactionBody {
            date: date!(2024 - 04 - 30),
            amount,
            category: category.to_owned(),
            transaction_type: transaction_type.to_owned(),
            spender_id,
            note: "note".to_owned(),
            image_url: "https://example.com/image.jpg".to_owned(),
        }
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let store = get_store();

        let first = store.insert(&body(1.0, "Food", "expense", 1)).unwrap();
        let second = store.insert(&body(2.0, "Food", "expense", 1)).unwrap();

        assert_eq!(first, TransactionId::new(1));
        assert_eq!(second, TransactionId::new(2));
    }

    #[test]
    fn insert_fails_on_unknown_spender() {
        let store = get_store();

        let got = store.insert(&body(1.0, "Food", "expense", 999));

        assert_eq!(got, Err(Error::InvalidSpender));
    }

    #[test]
    fn insert_fails_on_negative_amount() {
        let store = get_store();

        let got = store.insert(&body(-1.0, "Food", "expense", 1));

        assert!(
            matches!(got, Err(Error::InvalidTransaction(_))),
            "want invalid transaction error, got {got:?}"
        );
    }

    #[test]
    fn insert_fails_on_unknown_type() {
        let store = get_store();

        let got = store.insert(&body(1.0, "Food", "refund", 1));

        assert!(
            matches!(got, Err(Error::InvalidTransaction(_))),
            "want invalid transaction error, got {got:?}"
        );
    }

    #[test]
    fn update_replaces_all_fields() {
        let store = get_store();
        let id = store.insert(&body(1.0, "Food", "expense", 1)).unwrap();
        let want = TransactionBody {
            date: date!(2024 - 05 - 01),
            amount: 555.0,
            category: "Shopping".to_owned(),
            transaction_type: "income".to_owned(),
            spender_id: 2,
            note: "updated".to_owned(),
            image_url: String::new(),
        };

        let rows_affected = store.update(id, &want).unwrap();

        assert_eq!(rows_affected, 1);
        let got = store
            .read_snapshot(|reader| {
                reader.query_rows(&RowQuery {
                    filters: FilterSet::all(),
                    page: None,
                })
            })
            .unwrap();
        assert_eq!(got, vec![want.into_transaction(id)]);
    }

    #[test]
    fn update_of_missing_row_affects_zero_rows() {
        let store = get_store();

        let got = store.update(TransactionId::new(42), &body(1.0, "Food", "expense", 1));

        assert_eq!(got, Ok(0));
    }

    #[test]
    fn reader_filters_pages_counts_and_sums() {
        let store = get_store();
        for i in 1..=5 {
            store.insert(&body(i as f64, "Food", "expense", 1)).unwrap();
        }
        store.insert(&body(100.0, "Salary", "income", 1)).unwrap();
        store.insert(&body(7.0, "Food", "expense", 2)).unwrap();
        let filters = FilterSet::parse(&RawFilters {
            category: Some("Food".to_owned()),
            ..Default::default()
        })
        .unwrap();
        let page = PageRequest::new(2, 2, &PaginationConfig::default());

        let (rows, count, totals) = store
            .read_snapshot(|reader| {
                let rows = reader.query_rows(&RowQuery {
                    filters: filters.clone(),
                    page: Some(page),
                })?;
                let count = reader.count_rows(&CountQuery {
                    filters: filters.clone(),
                })?;
                let totals = reader.sum_totals(&TotalsQuery {
                    filters: FilterSet::for_spender(1),
                })?;
                Ok((rows, count, totals))
            })
            .unwrap();

        let ids: Vec<_> = rows.iter().map(|row| row.id.get()).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(count, 6);
        assert_eq!(totals, (100.0, 15.0));
    }

    #[test]
    fn sum_totals_is_zero_for_spender_without_transactions() {
        let store = get_store();

        let got = store
            .read_snapshot(|reader| {
                reader.sum_totals(&TotalsQuery {
                    filters: FilterSet::for_spender(2),
                })
            })
            .unwrap();

        assert_eq!(got, (0.0, 0.0));
    }

    #[test]
    fn snapshot_blocks_concurrent_writer_between_reads() {
        let path = std::env::temp_dir().join(format!(
            "spender_ledger_snapshot_{}.db",
            std::process::id()
        ));
        let journal_path = path.with_extension("db-journal");
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_file(&journal_path);

        let conn = Connection::open(&path).unwrap();
        initialize(&conn).unwrap();
        create_spender("Alice", "alice@example.com", &conn).unwrap();
        let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)));
        store.insert(&body(10.0, "Food", "expense", 1)).unwrap();

        let writer = Connection::open(&path).unwrap();
        writer.busy_timeout(Duration::ZERO).unwrap();
        let insert = "INSERT INTO \"transaction\" \
            (date, amount, category, transaction_type, spender_id) \
            VALUES ('2024-04-30', 99.0, 'Food', 'expense', 1)";

        let (rows, write_result, totals) = store
            .read_snapshot(|reader| {
                let rows = reader.query_rows(&RowQuery {
                    filters: FilterSet::for_spender(1),
                    page: None,
                })?;
                let write_result = writer.execute(insert, ());
                let totals = reader.sum_totals(&TotalsQuery {
                    filters: FilterSet::for_spender(1),
                })?;
                Ok((rows, write_result, totals))
            })
            .unwrap();

        assert!(
            write_result.is_err(),
            "write committed while a snapshot was open"
        );
        assert_eq!(rows.len(), 1);
        let row_total: f64 = rows.iter().map(|row| row.amount).sum();
        assert_eq!(totals, (0.0, row_total));

        writer.execute(insert, ()).unwrap();
        let totals = store
            .read_snapshot(|reader| {
                reader.sum_totals(&TotalsQuery {
                    filters: FilterSet::for_spender(1),
                })
            })
            .unwrap();
        assert_eq!(totals, (0.0, 109.0));

        drop(writer);
        drop(store);
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_file(&journal_path);
    }

    #[test]
    fn date_filter_matches_stored_dates() {
        let store = get_store();
        store.insert(&body(1.0, "Food", "expense", 1)).unwrap();
        let filters = FilterSet::parse(&RawFilters {
            date: Some("2024-04-30".to_owned()),
            ..Default::default()
        })
        .unwrap();

        let got = store
            .read_snapshot(|reader| reader.count_rows(&CountQuery { filters }))
            .unwrap();

        assert_eq!(got, 1);
    }

    #[test]
    fn ping_succeeds() {
        assert_eq!(get_store().ping(), Ok(()));
    }
}
