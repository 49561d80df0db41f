//! Income, expense and balance totals over a set of transactions.

use serde::Serialize;

use crate::{
    Error,
    cancellation::Cancellation,
    stores::TransactionReader,
    transaction::{
        Transaction, TransactionKind,
        filter::FilterSet,
        query::{RowQuery, TotalsQuery},
    },
};

/// Aggregate totals over a filter set or a single spender.
///
/// `current_balance` is always `total_income - total_expenses`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    /// The sum of income amounts.
    pub total_income: f64,
    /// The sum of expense amounts.
    pub total_expenses: f64,
    /// Income minus expenses.
    pub current_balance: f64,
}

impl Summary {
    /// Build a summary from the two sums, deriving the balance.
    pub fn from_totals(total_income: f64, total_expenses: f64) -> Self {
        Self {
            total_income,
            total_expenses,
            current_balance: total_income - total_expenses,
        }
    }
}

/// Running income and expense sums, fed one transaction at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    income: f64,
    expenses: f64,
}

impl Totals {
    /// Count `transaction` towards the bucket matching its type label.
    ///
    /// Labels other than "income" and "expense" (ignoring case) are skipped.
    pub fn add(&mut self, transaction: &Transaction) {
        match TransactionKind::classify(&transaction.transaction_type) {
            Some(TransactionKind::Income) => self.income += transaction.amount,
            Some(TransactionKind::Expense) => self.expenses += transaction.amount,
            None => {
                tracing::debug!(
                    "transaction {} has unknown type {:?}, excluding it from the summary",
                    transaction.id,
                    transaction.transaction_type
                );
            }
        }
    }

    /// Finish accumulating.
    pub fn summary(self) -> Summary {
        Summary::from_totals(self.income, self.expenses)
    }
}

impl<'a> FromIterator<&'a Transaction> for Totals {
    fn from_iter<I: IntoIterator<Item = &'a Transaction>>(iter: I) -> Self {
        let mut totals = Totals::default();
        iter.into_iter().for_each(|transaction| totals.add(transaction));
        totals
    }
}

/// Summarize every row matching `filters` by streaming them through [Totals].
///
/// The row query has no page: the summary covers the whole filtered result
/// set, not the page being displayed. `cancellation` is checked before each
/// row so an abandoned request stops scanning.
///
/// # Errors
/// Returns any error raised by `reader`, or [Error::Cancelled].
pub fn stream_summary(
    reader: &dyn TransactionReader,
    filters: &FilterSet,
    cancellation: &Cancellation,
) -> Result<Summary, Error> {
    let query = RowQuery {
        filters: filters.clone(),
        page: None,
    };
    let mut totals = Totals::default();

    reader.for_each_row(&query, &mut |transaction| {
        cancellation.check()?;
        totals.add(&transaction);
        Ok(())
    })?;

    Ok(totals.summary())
}

/// Summarize the rows matching `filters` with a dedicated aggregate statement.
///
/// # Errors
/// Returns any error raised by `reader`.
pub fn query_summary(reader: &dyn TransactionReader, filters: &FilterSet) -> Result<Summary, Error> {
    let (total_income, total_expenses) = reader.sum_totals(&TotalsQuery {
        filters: filters.clone(),
    })?;

    Ok(Summary::from_totals(total_income, total_expenses))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        cancellation::Cancellation,
        database_id::TransactionId,
        stores::{MemoryTransactionStore, TransactionStore},
        transaction::{Transaction, TransactionBody, filter::FilterSet},
    };

    use super::{Summary, Totals, stream_summary};

    fn transaction(id: i64, amount: f64, transaction_type: &str) -> Transaction {
        TransactionBody {
            date: date!(2024 - 04 - 30),
            amount,
            category: "Food".to_owned(),
            transaction_type: transaction_type.to_owned(),
            spender_id: 1,
            note: String::new(),
            image_url: String::new(),
        }
        .into_transaction(TransactionId::new(id))
    }

    #[test]
    fn empty_universe_has_zero_totals() {
        let got = Totals::default().summary();

        assert_eq!(got, Summary::default());
    }

    #[test]
    fn sums_by_type_case_insensitively() {
        let transactions = [
            transaction(1, 1000.0, "expense"),
            transaction(2, 2000.0, "income"),
            transaction(3, 500.0, "Income"),
            transaction(4, 250.0, "EXPENSE"),
        ];

        let got = transactions.iter().collect::<Totals>().summary();

        assert_eq!(got, Summary::from_totals(2500.0, 1250.0));
        assert_eq!(got.current_balance, 1250.0);
    }

    #[test]
    fn unknown_types_count_towards_neither_bucket() {
        let transactions = [
            transaction(1, 100.0, "income"),
            transaction(2, 999.0, "refund"),
            transaction(3, 40.0, "expense"),
        ];

        let got = transactions.iter().collect::<Totals>().summary();

        assert_eq!(got.total_income, 100.0);
        assert_eq!(got.total_expenses, 40.0);
        assert_eq!(got.current_balance, 60.0);
    }

    #[test]
    fn balance_can_be_negative_while_totals_are_not() {
        let transactions = [
            transaction(1, 10.0, "income"),
            transaction(2, 30.0, "expense"),
        ];

        let got = transactions.iter().collect::<Totals>().summary();

        assert!(got.total_income >= 0.0);
        assert!(got.total_expenses >= 0.0);
        assert_eq!(got.current_balance, got.total_income - got.total_expenses);
        assert_eq!(got.current_balance, -20.0);
    }

    #[test]
    fn streaming_stops_once_cancelled() {
        let store = MemoryTransactionStore::with_rows(vec![
            transaction(1, 10.0, "income"),
            transaction(2, 20.0, "expense"),
        ]);
        let cancellation = Cancellation::new();
        cancellation.cancel();

        let got = store
            .read_snapshot(|reader| stream_summary(reader, &FilterSet::all(), &cancellation));

        assert_eq!(got, Err(Error::Cancelled));
    }

    #[test]
    fn streaming_sums_every_matching_row() {
        let store = MemoryTransactionStore::with_rows(vec![
            transaction(1, 10.0, "income"),
            transaction(2, 20.0, "expense"),
            transaction(3, 5.0, "Expense"),
        ]);

        let got = store
            .read_snapshot(|reader| {
                stream_summary(reader, &FilterSet::all(), &Cancellation::new())
            })
            .unwrap();

        assert_eq!(got, Summary::from_totals(10.0, 25.0));
    }
}
