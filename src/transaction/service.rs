//! The ledger operations: filtered listing, per-spender listing and summary,
//! and single-row create/update.
//!
//! Every operation takes the store it runs against and the span that its log
//! events belong to, so that nothing is pulled from ambient request state.

use serde::Serialize;
use tracing::Span;

use crate::{
    Error,
    cancellation::Cancellation,
    database_id::{SpenderId, TransactionId},
    pagination::{PageRequest, PageResult},
    stores::{TransactionReader, TransactionStore},
    transaction::{
        Transaction, TransactionBody,
        filter::FilterSet,
        query::QueryPlan,
        summary::{Summary, query_summary, stream_summary},
    },
};

/// One page of transactions with the summary and pagination of the whole
/// filtered result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPage {
    /// The transactions on the requested page, in ID order.
    pub transactions: Vec<Transaction>,
    /// The totals across every page, not just this one.
    pub summary: Summary,
    /// Where this page sits in the result set.
    pub pagination: PageResult,
}

/// List a page of the transactions matching `filters`.
///
/// The summary streams every matching row, so it reflects the full filtered
/// result set. The page, the row count and the summary are read from a
/// single snapshot, and if any of the reads fails the whole listing fails.
///
/// # Errors
/// Returns any storage error raised by `store`, or [Error::Cancelled] if
/// `cancellation` is set while the summary is streaming.
pub fn list_transactions<S: TransactionStore>(
    store: &S,
    filters: &FilterSet,
    page: PageRequest,
    span: &Span,
    cancellation: &Cancellation,
) -> Result<TransactionPage, Error> {
    tracing::debug!(parent: span, ?filters, ?page, "listing transactions");

    list_page(store, filters, page, |reader, filters| {
        stream_summary(reader, filters, cancellation)
    })
}

/// List a page of the transactions owned by `spender_id`.
///
/// The summary comes from a dedicated aggregate query scoped to the spender,
/// independent of which page was requested.
///
/// # Errors
/// Returns any storage error raised by `store`.
pub fn list_spender_transactions<S: TransactionStore>(
    store: &S,
    spender_id: SpenderId,
    page: PageRequest,
    span: &Span,
) -> Result<TransactionPage, Error> {
    tracing::debug!(parent: span, spender_id, ?page, "listing spender transactions");

    list_page(store, &FilterSet::for_spender(spender_id), page, query_summary)
}

/// Get the income, expense and balance totals of `spender_id`.
///
/// A spender without any transactions has zero totals.
///
/// # Errors
/// Returns any storage error raised by `store`.
pub fn get_spender_summary<S: TransactionStore>(
    store: &S,
    spender_id: SpenderId,
    span: &Span,
) -> Result<Summary, Error> {
    tracing::debug!(parent: span, spender_id, "summarizing spender transactions");

    store.read_snapshot(|reader| query_summary(reader, &FilterSet::for_spender(spender_id)))
}

fn list_page<S, F>(
    store: &S,
    filters: &FilterSet,
    page: PageRequest,
    summarize: F,
) -> Result<TransactionPage, Error>
where
    S: TransactionStore,
    F: FnOnce(&dyn TransactionReader, &FilterSet) -> Result<Summary, Error>,
{
    let plan = QueryPlan::new(filters.clone(), page);

    store.read_snapshot(|reader| {
        let transactions = reader.query_rows(&plan.rows)?;
        let total_rows = reader.count_rows(&plan.count)?;
        let summary = summarize(reader, filters)?;

        Ok(TransactionPage {
            transactions,
            summary,
            pagination: PageResult::calculate(plan.page, total_rows),
        })
    })
}

/// Create a transaction from `body`.
///
/// Returns the transaction as persisted, with its storage-assigned ID.
///
/// # Errors
/// Returns [Error::InvalidSpender] or [Error::InvalidTransaction] if storage
/// rejects the row, or any other storage error.
pub fn create_transaction<S: TransactionStore>(
    store: &S,
    body: TransactionBody,
    span: &Span,
) -> Result<Transaction, Error> {
    let id = store.insert(&body).inspect_err(|error| {
        tracing::error!(parent: span, "could not create transaction: {error}");
    })?;

    tracing::info!(parent: span, %id, "created transaction");

    Ok(body.into_transaction(id))
}

/// Replace every field of the transaction `id` with `body`.
///
/// There is no concurrency control: the last write wins.
///
/// # Errors
/// Returns [Error::NotFound] if there is no transaction with the ID `id`,
/// [Error::InvalidSpender] or [Error::InvalidTransaction] if storage rejects
/// the row, or any other storage error.
pub fn update_transaction<S: TransactionStore>(
    store: &S,
    id: TransactionId,
    body: TransactionBody,
    span: &Span,
) -> Result<Transaction, Error> {
    let rows_affected = store.update(id, &body).inspect_err(|error| {
        tracing::error!(parent: span, "could not update transaction {id}: {error}");
    })?;

    if rows_affected == 0 {
        tracing::warn!(parent: span, %id, "tried to update a transaction that does not exist");
        return Err(Error::NotFound);
    }

    tracing::info!(parent: span, %id, "updated transaction");

    Ok(body.into_transaction(id))
}
