//! Defines the endpoint for listing transactions with optional filters.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    app_state::TransactionState,
    cancellation::run_blocking,
    error::rejection_response,
    pagination::PageRequest,
    stores::TransactionStore,
    transaction::{
        filter::{FilterSet, RawFilters},
        service::list_transactions,
    },
};

/// The query string accepted by [list_transactions_endpoint].
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// Equality filters on the transaction fields.
    #[serde(flatten)]
    pub filters: RawFilters,
    /// The 1-based page number.
    pub page: Option<String>,
    /// The page size.
    pub limit: Option<String>,
}

/// A route handler for listing a page of transactions.
///
/// Malformed `page` and `limit` values fall back to the defaults, but a
/// malformed `amount` filter fails the request.
pub async fn list_transactions_endpoint<S>(
    State(state): State<TransactionState<S>>,
    query: Result<Query<ListTransactionsQuery>, QueryRejection>,
) -> Response
where
    S: TransactionStore,
{
    let span = tracing::info_span!("list_transactions");

    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return rejection_response(rejection.status(), rejection.body_text(), &span);
        }
    };

    let filters = match FilterSet::parse(&query.filters) {
        Ok(filters) => filters,
        Err(error) => {
            tracing::warn!(parent: &span, ?query, "rejected transaction filters: {error}");
            return error.into_response();
        }
    };

    let page = PageRequest::parse_lenient(
        query.page.as_deref(),
        query.limit.as_deref(),
        &state.pagination_config,
    );

    let store = state.store;
    let result = run_blocking(move |cancellation| {
        list_transactions(&store, &filters, page, &span, cancellation)
    })
    .await;

    match result {
        Ok(page) => Json(page).into_response(),
        Err(error) => error.into_response(),
    }
}
