//! Defines the endpoints for a single spender's transactions and totals.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::field::Empty;

use crate::{
    app_state::TransactionState,
    cancellation::run_blocking,
    database_id::SpenderId,
    error::rejection_response,
    pagination::PageRequest,
    stores::TransactionStore,
    transaction::service::{get_spender_summary, list_spender_transactions},
};

/// The pagination query string accepted by [list_spender_transactions_endpoint].
#[derive(Debug, Default, Deserialize)]
pub struct SpenderPageQuery {
    /// The 1-based page number.
    pub page: Option<String>,
    /// The page size.
    pub limit: Option<String>,
}

/// A route handler for listing a page of a spender's transactions.
///
/// Unlike the general listing, `page` and `limit` must be integers if given.
pub async fn list_spender_transactions_endpoint<S>(
    State(state): State<TransactionState<S>>,
    path: Result<Path<SpenderId>, PathRejection>,
    query: Result<Query<SpenderPageQuery>, QueryRejection>,
) -> Response
where
    S: TransactionStore,
{
    let span = tracing::info_span!("list_spender_transactions", spender_id = Empty);

    let spender_id = match path {
        Ok(Path(spender_id)) => spender_id,
        Err(rejection) => {
            return rejection_response(rejection.status(), rejection.body_text(), &span);
        }
    };
    span.record("spender_id", spender_id);

    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return rejection_response(rejection.status(), rejection.body_text(), &span);
        }
    };

    let page = match PageRequest::parse_strict(
        query.page.as_deref(),
        query.limit.as_deref(),
        &state.pagination_config,
    ) {
        Ok(page) => page,
        Err(error) => {
            tracing::warn!(parent: &span, ?query, "rejected page request: {error}");
            return error.into_response();
        }
    };

    let store = state.store;
    let result =
        run_blocking(move |_| list_spender_transactions(&store, spender_id, page, &span)).await;

    match result {
        Ok(page) => Json(page).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for a spender's income, expense and balance totals.
pub async fn get_spender_summary_endpoint<S>(
    State(state): State<TransactionState<S>>,
    path: Result<Path<SpenderId>, PathRejection>,
) -> Response
where
    S: TransactionStore,
{
    let span = tracing::info_span!("get_spender_summary", spender_id = Empty);

    let spender_id = match path {
        Ok(Path(spender_id)) => spender_id,
        Err(rejection) => {
            return rejection_response(rejection.status(), rejection.body_text(), &span);
        }
    };
    span.record("spender_id", spender_id);

    let store = state.store;
    let result = run_blocking(move |_| get_spender_summary(&store, spender_id, &span)).await;

    match result {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_response(),
    }
}
