//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    app_state::TransactionState,
    cancellation::run_blocking,
    error::rejection_response,
    stores::TransactionStore,
    transaction::{TransactionBody, service::create_transaction},
};

/// A route handler for creating a new transaction.
///
/// Responds with 201 and the created transaction, including its new ID.
pub async fn create_transaction_endpoint<S>(
    State(state): State<TransactionState<S>>,
    payload: Result<Json<TransactionBody>, JsonRejection>,
) -> Response
where
    S: TransactionStore,
{
    let span = tracing::info_span!("create_transaction");

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return rejection_response(rejection.status(), rejection.body_text(), &span);
        }
    };

    let store = state.store;
    let result = run_blocking(move |_| create_transaction(&store, body, &span)).await;

    match result {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => error.into_response(),
    }
}
