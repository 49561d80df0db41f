//! Defines the endpoint for updating an existing transaction.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
};
use tracing::field::Empty;

use crate::{
    app_state::TransactionState,
    cancellation::run_blocking,
    database_id::{DatabaseId, TransactionId},
    error::rejection_response,
    stores::TransactionStore,
    transaction::{TransactionBody, service::update_transaction},
};

/// A route handler for replacing every field of a transaction.
///
/// The ID in the path is authoritative. Responds with 404 if there is no
/// transaction with that ID.
pub async fn edit_transaction_endpoint<S>(
    State(state): State<TransactionState<S>>,
    path: Result<Path<DatabaseId>, PathRejection>,
    payload: Result<Json<TransactionBody>, JsonRejection>,
) -> Response
where
    S: TransactionStore,
{
    let span = tracing::info_span!("update_transaction", transaction_id = Empty);

    let transaction_id = match path {
        Ok(Path(transaction_id)) => transaction_id,
        Err(rejection) => {
            return rejection_response(rejection.status(), rejection.body_text(), &span);
        }
    };
    span.record("transaction_id", transaction_id);

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return rejection_response(rejection.status(), rejection.body_text(), &span);
        }
    };

    let store = state.store;
    let result = run_blocking(move |_| {
        update_transaction(&store, TransactionId::new(transaction_id), body, &span)
    })
    .await;

    match result {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => error.into_response(),
    }
}
