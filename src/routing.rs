//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, put},
};

use crate::{
    AppState, endpoints,
    error::ErrorMessage,
    health::get_health,
    logging::logging_middleware,
    stores::TransactionStore,
    transaction::{
        create_transaction_endpoint, edit_transaction_endpoint, get_spender_summary_endpoint,
        list_spender_transactions_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: TransactionStore,
{
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint::<S>).post(create_transaction_endpoint::<S>),
        )
        .route(endpoints::TRANSACTION, put(edit_transaction_endpoint::<S>))
        .route(
            endpoints::SPENDER_TRANSACTIONS,
            get(list_spender_transactions_endpoint::<S>),
        )
        .route(
            endpoints::SPENDER_SUMMARY,
            get(get_spender_summary_endpoint::<S>),
        )
        .route(endpoints::HEALTH, get(get_health::<S>))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorMessage {
            message: "The requested resource could not be found".to_owned(),
        }),
    )
        .into_response()
}
