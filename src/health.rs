//! A liveness check that also checks the store can be reached.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{app_state::HealthState, cancellation::run_blocking, stores::TransactionStore};

/// The body returned by a healthy server.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Always true.
    pub success: bool,
    /// A fixed greeting.
    pub message: &'static str,
}

/// A route handler that responds with 200 if the store answers a trivial query.
pub async fn get_health<S>(State(state): State<HealthState<S>>) -> Response
where
    S: TransactionStore,
{
    let store = state.store;

    match run_blocking(move |_| store.ping()).await {
        Ok(()) => Json(HealthStatus {
            success: true,
            message: "API is now working",
        })
        .into_response(),
        Err(error) => {
            tracing::error!("health check failed: {error}");
            error.into_response()
        }
    }
}
