//! Spender Ledger is a JSON REST service for recording the income and
//! expense transactions of spenders.
//!
//! Transactions can be listed with optional equality filters and pagination,
//! with an income, expense and balance summary computed over every matching
//! transaction. Each spender's transactions and totals can also be fetched
//! on their own.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod cancellation;
mod database_id;
mod db;
mod error;
mod health;
mod logging;
mod routing;

pub mod endpoints;
pub mod pagination;
pub mod stores;
pub mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, HealthState, TransactionState};
pub use cancellation::{Cancellation, run_blocking};
pub use database_id::{DatabaseId, SpenderId, TransactionId};
pub use db::{create_spender, initialize as initialize_db};
pub use error::{Error, ErrorMessage};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
