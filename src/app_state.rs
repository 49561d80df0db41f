//! Implements a struct that holds the state of the REST server.

use axum::extract::FromRef;

use crate::{pagination::PaginationConfig, stores::TransactionStore};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<S>
where
    S: TransactionStore,
{
    /// The store for managing [transactions](crate::transaction::Transaction).
    pub transaction_store: S,

    /// The config that controls how pages of transactions are sized.
    pub pagination_config: PaginationConfig,
}

impl<S> AppState<S>
where
    S: TransactionStore,
{
    /// Create a new [AppState] from a transaction store.
    pub fn new(transaction_store: S, pagination_config: PaginationConfig) -> Self {
        Self {
            transaction_store,
            pagination_config,
        }
    }
}

/// The state needed by the transaction route handlers.
#[derive(Debug, Clone)]
pub struct TransactionState<S>
where
    S: TransactionStore,
{
    /// The store for managing transactions.
    pub store: S,
    /// The config used to turn `page` and `limit` query values into a page request.
    pub pagination_config: PaginationConfig,
}

impl<S> FromRef<AppState<S>> for TransactionState<S>
where
    S: TransactionStore,
{
    fn from_ref(state: &AppState<S>) -> Self {
        Self {
            store: state.transaction_store.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The state needed by the health check.
#[derive(Debug, Clone)]
pub struct HealthState<S>
where
    S: TransactionStore,
{
    /// The store to check.
    pub store: S,
}

impl<S> FromRef<AppState<S>> for HealthState<S>
where
    S: TransactionStore,
{
    fn from_ref(state: &AppState<S>) -> Self {
        Self {
            store: state.transaction_store.clone(),
        }
    }
}
