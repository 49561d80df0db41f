//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and its schema
//! - Filters, the SQL they render to, and the summary aggregators
//! - The ledger operations and the route handlers that expose them

mod core;
mod create_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod spender_endpoints;

pub mod filter;
pub mod query;
pub mod service;
pub mod summary;

pub use self::core::{Transaction, TransactionBody, TransactionKind};
pub use create_endpoint::create_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use spender_endpoints::{get_spender_summary_endpoint, list_spender_transactions_endpoint};
