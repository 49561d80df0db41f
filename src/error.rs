//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The amount filter could not be parsed as a finite number.
    ///
    /// The whole request is rejected rather than dropping the filter, since
    /// silently ignoring it would return a broader result set than the client
    /// asked for.
    #[error("Invalid amount format")]
    InvalidAmountFormat,

    /// The page number in the query string is not an integer.
    #[error("Please check your page number")]
    InvalidPageNumber,

    /// The page limit (page size) in the query string is not an integer.
    #[error("Please check your page limit")]
    InvalidPageLimit,

    /// The spender ID used to create or update a transaction does not refer to
    /// a spender in the database.
    #[error("the spender ID does not refer to a valid spender")]
    InvalidSpender,

    /// The transaction was rejected by a storage constraint, e.g. a negative
    /// amount or a transaction type other than income or expense.
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows or an
    /// update affects zero rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    ///
    /// The inner error should only be logged on the server. Clients receive a
    /// generic internal server error message instead.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The request was abandoned, e.g. by the request timeout, before its
    /// store work finished.
    #[error("the request was cancelled")]
    Cancelled,

    /// The blocking task running store work panicked or was aborted.
    #[error("a background task failed")]
    TaskFailed,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidSpender,
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_CHECK,
                },
                description,
            ) => Error::InvalidTransaction(
                description.unwrap_or_else(|| "constraint failed".to_owned()),
            ),
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    /// A human-readable description of what went wrong.
    pub message: String,
}

impl Error {
    /// The HTTP status code that best describes the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidAmountFormat
            | Error::InvalidPageNumber
            | Error::InvalidPageLimit
            | Error::InvalidSpender
            | Error::InvalidTransaction(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            Error::SqlError(_) | Error::DatabaseLockError | Error::TaskFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = match self {
            Error::NotFound => "The requested resource could not be found".to_owned(),
            // Storage errors are logged where they are raised and are not
            // intended to be shown to the client.
            Error::SqlError(_) | Error::DatabaseLockError | Error::TaskFailed => {
                "Please check server logs".to_owned()
            }
            error => error.to_string(),
        };

        (status_code, Json(ErrorMessage { message })).into_response()
    }
}

/// Render an axum extractor rejection in the same JSON shape as [Error].
///
/// Pass the rejection's own `status()` and `body_text()`.
pub(crate) fn rejection_response(
    status_code: StatusCode,
    message: String,
    span: &tracing::Span,
) -> Response {
    tracing::warn!(parent: span, "rejected request: {message}");

    (status_code, Json(ErrorMessage { message })).into_response()
}
