//! Billflow is a REST API for tracking expense and income bills and moving
//! them through an approval workflow.
//!
//! Bills are stored in SQLite and served as JSON. Every route except log in
//! and log out requires the auth cookie set by the log-in endpoint.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod app_state;
mod auth;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod extract;
mod logging;
mod pagination;
mod routing;
mod timezone;

pub use app_state::AppState;
pub use auth::{
    PasswordHash, User, UserID, ValidatedPassword, count_users, create_user, get_user_by_id,
};
pub use database_id::{CommentId, DatabaseId, ExpenseId};
pub use db::initialize as initialize_db;
pub use expense::{
    BillType, Comment, CommentText, DateRange, Expense, ExpenseFilter, ExpensePatch, NewExpense,
    Status, SubHead, add_comment, count_expenses, create_expense, delete_expense,
    filter_by_date_range, get_all_rejected, get_expense, get_expenses_by_bill_type,
    get_total_amount, get_total_status_count, update_expense, update_status, write_expenses_csv,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The username and password did not match a registered user.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The request did not carry a valid, unexpired auth cookie.
    #[error("you must be logged in to do that")]
    NotLoggedIn,

    /// An empty string was used as a username.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// The username is already registered to another user.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string is not one of the known bill types.
    #[error("\"{0}\" is not a valid bill type, expected one of: expense, income")]
    InvalidBillType(String),

    /// The string is not one of the known sub-heads.
    #[error(
        "\"{0}\" is not a valid sub-head, expected one of: BCA, BBA, OMSP, Exam, SW, GEN, NSS, NCC"
    )]
    InvalidSubHead(String),

    /// The string is not one of the workflow statuses.
    #[error(
        "\"{0}\" is not a valid status, expected one of: pending, verified, approved, completed, rejected"
    )]
    InvalidStatus(String),

    /// A bill total was negative or not a finite number.
    #[error("{0} is not a valid total, a total must be a non-negative number")]
    InvalidTotal(f64),

    /// A date string could not be parsed.
    #[error("could not parse the date \"{0}\", expected a date like 2025-01-31")]
    InvalidDate(String),

    /// The start of a date range came after its end.
    #[error("the start date {0} is after the end date {1}")]
    InvalidDateRange(Date, Date),

    /// The request body, path or query string could not be read as the expected type.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A comment was empty or only contained whitespace.
    #[error("comments cannot be empty")]
    EmptyComment,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Bills could not be written as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),
}

impl Error {
    /// The HTTP status code to report this error to a client with.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidBillType(_)
            | Error::InvalidSubHead(_)
            | Error::InvalidStatus(_)
            | Error::InvalidTotal(_)
            | Error::InvalidDate(_)
            | Error::InvalidDateRange(_, _)
            | Error::InvalidRequest(_)
            | Error::EmptyComment
            | Error::EmptyUsername
            | Error::TooWeak(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials | Error::NotLoggedIn => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DuplicateUsername(_) => StatusCode::CONFLICT,
            Error::HashingError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::JSONSerializationError(_)
            | Error::CsvError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "Internal server error, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
