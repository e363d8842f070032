//! BudgetFlow is a backend for tracking personal income and expenses.
//!
//! This library provides a token authenticated REST API over a SQLite database:
//! transaction CRUD, a composable query filter, and summary, monthly, and per-category
//! reports.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use serde_json::json;
use time::Date;
use tokio::signal;

mod app_state;
mod auth;
pub mod db;
mod endpoints;
mod logging;
pub mod models;
pub mod reports;
mod routes;
pub mod stores;
mod timezone;

pub use app_state::AppState;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routes::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes
/// first, and then signals the server to shut down gracefully.
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

    /// The new password and its confirmation do not match.
    #[error("the new password and its confirmation do not match")]
    PasswordMismatch,

    /// The old password given when changing a password was wrong.
    #[error("the old password is incorrect")]
    IncorrectPassword,

    /// A string could not be parsed as an email address.
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    /// A string did not match any known user role.
    #[error("'{0}' is not a valid role")]
    InvalidRole(String),

    /// A string did not match any known transaction type.
    #[error("'{0}' is not a valid transaction type")]
    InvalidTransactionType(String),

    /// A string did not match any known spending category.
    #[error("'{0}' is not a valid category")]
    InvalidCategory(String),

    /// A string did not match any known payment method.
    #[error("'{0}' is not a valid payment method")]
    InvalidPaymentMethod(String),

    /// An amount outside the allowed range was used to create a transaction.
    #[error("the amount {0} is outside the allowed range")]
    AmountOutOfRange(Decimal),

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// An empty or whitespace only string was used as a transaction description.
    #[error("the description cannot be empty")]
    EmptyDescription,

    /// A transaction description was longer than the allowed length.
    #[error(
        "the description cannot be longer than {} grapheme clusters",
        models::MAX_DESCRIPTION_LENGTH
    )]
    DescriptionTooLong,

    /// The user provided an invalid combination of email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A protected route was requested without an Authorization header.
    #[error("authentication required")]
    MissingToken,

    /// The access token is malformed, carries a bad signature, or has expired.
    #[error("the access token is invalid or expired")]
    InvalidToken,

    /// The claims for an access token could not be signed.
    #[error("could not create an access token")]
    TokenCreation,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created. A resource
    /// owned by another user produces the same error as a missing one.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The email address is already registered to another user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// The user ID used to create a transaction did not match a valid user.
    #[error("the user ID does not refer to a valid user")]
    InvalidUser,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
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
        let status = match &self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::InvalidCredentials | Error::MissingToken | Error::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Error::TooWeak(_)
            | Error::PasswordMismatch
            | Error::IncorrectPassword
            | Error::InvalidEmail(_)
            | Error::InvalidRole(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidCategory(_)
            | Error::InvalidPaymentMethod(_)
            | Error::AmountOutOfRange(_)
            | Error::FutureDate(_)
            | Error::EmptyDescription
            | Error::DescriptionTooLong
            | Error::InvalidUser => StatusCode::BAD_REQUEST,
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "An unexpected error occurred".to_owned()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
