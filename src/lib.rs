//! MoneySaver is a web app for tracking personal expenses against a monthly budget.
//!
//! This library provides a JSON REST API and a dashboard of server-rendered
//! HTML pages. Expenses and the monthly limit are kept either in SQLite or in
//! a local JSON document, see [ExpenseStore].

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::signal;

mod aggregation;
mod alert;
mod api;
mod app_state;
mod budget;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod home;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod stores;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use aggregation::{BudgetStatus, BudgetSummary};
pub use app_state::AppState;
pub use budget::{MonthlyLimit, YearMonth};
pub use category::{Category, auto_categorize};
pub use database_id::ExpenseId;
pub use db::initialize as initialize_db;
pub use expense::{Expense, NewExpense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use stores::{ExpenseStore, LocalExpenseStore, SQLiteExpenseStore};
pub use timezone::get_local_offset;

use crate::{alert::Alert, internal_server_error::InternalServerError};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate_signal) => {
                terminate_signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Failed to install terminate signal handler: {error}");
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

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An expense was given a platform that is empty or only whitespace.
    #[error("Platform cannot be empty")]
    EmptyPlatform,

    /// An expense was given an amount of zero or less.
    #[error("Invalid amount: {0} is not greater than zero")]
    NonPositiveAmount(Decimal),

    /// An amount could not be read as a number.
    #[error("Invalid amount: {0} is not a number")]
    InvalidAmount(String),

    /// An expense amount or a monthly limit was larger than [budget::MAX_AMOUNT].
    #[error("Invalid amount: {0} is greater than the maximum of 1000000000")]
    AmountTooLarge(Decimal),

    /// A date was not in the `YYYY-MM-DD` format.
    #[error("Invalid date: {0}, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A request body was missing a required field.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The monthly limit was set to a negative amount.
    #[error("Invalid monthly limit: {0} is less than zero")]
    NegativeLimit(Decimal),

    /// A category label did not match any of the known categories.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// A month number outside of 1 to 12 was given.
    #[error("{0} is not a valid month, expected a number from 1 to 12")]
    InvalidMonth(u8),

    /// A JSON request body could not be parsed.
    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist.
    #[error("Expense not found")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist.
    #[error("Expense not found")]
    DeleteMissingExpense,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the lock on the expense store.
    #[error("could not acquire the store lock")]
    StoreLockError,

    /// The local JSON store could not be read or written.
    #[error("local storage error: {0}")]
    LocalStorageError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
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

impl Error {
    /// The HTTP status code that best describes the error.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyPlatform
            | Error::NonPositiveAmount(_)
            | Error::InvalidAmount(_)
            | Error::AmountTooLarge(_)
            | Error::InvalidDate(_)
            | Error::MissingField(_)
            | Error::NegativeLimit(_)
            | Error::InvalidCategory(_)
            | Error::InvalidMonth(_)
            | Error::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::UpdateMissingExpense | Error::DeleteMissingExpense => {
                StatusCode::NOT_FOUND
            }
            Error::SqlError(_)
            | Error::StoreLockError
            | Error::LocalStorageError(_)
            | Error::InvalidTimezoneError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render the error as an HTML alert for HTMX requests.
    fn into_alert_response(self) -> Response {
        let status_code = self.status_code();

        let alert = match self {
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            },
            Error::DeleteMissingExpense => Alert::Error {
                message: "Could not delete expense".to_owned(),
                details: "The expense could not be found. \
                    Try refreshing the page to see if the expense has already been deleted."
                    .to_owned(),
            },
            Error::UpdateMissingExpense | Error::NotFound => Alert::Error {
                message: "Could not find expense".to_owned(),
                details: "The expense could not be found.".to_owned(),
            },
            error if status_code == StatusCode::BAD_REQUEST => Alert::Error {
                message: "Invalid input".to_owned(),
                details: error.to_string(),
            },
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                }
            }
        };

        alert.into_response_with_status(status_code)
    }

    /// Render the error as a full error page for page requests.
    fn into_page_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            error if error.status_code() == StatusCode::BAD_REQUEST => {
                (StatusCode::BAD_REQUEST, error.to_string()).into_response()
            }
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                InternalServerError::default().into_response()
            }
        }
    }
}

/// Errors from the JSON API are sent as `{"error": message}`.
///
/// Internal errors are logged and replaced with a generic message.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("An unexpected error occurred: {self}");
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}
