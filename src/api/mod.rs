//! The JSON REST API.
//!
//! Every handler responds with JSON, including errors which are sent as
//! `{"error": message}`.

mod categorize;
mod expenses;
mod health;
mod limit;
mod statistics;

use std::sync::Arc;

use axum::extract::{FromRef, rejection::JsonRejection};

use crate::{AppState, Error, stores::ExpenseStore};

pub use categorize::get_category_guess;
pub use expenses::{
    create_expense, delete_expense, get_expenses, get_expenses_in_month, update_expense,
};
pub use health::get_health;
pub use limit::{get_limit, set_limit};
pub use statistics::get_statistics;

/// The state needed by the JSON API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn ExpenseStore>,
}

impl FromRef<AppState> for ApiState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}
