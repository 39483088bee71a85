//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use crate::{Error, stores::ExpenseStore, timezone::get_local_offset};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// Where expenses and the monthly limit are kept.
    pub store: Arc<dyn ExpenseStore>,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl AppState {
    /// Create a new [AppState] from an expense store.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Kolkata".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone.
    pub fn new(store: impl ExpenseStore + 'static, local_timezone: &str) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        Ok(Self {
            store: Arc::new(store),
            local_timezone: local_timezone.to_owned(),
        })
    }
}
