use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use rust_decimal::Decimal;
use time::Date;

use crate::{AppState, NewExpense, db::initialize, stores::SQLiteExpenseStore};

/// An [AppState] backed by an empty in-memory SQLite database.
pub(crate) fn get_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");

    AppState::new(
        SQLiteExpenseStore::new(Arc::new(Mutex::new(connection))),
        "Etc/UTC",
    )
    .expect("Could not create app state")
}

/// A valid expense with its category guessed from `platform`.
#[track_caller]
pub(crate) fn new_expense(platform: &str, amount: Decimal, date: Date) -> NewExpense {
    NewExpense::new(platform, None, amount, date).expect("Could not create test expense")
}
