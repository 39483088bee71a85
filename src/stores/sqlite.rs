//! Implements a SQLite backed expense store.

use std::{
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, OptionalExtension, Row, types::ValueRef};
use rust_decimal::Decimal;

use crate::{
    Error, Expense, NewExpense,
    budget::{MonthlyLimit, YearMonth},
    database_id::ExpenseId,
    stores::ExpenseStore,
};

const SELECT_EXPENSE_COLUMNS: &str = "SELECT id, platform, category, amount, date FROM expense";

/// Create the table that holds expenses.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            platform TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT 'Other',
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            created_at TEXT DEFAULT CURRENT_TIMESTAMP
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date)",
        (),
    )?;

    Ok(())
}

/// Create the table that holds the history of monthly limits.
///
/// Every change inserts a row and the row with the largest ID is the current limit.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_monthly_limit_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS monthly_limit (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            monthly_limit TEXT NOT NULL,
            created_at TEXT DEFAULT CURRENT_TIMESTAMP
        )",
        (),
    )?;

    Ok(())
}

/// Stores expenses and the monthly limit in a SQLite database.
///
/// The tables must have been created with [initialize](crate::initialize_db)
/// before the store is used.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::StoreLockError)
    }

    fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
        Ok(Expense {
            id: row.get(0)?,
            platform: row.get(1)?,
            category: row.get(2)?,
            amount: read_amount(row.get_ref(3)?),
            date: row.get(4)?,
            is_recurring: None,
        })
    }
}

/// Read a decimal stored as text, or any other SQLite value, as leniently as possible.
///
/// Values that cannot be read as a number are treated as zero.
fn read_amount(value: ValueRef<'_>) -> Decimal {
    match value {
        ValueRef::Text(text) => std::str::from_utf8(text)
            .ok()
            .and_then(|text| Decimal::from_str(text.trim()).ok())
            .unwrap_or_default(),
        ValueRef::Integer(integer) => Decimal::from(integer),
        ValueRef::Real(real) => Decimal::try_from(real).unwrap_or_default(),
        ValueRef::Null | ValueRef::Blob(_) => Decimal::ZERO,
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    fn fetch_limit(&self) -> Result<MonthlyLimit, Error> {
        let connection = self.lock()?;

        let amount = connection
            .query_row(
                "SELECT monthly_limit FROM monthly_limit ORDER BY id DESC LIMIT 1",
                (),
                |row| Ok(read_amount(row.get_ref(0)?)),
            )
            .optional()?;

        let Some(amount) = amount else {
            return Ok(MonthlyLimit::DEFAULT);
        };

        Ok(MonthlyLimit::new(amount).unwrap_or_else(|error| {
            tracing::warn!("ignoring stored monthly limit: {error}");
            MonthlyLimit::DEFAULT
        }))
    }

    fn set_limit(&self, limit: MonthlyLimit) -> Result<(), Error> {
        self.lock()?.execute(
            "INSERT INTO monthly_limit (monthly_limit) VALUES (?1)",
            (limit.amount().to_string(),),
        )?;

        Ok(())
    }

    fn fetch_expenses(&self) -> Result<Vec<Expense>, Error> {
        self.lock()?
            .prepare(&format!(
                "{SELECT_EXPENSE_COLUMNS} ORDER BY date DESC, id DESC"
            ))?
            .query_map((), Self::map_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect()
    }

    fn fetch_expenses_in_month(&self, year_month: YearMonth) -> Result<Vec<Expense>, Error> {
        let year = format!("{:04}", year_month.year());
        let month = format!("{:02}", year_month.month() as u8);

        self.lock()?
            .prepare(&format!(
                "{SELECT_EXPENSE_COLUMNS}
                WHERE strftime('%Y', date) = ?1 AND strftime('%m', date) = ?2
                ORDER BY date DESC, id DESC"
            ))?
            .query_map((year, month), Self::map_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::from))
            .collect()
    }

    fn get_expense(&self, id: ExpenseId) -> Result<Expense, Error> {
        let expense = self
            .lock()?
            .prepare(&format!("{SELECT_EXPENSE_COLUMNS} WHERE id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(expense)
    }

    fn create_expense(&self, expense: NewExpense) -> Result<Expense, Error> {
        let expense = self
            .lock()?
            .prepare(
                "INSERT INTO expense (platform, category, amount, date)
                VALUES (?1, ?2, ?3, ?4)
                RETURNING id, platform, category, amount, date",
            )?
            .query_row(
                (
                    expense.platform(),
                    expense.category(),
                    expense.amount().to_string(),
                    expense.date(),
                ),
                Self::map_row,
            )?;

        Ok(expense)
    }

    fn update_expense(&self, id: ExpenseId, expense: NewExpense) -> Result<Expense, Error> {
        self.lock()?
            .prepare(
                "UPDATE expense
                SET platform = ?1, category = ?2, amount = ?3, date = ?4
                WHERE id = ?5
                RETURNING id, platform, category, amount, date",
            )?
            .query_row(
                (
                    expense.platform(),
                    expense.category(),
                    expense.amount().to_string(),
                    expense.date(),
                    id,
                ),
                Self::map_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingExpense,
                error => error.into(),
            })
    }

    fn delete_expense(&self, id: ExpenseId) -> Result<(), Error> {
        let rows_affected = self
            .lock()?
            .execute("DELETE FROM expense WHERE id = ?1", (id,))?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingExpense);
        }

        Ok(())
    }

    fn check_health(&self) -> Result<(), Error> {
        self.lock()?
            .query_row("SELECT 1", (), |row| row.get::<_, i64>(0))?;

        Ok(())
    }
}
