//! Contains the trait for objects that store expenses and the monthly limit,
//! along with its implementations.

mod local;
mod sqlite;

pub use local::LocalExpenseStore;
pub use sqlite::{SQLiteExpenseStore, create_expense_table, create_monthly_limit_table};

use crate::{
    Error, Expense, NewExpense,
    budget::{MonthlyLimit, YearMonth},
    database_id::ExpenseId,
};

/// Handles the creation, retrieval, update and deletion of expenses, and
/// keeps the monthly limit.
///
/// Implementations are shared between request handlers, so they must do their
/// own locking.
pub trait ExpenseStore: Send + Sync {
    /// The current monthly limit, or [MonthlyLimit::DEFAULT] if none was set.
    fn fetch_limit(&self) -> Result<MonthlyLimit, Error>;

    /// Replace the monthly limit.
    fn set_limit(&self, limit: MonthlyLimit) -> Result<(), Error>;

    /// All expenses, most recent date first and, within a day, most recently
    /// created first.
    fn fetch_expenses(&self) -> Result<Vec<Expense>, Error>;

    /// The expenses dated in `year_month`, in the same order as [ExpenseStore::fetch_expenses].
    fn fetch_expenses_in_month(&self, year_month: YearMonth) -> Result<Vec<Expense>, Error>;

    /// Retrieve a single expense.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no expense has the ID `id`.
    fn get_expense(&self, id: ExpenseId) -> Result<Expense, Error>;

    /// Store a new expense and assign it an ID.
    fn create_expense(&self, expense: NewExpense) -> Result<Expense, Error>;

    /// Replace every field of the expense `id` except its ID.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingExpense] if no expense has the ID `id`.
    fn update_expense(&self, id: ExpenseId, expense: NewExpense) -> Result<Expense, Error>;

    /// Delete the expense `id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingExpense] if no expense has the ID `id`.
    fn delete_expense(&self, id: ExpenseId) -> Result<(), Error>;

    /// Check that the underlying storage can be reached.
    fn check_health(&self) -> Result<(), Error>;
}
