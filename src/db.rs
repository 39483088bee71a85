//! Sets up the SQLite database used by [SQLiteExpenseStore](crate::stores::SQLiteExpenseStore).

use rusqlite::{Connection, Error};

use crate::stores::{create_expense_table, create_monthly_limit_table};

/// Create the application tables if they do not exist yet.
///
/// # Errors
/// Returns an error if a table could not be created or the transaction could
/// not be committed.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    create_expense_table(&transaction)?;
    create_monthly_limit_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
