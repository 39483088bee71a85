//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// Identifies an [Expense](crate::Expense) in any of the stores.
pub type ExpenseId = DatabaseId;
