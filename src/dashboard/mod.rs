//! Dashboard module
//!
//! Provides the budget overview page: stat cards, a progress bar, the
//! category breakdown and chart, the expense table and the forms for adding
//! expenses and setting the monthly limit.

mod cards;
mod charts;
mod forms;
mod handlers;
mod tables;

pub use forms::{
    create_expense_endpoint, delete_expense_endpoint, get_category_suggestion, set_limit_endpoint,
};
pub use handlers::{DashboardState, get_dashboard_page};
