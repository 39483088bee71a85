//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/expenses/{expense_id}', use [format_endpoint].

/// The home page with a short summary and a link to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard with the budget overview, the expense form and the expense table.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route for the dashboard's new-expense form.
pub const EXPENSES_FORM: &str = "/expenses";
/// The route for deleting an expense from the dashboard table.
pub const DELETE_EXPENSE_FORM: &str = "/expenses/{expense_id}";
/// The route for the dashboard's set-limit form.
pub const LIMIT_FORM: &str = "/limit";
/// The route that re-renders the category select with a guess for the typed platform.
pub const CATEGORY_SUGGESTION: &str = "/expenses/category-suggestion";

/// The route to get or set the monthly limit.
pub const LIMIT_API: &str = "/api/limit";
/// The route to list or create expenses.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to list the expenses of one month.
pub const EXPENSES_IN_MONTH_API: &str = "/api/expenses/{year}/{month}";
/// The route to update or delete a single expense.
pub const EXPENSE_API: &str = "/api/expenses/{expense_id}";
/// The route for the budget statistics.
pub const STATISTICS_API: &str = "/api/statistics";
/// The route for checking that the server and its storage are up.
pub const HEALTH_API: &str = "/api/health";
/// The route for guessing the category of a platform.
pub const CATEGORIZE_API: &str = "/api/categorize";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/expenses/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
