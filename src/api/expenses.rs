//! Listing, creating, updating and deleting expenses.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

use crate::{
    Error, Expense, NewExpense,
    api::ApiState,
    budget::YearMonth,
    category::Category,
    database_id::ExpenseId,
    expense::parse_amount,
};

/// The body of a request to create or replace an expense.
///
/// Every field is optional so that a missing field can be reported by name.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseRequest {
    pub platform: Option<String>,
    /// A category label. Missing or empty means the category is guessed
    /// from the platform.
    pub category: Option<String>,
    /// A number or a numeric string.
    pub amount: Option<Value>,
    pub date: Option<Date>,
}

impl TryFrom<ExpenseRequest> for NewExpense {
    type Error = Error;

    fn try_from(request: ExpenseRequest) -> Result<Self, Self::Error> {
        let platform = request.platform.ok_or(Error::MissingField("platform"))?;

        let amount = match request.amount {
            None | Some(Value::Null) => return Err(Error::MissingField("amount")),
            Some(value) => {
                parse_amount(&value).ok_or_else(|| Error::InvalidAmount(value.to_string()))?
            }
        };

        let date = request.date.ok_or(Error::MissingField("date"))?;

        let category = match request.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(label) => Some(label.parse::<Category>()?),
        };

        NewExpense::new(&platform, category, amount, date)
    }
}

#[derive(Debug, Serialize)]
pub struct ExpensesResponse {
    expenses: Vec<Expense>,
}

#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    expense: Expense,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    success: bool,
}

/// All expenses, most recent first.
pub async fn get_expenses(State(state): State<ApiState>) -> Result<Json<ExpensesResponse>, Error> {
    let expenses = state
        .store
        .fetch_expenses()
        .inspect_err(|error| tracing::error!("could not fetch expenses: {error}"))?;

    Ok(Json(ExpensesResponse { expenses }))
}

/// The expenses dated in one calendar month, most recent first.
pub async fn get_expenses_in_month(
    State(state): State<ApiState>,
    Path((year, month)): Path<(i32, u8)>,
) -> Result<Json<ExpensesResponse>, Error> {
    let year_month = YearMonth::new(year, month)?;
    let expenses = state
        .store
        .fetch_expenses_in_month(year_month)
        .inspect_err(|error| tracing::error!("could not fetch expenses for {year_month}: {error}"))?;

    Ok(Json(ExpensesResponse { expenses }))
}

/// Create an expense and respond with the stored expense and its new ID.
pub async fn create_expense(
    State(state): State<ApiState>,
    payload: Result<Json<ExpenseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseResponse>), Error> {
    let Json(request) = payload?;
    let new_expense = NewExpense::try_from(request)?;

    let expense = state
        .store
        .create_expense(new_expense)
        .inspect_err(|error| tracing::error!("could not create expense: {error}"))?;

    tracing::debug!("Created expense {} for {}", expense.id, expense.platform);

    Ok((StatusCode::CREATED, Json(ExpenseResponse { expense })))
}

/// Replace every field of an existing expense.
pub async fn update_expense(
    State(state): State<ApiState>,
    Path(expense_id): Path<ExpenseId>,
    payload: Result<Json<ExpenseRequest>, JsonRejection>,
) -> Result<Json<ExpenseResponse>, Error> {
    let Json(request) = payload?;
    let new_expense = NewExpense::try_from(request)?;

    let expense = state.store.update_expense(expense_id, new_expense)?;

    Ok(Json(ExpenseResponse { expense }))
}

pub async fn delete_expense(
    State(state): State<ApiState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<DeleteResponse>, Error> {
    state.store.delete_expense(expense_id)?;

    tracing::debug!("Deleted expense {expense_id}");

    Ok(Json(DeleteResponse { success: true }))
}


#[cfg(test)]
mod expenses_api_tests {
    use axum::{
        Router,
        http::StatusCode,
        routing::{get, put},
    };
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::get_test_state,
    };

    use super::{create_expense, delete_expense, get_expenses, get_expenses_in_month, update_expense};

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route(endpoints::EXPENSES_API, get(get_expenses).post(create_expense))
            .route(endpoints::EXPENSES_IN_MONTH_API, get(get_expenses_in_month))
            .route(
                endpoints::EXPENSE_API,
                put(update_expense).delete(delete_expense),
            )
            .with_state(get_test_state());

        TestServer::try_new(app).expect("Could not create test server.")
    }

    async fn post_expense(server: &TestServer, body: Value) -> Value {
        let response = server.post(endpoints::EXPENSES_API).json(&body).await;
        response.assert_status(StatusCode::CREATED);

        response.json::<Value>()["expense"].clone()
    }

    fn ids(body: &Value) -> Vec<i64> {
        body["expenses"]
            .as_array()
            .unwrap()
            .iter()
            .map(|expense| expense["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn creates_expense_with_guessed_category() {
        let server = get_test_server();

        let expense = post_expense(
            &server,
            json!({ "platform": "Swiggy", "amount": 250.5, "date": "2024-01-05" }),
        )
        .await;

        assert!(expense["id"].as_i64().is_some());
        assert_eq!(expense["platform"], "Swiggy");
        assert_eq!(expense["category"], "Food");
        assert_eq!(expense["amount"].as_f64(), Some(250.5));
        assert_eq!(expense["date"], "2024-01-05");
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let server = get_test_server();

        let response = server
            .post(endpoints::EXPENSES_API)
            .json(&json!({ "platform": "Swiggy" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Missing required field: amount");

        let body: Value = server.get(endpoints::EXPENSES_API).await.json();
        assert!(body["expenses"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_non_positive_amount() {
        let server = get_test_server();

        let response = server
            .post(endpoints::EXPENSES_API)
            .json(&json!({ "platform": "Swiggy", "amount": 0, "date": "2024-01-05" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_rejects_amount_above_maximum() {
        let server = get_test_server();

        let response = server
            .post(endpoints::EXPENSES_API)
            .json(&json!({
                "platform": "Store",
                "amount": "1000000000000000000000000000",
                "date": "2024-01-05"
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("greater than the maximum"));

        let body: Value = server.get(endpoints::EXPENSES_API).await.json();
        assert!(ids(&body).is_empty());
    }

    #[tokio::test]
    async fn lists_expenses_most_recent_first() {
        let server = get_test_server();
        let first = post_expense(
            &server,
            json!({ "platform": "Uber", "amount": 100, "date": "2024-01-05" }),
        )
        .await;
        let second = post_expense(
            &server,
            json!({ "platform": "Ola", "amount": 200, "date": "2024-01-10" }),
        )
        .await;
        let third = post_expense(
            &server,
            json!({ "platform": "Gym", "amount": 300, "date": "2024-01-05" }),
        )
        .await;

        let response = server.get(endpoints::EXPENSES_API).await;

        response.assert_status_ok();
        assert_eq!(
            ids(&response.json()),
            vec![
                second["id"].as_i64().unwrap(),
                third["id"].as_i64().unwrap(),
                first["id"].as_i64().unwrap()
            ]
        );
    }

    #[tokio::test]
    async fn lists_expenses_in_month() {
        let server = get_test_server();
        let january = post_expense(
            &server,
            json!({ "platform": "Uber", "amount": 100, "date": "2024-01-31" }),
        )
        .await;
        post_expense(
            &server,
            json!({ "platform": "Ola", "amount": 200, "date": "2024-02-01" }),
        )
        .await;

        let response = server.get("/api/expenses/2024/1").await;

        response.assert_status_ok();
        assert_eq!(ids(&response.json()), vec![january["id"].as_i64().unwrap()]);
    }

    #[tokio::test]
    async fn month_out_of_range_is_bad_request() {
        let server = get_test_server();

        let response = server.get("/api/expenses/2024/13").await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn updates_expense() {
        let server = get_test_server();
        let expense = post_expense(
            &server,
            json!({ "platform": "Uber", "amount": 100, "date": "2024-01-05" }),
        )
        .await;
        let id = expense["id"].as_i64().unwrap();

        let response = server
            .put(&format_endpoint(endpoints::EXPENSE_API, id))
            .json(&json!({
                "platform": "Amazon",
                "category": "Shopping",
                "amount": "999.99",
                "date": "2024-01-06"
            }))
            .await;

        response.assert_status_ok();
        let updated = &response.json::<Value>()["expense"];
        assert_eq!(updated["id"].as_i64(), Some(id));
        assert_eq!(updated["platform"], "Amazon");
        assert_eq!(updated["category"], "Shopping");
        assert_eq!(updated["amount"].as_f64(), Some(999.99));
    }

    #[tokio::test]
    async fn update_missing_expense_is_not_found() {
        let server = get_test_server();

        let response = server
            .put(&format_endpoint(endpoints::EXPENSE_API, 42))
            .json(&json!({ "platform": "Uber", "amount": 100, "date": "2024-01-05" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Expense not found");
    }

    #[tokio::test]
    async fn deletes_expense() {
        let server = get_test_server();
        let expense = post_expense(
            &server,
            json!({ "platform": "Uber", "amount": 100, "date": "2024-01-05" }),
        )
        .await;
        let id = expense["id"].as_i64().unwrap();

        let response = server
            .delete(&format_endpoint(endpoints::EXPENSE_API, id))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["success"], true);
        let body: Value = server.get(endpoints::EXPENSES_API).await.json();
        assert!(body["expenses"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_expense_is_not_found() {
        let server = get_test_server();

        let response = server
            .delete(&format_endpoint(endpoints::EXPENSE_API, 42))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["error"], "Expense not found");
    }
}
