use std::collections::BTreeMap;

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{Error, aggregation::BudgetSummary, api::ApiState, category::Category};

/// The budget figures over every stored expense.
///
/// `remaining` is clamped at zero and `percent` is capped at 100 and rounded
/// to one decimal place, the same values the dashboard shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    monthly_limit: Decimal,
    total_spent: Decimal,
    remaining: Decimal,
    percent: Decimal,
    transaction_count: usize,
    category_breakdown: BTreeMap<Category, Decimal>,
}

impl From<BudgetSummary> for Statistics {
    fn from(summary: BudgetSummary) -> Self {
        Self {
            monthly_limit: summary.limit.amount(),
            total_spent: summary.total,
            remaining: summary.display_remaining(),
            percent: summary.display_percent().round_dp(1),
            transaction_count: summary.transaction_count,
            category_breakdown: summary.category_totals,
        }
    }
}

pub async fn get_statistics(State(state): State<ApiState>) -> Result<Json<Statistics>, Error> {
    let limit = state
        .store
        .fetch_limit()
        .inspect_err(|error| tracing::error!("could not fetch monthly limit: {error}"))?;
    let expenses = state
        .store
        .fetch_expenses()
        .inspect_err(|error| tracing::error!("could not fetch expenses: {error}"))?;

    Ok(Json(BudgetSummary::summarize(limit, expenses).into()))
}

#[cfg(test)]
mod statistics_tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use time::macros::date;

    use crate::{
        MonthlyLimit, endpoints,
        test_utils::{get_test_state, new_expense},
    };

    use super::get_statistics;

    #[tokio::test]
    async fn summarizes_all_expenses() {
        let state = get_test_state();
        state
            .store
            .set_limit(MonthlyLimit::new(dec!(5000)).unwrap())
            .unwrap();
        for (platform, amount) in [("Swiggy", dec!(1000)), ("Zomato", dec!(500)), ("Amazon", dec!(2000))] {
            state
                .store
                .create_expense(new_expense(platform, amount, date!(2024 - 01 - 05)))
                .unwrap();
        }
        let app = Router::new()
            .route(endpoints::STATISTICS_API, get(get_statistics))
            .with_state(state);
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server.get(endpoints::STATISTICS_API).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["monthlyLimit"].as_f64(), Some(5000.0));
        assert_eq!(body["totalSpent"].as_f64(), Some(3500.0));
        assert_eq!(body["remaining"].as_f64(), Some(1500.0));
        assert_eq!(body["percent"].as_f64(), Some(70.0));
        assert_eq!(body["transactionCount"], 3);
        assert_eq!(body["categoryBreakdown"]["Food"].as_f64(), Some(1500.0));
        assert_eq!(body["categoryBreakdown"]["Shopping"].as_f64(), Some(2000.0));
        assert!(body["categoryBreakdown"].get("Other").is_none());
    }

    #[tokio::test]
    async fn clamps_values_when_over_budget() {
        let state = get_test_state();
        state
            .store
            .set_limit(MonthlyLimit::new(dec!(1000)).unwrap())
            .unwrap();
        state
            .store
            .create_expense(new_expense("Flipkart", dec!(1500), date!(2024 - 01 - 05)))
            .unwrap();
        let app = Router::new()
            .route(endpoints::STATISTICS_API, get(get_statistics))
            .with_state(state);
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let body: Value = server.get(endpoints::STATISTICS_API).await.json();

        assert_eq!(body["remaining"].as_f64(), Some(0.0));
        assert_eq!(body["percent"].as_f64(), Some(100.0));
    }
}
