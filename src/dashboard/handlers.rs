//! Dashboard HTTP handlers and view rendering.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    aggregation::BudgetSummary,
    budget::YearMonth,
    dashboard::{
        cards::{budget_progress_view, stat_cards_view},
        charts::{ECHARTS_URL, category_chart, category_chart_view, charts_script},
        forms::{expense_form_view, limit_form_view},
        tables::{category_list_view, expense_table_view},
    },
    endpoints,
    html::{CARD_STYLE, HeadElement, LINK_STYLE, base},
    navigation::NavBar,
    stores::ExpenseStore,
    timezone::local_today,
};

/// The state needed for the dashboard page and its forms.
#[derive(Clone)]
pub struct DashboardState {
    /// Where expenses and the monthly limit are kept.
    pub store: Arc<dyn ExpenseStore>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Restricts the dashboard to one month. Without it every expense is shown.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub year: Option<i32>,
    pub month: Option<u8>,
}

impl DashboardQuery {
    fn year_month(&self) -> Result<Option<YearMonth>, Error> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => YearMonth::new(year, month).map(Some),
            (None, None) => Ok(None),
            (None, Some(_)) => Err(Error::MissingField("year")),
            (Some(_), None) => Err(Error::MissingField("month")),
        }
    }
}

/// The URL of the dashboard for a single month.
fn month_url(year_month: YearMonth) -> String {
    format!(
        "{}?year={}&month={}",
        endpoints::DASHBOARD_VIEW,
        year_month.year(),
        u8::from(year_month.month())
    )
}

/// Display the budget overview, the forms and the expense table.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    match build_dashboard(&state, &query) {
        Ok(page) => page.into_response(),
        Err(error) => error.into_page_response(),
    }
}

fn build_dashboard(state: &DashboardState, query: &DashboardQuery) -> Result<Markup, Error> {
    let year_month = query.year_month()?;
    let today = local_today(&state.local_timezone)?;

    let limit = state
        .store
        .fetch_limit()
        .inspect_err(|error| tracing::error!("could not fetch monthly limit: {error}"))?;

    let expenses = match year_month {
        Some(year_month) => state.store.fetch_expenses_in_month(year_month),
        None => state.store.fetch_expenses(),
    }
    .inspect_err(|error| tracing::error!("could not fetch expenses: {error}"))?;

    let summary = BudgetSummary::summarize(limit, expenses);

    Ok(dashboard_view(&summary, year_month, today))
}

fn period_view(year_month: Option<YearMonth>, today: Date) -> Markup {
    html! {
        div id="period" class="flex flex-wrap items-baseline justify-between w-full mb-6 gap-2"
        {
            @match year_month {
                Some(year_month) => {
                    h2 class="text-xl font-semibold" { (year_month) }

                    div class="flex gap-4 text-sm"
                    {
                        a href=(month_url(year_month.previous())) class=(LINK_STYLE) { "Previous month" }
                        a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "All expenses" }
                        a href=(month_url(year_month.next())) class=(LINK_STYLE) { "Next month" }
                    }
                }
                None => {
                    h2 class="text-xl font-semibold" { "All expenses" }

                    a href=(month_url(YearMonth::of(today))) class={(LINK_STYLE) " text-sm"}
                    {
                        "This month"
                    }
                }
            }
        }
    }
}

fn dashboard_view(summary: &BudgetSummary, year_month: Option<YearMonth>, today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let chart = category_chart(&summary.category_totals);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            h1 class="text-3xl font-bold mb-2" { "MoneySaver Dashboard" }

            (period_view(year_month, today))
            (stat_cards_view(summary))
            (budget_progress_view(summary))

            div class="grid grid-cols-1 lg:grid-cols-2 gap-4 w-full mb-6"
            {
                div class={(CARD_STYLE) " space-y-6"}
                {
                    section
                    {
                        h2 class="text-lg font-semibold mb-4" { "Add Expense" }
                        (expense_form_view(today))
                    }

                    section
                    {
                        h2 class="text-lg font-semibold mb-4" { "Monthly Limit" }
                        (limit_form_view(summary.limit))
                    }
                }

                section class=(CARD_STYLE)
                {
                    h2 class="text-lg font-semibold mb-4" { "Spending by Category" }
                    (category_list_view(&summary.category_totals))
                    (category_chart_view(chart.as_ref()))
                }
            }

            section class="w-full"
            {
                h2 class="text-lg font-semibold mb-4" { "Expenses" }
                (expense_table_view(&summary.expenses))
            }
        }
    );

    let scripts = match chart {
        Some(chart) => vec![
            HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
            charts_script(&[chart]),
        ],
        None => Vec::new(),
    };

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod dashboard_tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rust_decimal_macros::dec;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        AppState, endpoints,
        test_utils::{assert_valid_html, get_test_state, new_expense},
    };

    use super::get_dashboard_page;

    fn get_test_server(state: AppState) -> TestServer {
        let app = Router::new()
            .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn seed(state: &AppState) {
        for (platform, amount, date) in [
            ("Swiggy", dec!(100), date!(2024 - 01 - 05)),
            ("Uber", dec!(50), date!(2024 - 01 - 20)),
            ("Netflix", dec!(200), date!(2024 - 02 - 01)),
        ] {
            state
                .store
                .create_expense(new_expense(platform, amount, date))
                .unwrap();
        }
    }

    #[track_caller]
    fn select_count(html: &Html, selector: &str) -> usize {
        html.select(&Selector::parse(selector).unwrap()).count()
    }

    #[tokio::test]
    async fn shows_empty_dashboard() {
        let server = get_test_server(get_test_state());

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        assert_eq!(select_count(&html, "#empty-chart"), 1);
        assert_eq!(select_count(&html, "#category-chart"), 0);
        assert!(!response.text().contains("echarts"));
        assert_eq!(select_count(&html, "form#expense-form"), 1);
        assert_eq!(select_count(&html, "form#limit-form"), 1);
        assert!(response.text().contains("No expenses yet. Add some to see the distribution!"));
    }

    #[tokio::test]
    async fn shows_all_expenses() {
        let state = get_test_state();
        seed(&state);
        let server = get_test_server(state);

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        assert_eq!(select_count(&html, "#expense-table tbody tr[data-expense-id]"), 3);
        assert_eq!(select_count(&html, "#category-list li"), 3);
        assert_eq!(select_count(&html, "#category-chart"), 1);
        assert!(response.text().contains("echarts"));

        let first_row: String = html
            .select(&Selector::parse("#expense-table tbody tr").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();
        assert!(first_row.contains("Netflix"), "want newest expense first, got {first_row}");
    }

    #[tokio::test]
    async fn filters_to_month() {
        let state = get_test_state();
        seed(&state);
        let server = get_test_server(state);

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_query_param("year", 2024)
            .add_query_param("month", 1)
            .await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_eq!(select_count(&html, "#expense-table tbody tr[data-expense-id]"), 2);
        assert!(response.text().contains("January 2024"));
        assert!(response.text().contains("/dashboard?year=2023&amp;month=12"));
        assert!(response.text().contains("/dashboard?year=2024&amp;month=2"));
    }

    #[tokio::test]
    async fn rejects_invalid_month() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_query_param("year", 2024)
            .add_query_param("month", 13)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_month_without_year() {
        let server = get_test_server(get_test_state());

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_query_param("month", 1)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
