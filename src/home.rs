//! The landing page with a preview of what has been spent so far.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    AppState,
    aggregation::compute_total,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, base, format_currency},
    navigation::NavBar,
    stores::ExpenseStore,
};

/// The state needed for the home page.
#[derive(Clone)]
pub struct HomeState {
    pub store: Arc<dyn ExpenseStore>,
}

impl FromRef<AppState> for HomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

pub async fn get_home_page(State(state): State<HomeState>) -> Response {
    match state.store.fetch_expenses() {
        Ok(expenses) => home_view(compute_total(&expenses), expenses.len()).into_response(),
        Err(error) => {
            tracing::error!("could not fetch expenses for the home page: {error}");
            error.into_page_response()
        }
    }
}

fn home_view(total_spent: Decimal, transaction_count: usize) -> Markup {
    let nav_bar = NavBar::new(endpoints::ROOT).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-4xl font-bold mb-2" { "MoneySaver" }
            p class="mb-8 text-gray-600 dark:text-gray-400"
            {
                "Track your spending against a monthly budget."
            }

            div class="grid grid-cols-1 sm:grid-cols-2 gap-4 w-full max-w-xl mb-8"
            {
                div id="preview-total" class=(CARD_STYLE)
                {
                    h2 class="text-sm font-medium text-gray-600 dark:text-gray-400" { "Total Spent" }
                    p class="text-2xl font-bold mt-1" { (format_currency(total_spent)) }
                }

                div id="preview-count" class=(CARD_STYLE)
                {
                    h2 class="text-sm font-medium text-gray-600 dark:text-gray-400" { "Transactions" }
                    p class="text-2xl font-bold mt-1" { (transaction_count) }
                }
            }

            a href=(endpoints::DASHBOARD_VIEW) class={(BUTTON_PRIMARY_STYLE) " max-w-xs text-center"}
            {
                "Open Dashboard"
            }
        }
    );

    base("Home", &[], &content)
}
