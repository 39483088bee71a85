//! Application router configuration for the pages, the dashboard forms and the JSON API.

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::{
    AppState, api,
    dashboard::{
        create_expense_endpoint, delete_expense_endpoint, get_category_suggestion,
        get_dashboard_page, set_limit_endpoint,
    },
    endpoints,
    home::get_home_page,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_home_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let form_routes = Router::new()
        .route(endpoints::EXPENSES_FORM, post(create_expense_endpoint))
        .route(
            endpoints::DELETE_EXPENSE_FORM,
            delete(delete_expense_endpoint),
        )
        .route(endpoints::LIMIT_FORM, post(set_limit_endpoint))
        .route(
            endpoints::CATEGORY_SUGGESTION,
            get(get_category_suggestion),
        );

    let api_routes = Router::new()
        .route(endpoints::LIMIT_API, get(api::get_limit).post(api::set_limit))
        .route(
            endpoints::EXPENSES_API,
            get(api::get_expenses).post(api::create_expense),
        )
        .route(
            endpoints::EXPENSES_IN_MONTH_API,
            get(api::get_expenses_in_month),
        )
        .route(
            endpoints::EXPENSE_API,
            put(api::update_expense).delete(api::delete_expense),
        )
        .route(endpoints::STATISTICS_API, get(api::get_statistics))
        .route(endpoints::HEALTH_API, get(api::get_health))
        .route(endpoints::CATEGORIZE_API, get(api::get_category_guess));

    page_routes
        .merge(form_routes)
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
