//! The dashboard's expense and limit forms and the handlers they post to.

use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRefresh;
use maud::{Markup, html};
use rust_decimal::Decimal;
use serde::Deserialize;
use time::{Date, macros::format_description};

use crate::{
    Error, NewExpense,
    alert::Alert,
    budget::MonthlyLimit,
    category::{Category, auto_categorize},
    dashboard::handlers::DashboardState,
    database_id::ExpenseId,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, format_currency},
};

/// The form data for adding an expense from the dashboard.
///
/// Fields are read as text so that missing or malformed values are reported
/// as alerts by [NewExpense::try_from].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExpenseForm {
    pub platform: String,
    /// A category label, or empty to guess it from the platform.
    pub category: String,
    pub amount: String,
    /// The date as `YYYY-MM-DD`, as sent by a date input.
    pub date: String,
}

impl TryFrom<ExpenseForm> for NewExpense {
    type Error = Error;

    fn try_from(form: ExpenseForm) -> Result<Self, Self::Error> {
        let amount = parse_decimal(&form.amount)?;
        let date = parse_date(&form.date)?;
        let category = match form.category.trim() {
            "" => None,
            label => Some(label.parse::<Category>()?),
        };

        NewExpense::new(&form.platform, category, amount, date)
    }
}

/// The form data for replacing the monthly limit.
#[derive(Debug, Deserialize)]
pub struct LimitForm {
    pub monthly_limit: String,
}

/// The query sent when the platform input changes.
#[derive(Debug, Default, Deserialize)]
pub struct CategorySuggestionQuery {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub category: String,
}

fn parse_decimal(text: &str) -> Result<Decimal, Error> {
    Decimal::from_str(text.trim()).map_err(|_| Error::InvalidAmount(text.to_owned()))
}

fn parse_date(text: &str) -> Result<Date, Error> {
    let text = text.trim();

    if text.is_empty() {
        return Err(Error::MissingField("date"));
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// The category to select after the platform changed.
///
/// A category the user picked is kept. Only an empty selection or
/// [Category::Other] is replaced by the guess for `platform`.
pub(super) fn suggest_category(platform: &str, current: &str) -> Option<Category> {
    let current = match current.trim() {
        "" => None,
        label => label.parse::<Category>().ok(),
    };

    match current {
        Some(category) if category != Category::Other => Some(category),
        _ if platform.trim().is_empty() => current,
        _ => Some(auto_categorize(platform)),
    }
}

pub(super) fn category_select_view(selected: Option<Category>) -> Markup {
    html! {
        div id="category-select"
        {
            select id="category" name="category" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[selected.is_none()] { "Auto-detect" }

                @for category in Category::ALL {
                    option value=(category) selected[selected == Some(category)] { (category) }
                }
            }
        }
    }
}

pub(super) fn expense_form_view(today: Date) -> Markup {
    html! {
        form
            id="expense-form"
            hx-post=(endpoints::EXPENSES_FORM)
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            div
            {
                label for="platform" class=(FORM_LABEL_STYLE) { "Platform" }
                input
                    id="platform"
                    name="platform"
                    type="text"
                    placeholder="e.g. Swiggy, Uber, Netflix"
                    required
                    autocomplete="off"
                    hx-get=(endpoints::CATEGORY_SUGGESTION)
                    hx-trigger="input changed delay:300ms"
                    hx-target="#category-select"
                    hx-swap="outerHTML"
                    hx-include="closest form"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                (category_select_view(None))
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                input
                    id="amount"
                    name="amount"
                    type="number"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input
                    id="date"
                    name="date"
                    type="date"
                    value=(today)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
        }
    }
}

pub(super) fn limit_form_view(limit: MonthlyLimit) -> Markup {
    html! {
        form
            id="limit-form"
            hx-post=(endpoints::LIMIT_FORM)
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            div
            {
                label for="monthly_limit" class=(FORM_LABEL_STYLE) { "Monthly Limit" }
                input
                    id="monthly_limit"
                    name="monthly_limit"
                    type="number"
                    step="0.01"
                    min="0"
                    value=(limit)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Set Limit" }
        }
    }
}

/// A route handler for adding an expense, refreshes the dashboard on success.
pub async fn create_expense_endpoint(
    State(state): State<DashboardState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let new_expense = match NewExpense::try_from(form) {
        Ok(new_expense) => new_expense,
        Err(error) => return error.into_alert_response(),
    };

    match state.store.create_expense(new_expense) {
        Ok(expense) => (
            HxRefresh(true),
            Alert::Success {
                message: "Expense added".to_owned(),
                details: format!(
                    "{} at {} filed under {}.",
                    format_currency(expense.amount),
                    expense.platform,
                    expense.category
                ),
            },
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create expense: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for deleting an expense from the table.
pub async fn delete_expense_endpoint(
    State(state): State<DashboardState>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    match state.store.delete_expense(expense_id) {
        Ok(()) => (
            HxRefresh(true),
            Alert::Success {
                message: "Expense deleted".to_owned(),
                details: String::new(),
            },
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not delete expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for replacing the monthly limit, refreshes the dashboard on success.
pub async fn set_limit_endpoint(
    State(state): State<DashboardState>,
    Form(form): Form<LimitForm>,
) -> Response {
    let limit = match parse_decimal(&form.monthly_limit).and_then(MonthlyLimit::new) {
        Ok(limit) => limit,
        Err(error) => return error.into_alert_response(),
    };

    match state.store.set_limit(limit) {
        Ok(()) => {
            tracing::info!("Monthly limit set to {limit}");

            (
                HxRefresh(true),
                Alert::Success {
                    message: "Monthly limit updated".to_owned(),
                    details: format!("Your monthly limit is now {}.", format_currency(limit.amount())),
                },
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not set monthly limit: {error}");
            error.into_alert_response()
        }
    }
}

/// Re-render the category select with a guess for the typed platform.
pub async fn get_category_suggestion(Query(query): Query<CategorySuggestionQuery>) -> Markup {
    category_select_view(suggest_category(&query.platform, &query.category))
}

#[cfg(test)]
mod suggest_category_tests {
    use crate::category::Category;

    use super::suggest_category;

    #[test]
    fn guesses_when_nothing_selected() {
        assert_eq!(suggest_category("Zomato", ""), Some(Category::Food));
    }

    #[test]
    fn replaces_other() {
        assert_eq!(suggest_category("Uber", "Other"), Some(Category::Transport));
    }

    #[test]
    fn keeps_chosen_category() {
        assert_eq!(suggest_category("Uber", "Bills"), Some(Category::Bills));
    }

    #[test]
    fn unknown_platform_selects_other() {
        assert_eq!(suggest_category("Corner shop", ""), Some(Category::Other));
    }

    #[test]
    fn empty_platform_keeps_selection() {
        assert_eq!(suggest_category("  ", ""), None);
    }
}

#[cfg(test)]
mod form_tests {
    use rust_decimal_macros::dec;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        Error, NewExpense,
        budget::MonthlyLimit,
        category::Category,
        endpoints,
        test_utils::{assert_form_input, assert_hx_endpoint, assert_valid_html, must_get_form},
    };

    use super::{ExpenseForm, LimitForm, category_select_view, expense_form_view, limit_form_view};

    #[test]
    fn parses_expense_form() {
        let form: ExpenseForm =
            serde_html_form::from_str("platform=Swiggy&category=&amount=250.50&date=2024-01-05")
                .unwrap();

        let expense = NewExpense::try_from(form).unwrap();

        assert_eq!(expense.platform(), "Swiggy");
        assert_eq!(expense.category(), Category::Food);
        assert_eq!(expense.amount(), dec!(250.50));
        assert_eq!(expense.date(), date!(2024 - 01 - 05));
    }

    #[test]
    fn expense_form_rejects_text_amount() {
        let form: ExpenseForm =
            serde_html_form::from_str("platform=Swiggy&amount=lots&date=2024-01-05").unwrap();

        assert_eq!(
            NewExpense::try_from(form),
            Err(Error::InvalidAmount("lots".to_owned()))
        );
    }

    #[test]
    fn expense_form_reports_missing_and_malformed_dates() {
        let form: ExpenseForm = serde_html_form::from_str("platform=Swiggy&amount=250").unwrap();
        assert_eq!(NewExpense::try_from(form), Err(Error::MissingField("date")));

        let form: ExpenseForm =
            serde_html_form::from_str("platform=Swiggy&amount=250&date=2024-1-5").unwrap();
        assert_eq!(
            NewExpense::try_from(form),
            Err(Error::InvalidDate("2024-1-5".to_owned()))
        );
    }

    #[test]
    fn parses_limit_form() {
        let form: LimitForm = serde_html_form::from_str("monthly_limit=30000").unwrap();

        assert_eq!(form.monthly_limit, "30000");
    }

    #[test]
    fn expense_form_posts_to_expenses() {
        let html = Html::parse_fragment(&expense_form_view(date!(2024 - 01 - 05)).into_string());

        assert_valid_html(&html);
        let form = must_get_form(&html, "expense-form");
        assert_hx_endpoint(&form, endpoints::EXPENSES_FORM, "hx-post");
        assert_form_input(&form, "platform", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date", "date");

        let date_input = form
            .select(&Selector::parse("input[name='date']").unwrap())
            .next()
            .unwrap();
        assert_eq!(date_input.value().attr("value"), Some("2024-01-05"));
    }

    #[test]
    fn limit_form_shows_current_limit() {
        let limit = MonthlyLimit::new(dec!(30000)).unwrap();
        let html = Html::parse_fragment(&limit_form_view(limit).into_string());

        assert_valid_html(&html);
        let form = must_get_form(&html, "limit-form");
        assert_hx_endpoint(&form, endpoints::LIMIT_FORM, "hx-post");
        assert_form_input(&form, "monthly_limit", "number");
        let input = form
            .select(&Selector::parse("input[name='monthly_limit']").unwrap())
            .next()
            .unwrap();
        assert_eq!(input.value().attr("value"), Some("30000"));
    }

    #[test]
    fn category_select_marks_selection() {
        let html = Html::parse_fragment(&category_select_view(Some(Category::Food)).into_string());

        let selected: Vec<_> = html
            .select(&Selector::parse("option[selected]").unwrap())
            .map(|option| option.value().attr("value").unwrap().to_owned())
            .collect();
        assert_eq!(selected, vec!["Food"]);

        let options = html.select(&Selector::parse("option").unwrap()).count();
        assert_eq!(options, Category::ALL.len() + 1);
    }
}
