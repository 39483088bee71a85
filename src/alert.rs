//! Alert messages that HTMX swaps into the page after a form submission.
//!
//! Alerts are rendered into the `#alert-container` element declared in
//! [base](crate::html::base).

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

/// A success or error message with optional details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success { message: String, details: String },
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (message, details, container_style, text_style) = match self {
            Alert::Success { message, details } => (
                message,
                details,
                "flex items-start p-4 mb-4 rounded-lg border border-green-300 \
                bg-green-50 dark:bg-gray-800 dark:border-green-800",
                "text-green-800 dark:text-green-400",
            ),
            Alert::Error { message, details } => (
                message,
                details,
                "flex items-start p-4 mb-4 rounded-lg border border-red-300 \
                bg-red-50 dark:bg-gray-800 dark:border-red-800",
                "text-red-800 dark:text-red-400",
            ),
        };

        html! {
            div
                class=(container_style)
                role="alert"
            {
                div class=(text_style)
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p class="text-sm mt-1" { (details) }
                    }
                }
            }
        }
    }

    /// Render the alert with `status_code`.
    ///
    /// HTMX only swaps error responses into `hx-target-error`, so error
    /// alerts should keep the status code of the error that caused them.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, Html(self.into_html().into_string())).into_response()
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_response_with_status(StatusCode::OK)
    }
}

#[cfg(test)]
mod alert_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::test_utils::{assert_valid_html, parse_html_fragment};

    use super::Alert;

    #[tokio::test]
    async fn success_alert_renders_message_and_details() {
        let alert = Alert::Success {
            message: "Expense added".to_owned(),
            details: "Swiggy was filed under Food".to_owned(),
        };

        let response = alert.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let paragraphs: Vec<String> = html
            .select(&Selector::parse("p").unwrap())
            .map(|p| p.text().collect())
            .collect();
        assert_eq!(paragraphs, vec!["Expense added", "Swiggy was filed under Food"]);
    }

    #[tokio::test]
    async fn omits_empty_details() {
        let alert = Alert::Error {
            message: "Something went wrong".to_owned(),
            details: String::new(),
        };

        let html = parse_html_fragment(alert.into_response()).await;

        assert_eq!(html.select(&Selector::parse("p").unwrap()).count(), 1);
    }
}
