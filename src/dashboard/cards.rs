//! The stat cards and budget progress bar at the top of the dashboard.

use maud::{Markup, html};

use crate::{
    aggregation::{BudgetStatus, BudgetSummary},
    html::{CARD_STYLE, format_currency, format_percent},
};

struct StatCard {
    title: &'static str,
    value: String,
    caption: Option<String>,
}

/// The four headline figures: budget, spent, remaining and the number of expenses.
pub(super) fn stat_cards_view(summary: &BudgetSummary) -> Markup {
    let cards = [
        StatCard {
            title: "Monthly Budget",
            value: format_currency(summary.limit.amount()),
            caption: None,
        },
        StatCard {
            title: "Total Spent",
            value: format_currency(summary.total),
            caption: Some(format!("{} of budget", format_percent(summary.display_percent()))),
        },
        StatCard {
            title: "Remaining",
            value: format_currency(summary.display_remaining()),
            caption: None,
        },
        StatCard {
            title: "Transactions",
            value: summary.transaction_count.to_string(),
            caption: None,
        },
    ];

    html! {
        section
            id="stat-cards"
            class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 w-full mb-6"
        {
            @for card in cards {
                div class=(CARD_STYLE) data-stat=(card.title)
                {
                    h3 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (card.title) }
                    p class="text-2xl font-bold mt-1" { (card.value) }

                    @if let Some(caption) = card.caption {
                        p class="text-sm text-gray-600 dark:text-gray-400 mt-1" { (caption) }
                    }
                }
            }
        }
    }
}

fn progress_bar_color(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::OnTrack => "bg-green-500",
        BudgetStatus::Warning => "bg-yellow-400",
        BudgetStatus::Exceeded => "bg-red-600",
    }
}

fn status_text_color(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::OnTrack => "text-green-700 dark:text-green-400",
        BudgetStatus::Warning => "text-yellow-700 dark:text-yellow-300",
        BudgetStatus::Exceeded => "text-red-700 dark:text-red-400",
    }
}

/// A bar filled to the percentage of the budget spent, with the status message under it.
pub(super) fn budget_progress_view(summary: &BudgetSummary) -> Markup {
    let status = summary.status();
    let percent = summary.display_percent();

    html! {
        section id="budget-progress" class={(CARD_STYLE) " w-full mb-6"}
        {
            div class="flex justify-between mb-2"
            {
                span class="font-medium" { "Budget Progress" }
                span class="text-sm" { (format_percent(percent)) }
            }

            div
                class="w-full h-4 bg-gray-200 rounded-full dark:bg-gray-700"
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow=(format!("{percent:.1}"))
            {
                div
                    class={"h-4 rounded-full " (progress_bar_color(status))}
                    style=(format!("width: {percent:.1}%"))
                {}
            }

            p id="budget-status" class={"mt-2 text-sm " (status_text_color(status))}
            {
                (status.message())
            }
        }
    }
}
