//! The category breakdown list and the expense table.

use std::collections::BTreeMap;

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    Expense,
    category::Category,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, format_currency,
    },
};

/// Spending per category in label order, or a short note if there is none.
pub(super) fn category_list_view(category_totals: &BTreeMap<Category, Decimal>) -> Markup {
    html! {
        ul id="category-list" class="w-full divide-y divide-gray-200 dark:divide-gray-700"
        {
            @for (category, total) in category_totals {
                li class="flex justify-between py-2"
                {
                    span class=(CATEGORY_BADGE_STYLE) { (category) }
                    span class="font-medium" { (format_currency(*total)) }
                }
            }

            @if category_totals.is_empty() {
                li class="py-2 text-gray-500 dark:text-gray-400" { "No categories yet." }
            }
        }
    }
}

/// Every expense, most recent first, each row with a delete button.
pub(super) fn expense_table_view(expenses: &[Expense]) -> Markup {
    let table_row = |expense: &Expense| {
        let delete_url = format_endpoint(endpoints::DELETE_EXPENSE_FORM, expense.id);
        let confirm_message = format!(
            "Are you sure you want to delete the expense '{}'? This cannot be undone.",
            expense.platform
        );

        html!(
            tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    time datetime=(expense.date) { (expense.date) }
                }
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (expense.platform)
                }
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(CATEGORY_BADGE_STYLE) { (expense.category) }
                }
                td class="px-6 py-4 text-right" { (format_currency(expense.amount)) }
                td class=(TABLE_CELL_STYLE)
                {
                    button
                        class=(BUTTON_DELETE_STYLE)
                        hx-delete=(delete_url)
                        hx-confirm=(confirm_message)
                        hx-target="#alert-container"
                        hx-target-error="#alert-container"
                    {
                        "Delete"
                    }
                }
            }
        )
    };

    html! {
        div class="w-full overflow-x-auto rounded-lg shadow"
        {
            table id="expense-table" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Platform" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Action" }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        (table_row(expense))
                    }

                    @if expenses.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="5" class="px-6 py-4 text-center" { "No expenses recorded yet." }
                        }
                    }
                }
            }
        }
    }
}
