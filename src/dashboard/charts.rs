//! The category pie chart and the script that draws it.
//!
//! Chart options are built with charming and handed to ECharts as JSON.

use std::collections::BTreeMap;

use charming::{
    Chart,
    component::{Legend, Title},
    element::{Color, JsFunction, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{category::Category, html::HeadElement};

/// The slice colors, assigned to categories in the order they are listed.
pub(super) const CHART_PALETTE: [&str; 10] = [
    "#5b8cff", "#764ba2", "#f5576c", "#22c55e", "#f59e0b", "#8b5cf6", "#ec4899", "#06b6d4",
    "#14b8a6", "#f97316",
];

/// Shown in place of the chart when there is nothing to plot.
pub(super) const EMPTY_CHART_MESSAGE: &str = "No expenses yet. Add some to see the distribution!";

pub(super) const CATEGORY_CHART_ID: &str = "category-chart";

/// The URL of the ECharts build the dashboard loads.
pub(super) const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// The chart container, or a message if no category has any spending.
pub(super) fn category_chart_view(chart: Option<&DashboardChart>) -> Markup {
    html!(
        @match chart {
            Some(chart) => {
                div
                    id=(chart.id)
                    class="min-h-[320px] w-full rounded dark:bg-gray-100"
                {}
            }
            None => {
                p
                    id="empty-chart"
                    class="py-16 text-center text-gray-500 dark:text-gray-400"
                {
                    (EMPTY_CHART_MESSAGE)
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A doughnut chart of spending per category.
///
/// Returns `None` when `category_totals` is empty. Slices follow the map's
/// order, so the legend matches the category list next to it.
pub(super) fn category_chart(category_totals: &BTreeMap<Category, Decimal>) -> Option<DashboardChart> {
    if category_totals.is_empty() {
        return None;
    }

    let data: Vec<(f64, &str)> = category_totals
        .iter()
        .map(|(category, total)| (total.to_f64().unwrap_or_default(), category.as_str()))
        .collect();

    let chart = Chart::new()
        .title(Title::new().text("Spending by Category").left("center"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0%"))
        .color(
            CHART_PALETTE
                .iter()
                .map(|color| Color::from(*color))
                .collect::<Vec<Color>>(),
        )
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["40%", "70%"])
                .data(data),
        );

    Some(DashboardChart {
        id: CATEGORY_CHART_ID,
        options: chart.to_string(),
    })
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-IN', {
              style: 'currency',
              currency: 'INR'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
