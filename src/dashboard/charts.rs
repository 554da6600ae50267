//! Chart generation and rendering for the dashboard.
//!
//! This module creates two ECharts visualizations for a report:
//! - **Failure Distribution**: failed transactions per failure reason
//! - **Failures vs Retries**: failed transactions against total retries
//!
//! The chart options are embedded in the chart containers so that charts in
//! content swapped in by htmx are initialized the same way as on page load.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, ItemStyle, Label, Tooltip, Trigger},
    series::{Pie, bar::Bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{html::HeadElement, report::ChartSeries};

const BAR_COLOUR: &str = "#6366f1";
const FAILURES_COLOUR: &str = "#6366f1";
const RETRIES_COLOUR: &str = "#f97316";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build both dashboard charts for `series`.
pub(super) fn dashboard_charts(series: &ChartSeries) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "failure-distribution-chart",
            options: failure_distribution_chart(series).to_string(),
        },
        DashboardChart {
            id: "failures-vs-retries-chart",
            options: failures_vs_retries_chart(series).to_string(),
        },
    ]
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        data-chart-options=(chart.options)
                        class="min-h-[320px] lg:min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// JavaScript that initializes every chart container on the page.
///
/// Charts are (re)initialized on page load and after each htmx swap, resize
/// with the window and follow the system's light/dark preference.
pub(super) fn charts_script() -> HeadElement {
    let script = r#"(function() {
    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
    const themeName = () => darkModeMediaQuery.matches ? 'dark' : 'default';
    let charts = [];

    function initCharts() {
        charts.forEach((chart) => chart.dispose());
        charts = Array.from(document.querySelectorAll('[data-chart-options]')).map((chartDom) => {
            const chart = echarts.init(chartDom, themeName());
            chart.setOption(JSON.parse(chartDom.dataset.chartOptions));
            return chart;
        });
    }

    document.addEventListener('DOMContentLoaded', initCharts);
    document.addEventListener('htmx:afterSettle', initCharts);
    window.addEventListener('resize', () => charts.forEach((chart) => chart.resize()));
    darkModeMediaQuery.addEventListener('change', () => {
        charts.forEach((chart) => chart.setTheme(themeName()));
    });
})();"#;

    HeadElement::ScriptSource(PreEscaped(script.to_owned()))
}

/// A bar chart with one bar per failure reason.
pub(super) fn failure_distribution_chart(series: &ChartSeries) -> Chart {
    let labels: Vec<String> = series.bar.iter().map(|entry| entry.reason.clone()).collect();
    let counts: Vec<i64> = series.bar.iter().map(|entry| entry.count as i64).collect();

    Chart::new()
        .title(Title::new().text("Failure Distribution"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(
            Bar::new()
                .name("Failures")
                .item_style(ItemStyle::new().color(BAR_COLOUR))
                .data(counts),
        )
}

/// A doughnut chart comparing failed transactions with total retries.
pub(super) fn failures_vs_retries_chart(series: &ChartSeries) -> Chart {
    let data: Vec<(i64, &str)> = series
        .pie
        .iter()
        .map(|entry| (entry.value as i64, entry.name))
        .collect();

    Chart::new()
        .title(Title::new().text("Failures vs Retries"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("0"))
        .color::<charming::element::Color>(vec![FAILURES_COLOUR.into(), RETRIES_COLOUR.into()])
        .series(
            Pie::new()
                .name("Failures vs Retries")
                .radius(vec!["40%", "70%"])
                .label(Label::new().show(true))
                .data(data),
        )
}
