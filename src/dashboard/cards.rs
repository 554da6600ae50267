//! Stat tiles summarizing the report's headline numbers.

use maud::{Markup, html};

use crate::report::Statistics;

const CARD_STYLE: &str = "flex flex-col gap-1 p-4 rounded-lg shadow bg-white dark:bg-gray-800";
const CARD_LABEL_STYLE: &str = "text-sm font-medium text-gray-500 dark:text-gray-400";
const CARD_VALUE_STYLE: &str = "text-2xl lg:text-3xl font-bold text-gray-900 dark:text-white";

/// Renders one tile per headline statistic.
pub(super) fn statistics_cards_view(statistics: &Statistics) -> Markup {
    let cards = [
        ("total-transactions", "Total Transactions", statistics.total.to_string()),
        ("failed-transactions", "Failed Transactions", statistics.failed.to_string()),
        ("total-retries", "Total Retries", statistics.total_retries.to_string()),
        (
            "average-retries",
            "Avg Retries / Failure",
            statistics.average_retries.to_string(),
        ),
    ];

    html! {
        section id="statistics" class="w-full grid grid-cols-2 lg:grid-cols-4 gap-4 mb-4"
        {
            @for (id, label, value) in cards {
                div id=(id) class=(CARD_STYLE)
                {
                    span class=(CARD_LABEL_STYLE) { (label) }
                    span class=(CARD_VALUE_STYLE) data-value { (value) }
                }
            }
        }
    }
}
