//! The table of filtered transactions.

use maud::{Markup, html};

use crate::{
    html::{BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE},
    report::{ReportRow, Severity},
};

const COLUMNS: [&str; 5] = ["ID", "Status", "Failure Reason", "Retries", "Severity"];

fn severity_colour(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "text-red-800 bg-red-100 dark:bg-red-900 dark:text-red-300",
        Severity::Medium => "text-amber-800 bg-amber-100 dark:bg-amber-900 dark:text-amber-300",
        Severity::Low => "text-emerald-800 bg-emerald-100 dark:bg-emerald-900 dark:text-emerald-300",
    }
}

/// Renders the transactions table, or a message if no transactions matched.
pub(super) fn transactions_table(rows: &[ReportRow]) -> Markup {
    html! {
        section class="w-full mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Transactions" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table
                    id="transactions-table"
                    class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            @for column in COLUMNS {
                                th scope="col" class=(TABLE_CELL_STYLE) { (column) }
                            }
                        }
                    }

                    tbody
                    {
                        @for row in rows {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th
                                    scope="row"
                                    class={ (TABLE_CELL_STYLE) " font-medium text-gray-900 whitespace-nowrap dark:text-white" }
                                {
                                    (row.id)
                                }
                                td class=(TABLE_CELL_STYLE) { (row.status) }
                                td class=(TABLE_CELL_STYLE) { (row.failure_reason) }
                                td class=(TABLE_CELL_STYLE) { (row.retries) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class={ (BADGE_STYLE) " " (severity_colour(row.severity)) }
                                    {
                                        (row.severity)
                                    }
                                }
                            }
                        }

                        @if rows.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan=(COLUMNS.len()) class={ (TABLE_CELL_STYLE) " text-center" }
                                {
                                    "No transactions match the current filters."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
