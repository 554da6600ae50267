//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the dashboard page, its CSV export and its JSON report
//! - HTML view functions for rendering the dashboard UI
//! - The state and query types used by the handlers

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    dashboard::{
        cards::statistics_cards_view,
        charts::{charts_script, charts_view, dashboard_charts},
        identity::identity_view,
        tables::transactions_table,
    },
    endpoints,
    html::{
        BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    payment::{FailureReason, fetch_visible_transactions},
    report::{ExportConfig, ReasonFilter, Report, ReportQuery, build_report, format_reason},
    viewer::ViewerQuery,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The settings for the CSV download.
    pub export_config: ExportConfig,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            export_config: state.export_config.clone(),
        }
    }
}

/// The query string shared by the dashboard, its export and the JSON report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardQuery {
    /// "admin" or "viewer", missing means viewer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// The caller's email, required for viewers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// The caller's email as sent by API clients.
    #[serde(rename = "userEmail", skip_serializing_if = "Option::is_none")]
    pub user_email_camel_case: Option<String>,
    /// Text to look for in transaction IDs.
    #[serde(default)]
    pub search: String,
    /// A raw failure reason code, or "ALL".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DashboardQuery {
    /// The caller's identity.
    pub fn viewer(&self) -> ViewerQuery {
        ViewerQuery {
            role: self.role.clone(),
            user_email: self.user_email.clone(),
            user_email_camel_case: self.user_email_camel_case.clone(),
        }
    }

    /// The search text and reason filter.
    pub fn report_query(&self) -> ReportQuery {
        ReportQuery::new(
            &self.search,
            ReasonFilter::from_query_value(self.reason.as_deref()),
        )
    }

    /// The URL of the CSV export for the same caller and filters.
    fn export_url(&self) -> String {
        match serde_urlencoded::to_string(self) {
            Ok(query_string) if !query_string.is_empty() => {
                format!("{}?{query_string}", endpoints::DASHBOARD_EXPORT)
            }
            Ok(_) => endpoints::DASHBOARD_EXPORT.to_owned(),
            Err(error) => {
                tracing::error!("could not encode export query string: {error}");
                endpoints::DASHBOARD_EXPORT.to_owned()
            }
        }
    }
}

/// Display the dashboard for the caller named in the query string.
///
/// Callers that have not said who they are get a form asking for their role
/// and email. htmx requests only get the content below the filter controls.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    HxRequest(is_htmx_request): HxRequest,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let viewer = query.viewer();

    if let Err(error) = viewer.visibility() {
        if is_htmx_request {
            return error.into_alert_response();
        }

        let error_message = match error {
            // A first visit, nothing has been entered yet.
            Error::MissingUserEmail if query.role.is_none() => None,
            Error::MissingUserEmail => Some("Enter your email address to continue.".to_owned()),
            Error::InvalidEmail(email) => Some(format!("\"{email}\" is not a valid email address.")),
            error => Some(error.to_string()),
        };

        return identity_view(
            viewer.role(),
            viewer.email().unwrap_or_default(),
            error_message.as_deref(),
        )
        .into_response();
    }

    let transactions = match fetch_visible_transactions(&viewer, &state.db_connection) {
        Ok(transactions) => transactions,
        Err(error) if is_htmx_request => return error.into_alert_response(),
        Err(error) => return error.into_response(),
    };

    let report = build_report(&transactions, &query.report_query());

    if is_htmx_request {
        dashboard_content(&query, &report).into_response()
    } else {
        dashboard_view(&query, &viewer, &report).into_response()
    }
}

/// Download the filtered transactions as a CSV file.
pub async fn get_export_csv(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let transactions = fetch_visible_transactions(&query.viewer(), &state.db_connection)?;
    let csv = build_report(&transactions, &query.report_query())
        .to_csv()
        .inspect_err(|error| tracing::error!("could not export transactions: {error}"))?;

    let headers = [
        (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
        (
            CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                state.export_config.file_name
            ),
        ),
    ];

    Ok((headers, csv).into_response())
}

/// Get the dashboard's report as JSON.
pub async fn get_report_endpoint(
    State(state): State<DashboardState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return Error::InvalidQuery(rejection.body_text()).into_json_response(),
    };

    match fetch_visible_transactions(&query.viewer(), &state.db_connection) {
        Ok(transactions) => Json(build_report(&transactions, &query.report_query())).into_response(),
        Err(error) => error.into_json_response(),
    }
}

/// Renders the full dashboard page.
fn dashboard_view(query: &DashboardQuery, viewer: &ViewerQuery, report: &Report) -> Markup {
    let nav_bar = NavBar {
        email: viewer.email(),
        role: viewer.role(),
    }
    .into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                h1 class="text-2xl font-bold mb-4" { "Payment Failure Dashboard" }

                (filters_form(query, viewer))

                div id="dashboard-content"
                {
                    (dashboard_content(query, report))
                }
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(),
    ];

    base("Dashboard", &scripts, &content)
}

/// The search box and reason filter, which refresh `#dashboard-content` as they change.
fn filters_form(query: &DashboardQuery, viewer: &ViewerQuery) -> Markup {
    let reason_filter = ReasonFilter::from_query_value(query.reason.as_deref());
    let mut reason_options: Vec<FailureReason> = FailureReason::KNOWN.to_vec();
    // Keep an unknown reason from the query string selectable.
    if let ReasonFilter::Only(reason) = &reason_filter {
        if !reason_options.contains(reason) {
            reason_options.push(reason.clone());
        }
    }

    html!(
        form
            id="filters"
            hx-get=(endpoints::DASHBOARD_VIEW)
            hx-trigger="input changed delay:250ms from:#search, change from:#reason"
            hx-target="#dashboard-content"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            hx-push-url="true"
            hx-indicator="#indicator"
            class="grid grid-cols-1 md:grid-cols-3 gap-4 mb-4"
        {
            input type="hidden" name="role" value=(viewer.role().as_query_value());

            @if let Some(email) = viewer.email() {
                input type="hidden" name="user_email" value=(email);
            }

            div class="md:col-span-2"
            {
                label for="search" class=(FORM_LABEL_STYLE)
                {
                    "Search "
                    span id="indicator" class="htmx-indicator text-xs text-gray-500" { "Updating..." }
                }

                input
                    type="search"
                    id="search"
                    name="search"
                    placeholder="Search by transaction ID"
                    value=(query.search)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="reason" class=(FORM_LABEL_STYLE) { "Failure Reason" }

                select id="reason" name="reason" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option
                        value=(ReasonFilter::ALL_QUERY_VALUE)
                        selected[reason_filter == ReasonFilter::All]
                    {
                        "All reasons"
                    }

                    @for reason in &reason_options {
                        option
                            value=(reason.as_code())
                            selected[reason_filter == ReasonFilter::Only(reason.clone())]
                        {
                            (format_reason(Some(reason)))
                        }
                    }
                }
            }
        }
    )
}

/// The statistics, charts and table for a report.
///
/// This is also the response to htmx requests.
fn dashboard_content(query: &DashboardQuery, report: &Report) -> Markup {
    let charts = dashboard_charts(&report.chart_series);

    html!(
        div class="flex justify-end mb-4"
        {
            a id="export-csv" href=(query.export_url()) class=(BUTTON_SECONDARY_STYLE) download
            {
                "Export CSV"
            }
        }

        (statistics_cards_view(&report.statistics))
        (charts_view(&charts))
        (transactions_table(&report.rows()))
    )
}
