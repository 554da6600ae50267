//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The payment failure dashboard.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The CSV download of the dashboard's transactions.
pub const DASHBOARD_EXPORT: &str = "/dashboard/export";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to list transactions as JSON.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to get the dashboard's report as JSON.
pub const REPORT_API: &str = "/api/report";

#[cfg(test)]
mod tests {
    use axum::http::Uri;

    use super::*;

    fn assert_endpoint_is_valid_uri(endpoint: &str) {
        assert!(endpoint.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            ROOT,
            DASHBOARD_VIEW,
            DASHBOARD_EXPORT,
            STATIC,
            TRANSACTIONS_API,
            REPORT_API,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }
}
