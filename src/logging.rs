//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The query parameters whose values are replaced with asterisks in the logs.
const REDACTED_QUERY_PARAMETERS: [&str; 2] = ["user_email", "userEmail"];

/// Request headers that carry a URL which may include the caller's email.
const URL_HEADERS: [&str; 2] = ["referer", "hx-current-url"];

/// The maximum number of bytes of a body to log at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level, with the
/// caller's email redacted from the query string, the URL headers and
/// form encoded request bodies.
/// If a request body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Only the length of a response body is logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(body_text) => body_text,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    log_request(&parts, &body_text);

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(body_text) => body_text,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn body_to_text(body: Body) -> Result<String, axum::Error> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

/// Replace the values of [REDACTED_QUERY_PARAMETERS] in `uri`'s query string.
fn redact_uri(uri: &Uri) -> String {
    redact_url(&uri.to_string())
}

/// Replace the values of [REDACTED_QUERY_PARAMETERS] in the query string of
/// a relative or absolute URL.
fn redact_url(url: &str) -> String {
    match url.split_once('?') {
        Some((base, query)) => format!("{base}?{}", redact_query(query)),
        None => url.to_owned(),
    }
}

/// Replace the values of [REDACTED_QUERY_PARAMETERS] in a URL encoded string.
fn redact_query(query: &str) -> String {
    query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if REDACTED_QUERY_PARAMETERS.contains(&key) => {
                format!("{key}=********")
            }
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// The request headers as name-value pairs, with [URL_HEADERS] redacted.
fn redact_headers(headers: &HeaderMap) -> Vec<(&str, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes());
            let value = if URL_HEADERS.contains(&name.as_str()) {
                redact_url(&value)
            } else {
                value.into_owned()
            };

            (name.as_str(), value)
        })
        .collect()
}

/// Cut `body` down to at most [LOG_BODY_LENGTH_LIMIT] bytes on a character boundary.
fn truncate(body: &str) -> Option<&str> {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return None;
    }

    let end = (0..=LOG_BODY_LENGTH_LIMIT)
        .rev()
        .find(|&index| body.is_char_boundary(index))
        .unwrap_or(0);

    Some(&body[..end])
}

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    let method = &parts.method;
    let uri = redact_uri(&parts.uri);
    let headers = redact_headers(&parts.headers);
    let body = redact_query(body);

    match truncate(&body) {
        Some(truncated) => {
            tracing::info!(
                "Received request: {method} {uri}\nheaders: {headers:#?}\nbody: {truncated}..."
            );
            tracing::debug!("Full request body: {body:?}");
        }
        None => {
            tracing::info!("Received request: {method} {uri}\nheaders: {headers:#?}\nbody: {body:?}")
        }
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    let status = parts.status;
    let headers = &parts.headers;
    let length = body.len();

    tracing::info!("Sending response: {status}\nheaders: {headers:#?}\nbody: {length} bytes");
}

#[cfg(test)]
mod tests {
    use std::{
        io::Write,
        sync::{Arc, Mutex},
    };

    use axum::{Json, Router, http::Uri, middleware, routing::get};
    use axum_test::TestServer;
    use serde_json::json;

    use super::{LOG_BODY_LENGTH_LIMIT, logging_middleware, redact_uri, redact_url, truncate};

    /// Collects everything written by a `tracing_subscriber::fmt` subscriber.
    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogCapture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn redacts_email_query_values() {
        let uri: Uri = "/dashboard?role=viewer&user_email=a%40example.com&search=TXN"
            .parse()
            .unwrap();

        assert_eq!(
            redact_uri(&uri),
            "/dashboard?role=viewer&user_email=********&search=TXN"
        );

        let uri: Uri = "/api/transactions?userEmail=a%40example.com".parse().unwrap();

        assert_eq!(redact_uri(&uri), "/api/transactions?userEmail=********");
    }

    #[test]
    fn leaves_other_uris_alone() {
        let uri: Uri = "/dashboard".parse().unwrap();
        assert_eq!(redact_uri(&uri), "/dashboard");

        let uri: Uri = "/dashboard?search=TXN".parse().unwrap();
        assert_eq!(redact_uri(&uri), "/dashboard?search=TXN");
    }

    #[test]
    fn redacts_absolute_urls() {
        assert_eq!(
            redact_url("http://localhost:3000/dashboard?role=viewer&user_email=a%40example.com"),
            "http://localhost:3000/dashboard?role=viewer&user_email=********"
        );
        assert_eq!(
            redact_url("http://localhost:3000/dashboard"),
            "http://localhost:3000/dashboard"
        );
    }

    #[test]
    fn truncates_long_bodies_on_char_boundaries() {
        assert_eq!(truncate("short"), None);

        let long = "é".repeat(LOG_BODY_LENGTH_LIMIT);
        let got = truncate(&long).unwrap();

        assert!(got.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(long.starts_with(got));
    }

    #[tokio::test]
    async fn passes_responses_through() {
        let app = Router::new()
            .route("/", get(|| async { "x".repeat(LOG_BODY_LENGTH_LIMIT * 2) }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).unwrap();

        let response = server.get("/").await;

        response.assert_status_ok();
        response.assert_text("x".repeat(LOG_BODY_LENGTH_LIMIT * 2));
    }

    #[tokio::test]
    async fn email_never_reaches_the_logs() {
        let capture = LogCapture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let app = Router::new()
            .route(
                "/dashboard",
                get(|| async { Json(json!([{ "userEmail": "secret@example.com" }])) }),
            )
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).unwrap();

        let response = server
            .get("/dashboard")
            .add_query_param("role", "viewer")
            .add_query_param("user_email", "secret@example.com")
            .add_header(
                "HX-Current-URL",
                "http://localhost/dashboard?role=viewer&user_email=secret%40example.com",
            )
            .add_header(
                "Referer",
                "http://localhost/dashboard?userEmail=secret%40example.com",
            )
            .await;

        response.assert_status_ok();
        let logs = capture.contents();
        assert!(logs.contains("Received request"), "got logs {logs}");
        assert!(logs.contains("Sending response"), "got logs {logs}");
        assert!(!logs.contains("secret"), "got logs {logs}");
    }
}
