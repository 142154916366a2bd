use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::utils::current_database_datetime;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests, embedding).
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// One access-log line per request, target `access_log`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let remote_addr = remote_addr(request.headers());
    let user_agent = header_or_dash(request.headers(), "user-agent");

    let response = next.run(request).await;

    info!(
        target: "access_log",
        "{} {} \"{} {}\" {} {} {}ms \"{}\"",
        current_database_datetime(),
        remote_addr,
        method,
        uri,
        response.status().as_u16(),
        header_or_dash(response.headers(), "content-length"),
        start.elapsed().as_millis(),
        user_agent,
    );

    response
}

fn remote_addr(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|h| h.to_str().ok()))
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn header_or_dash(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string()
}
