use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};
use std::time::Instant;

/// Label for requests that matched no route
const UNMATCHED_ROUTE: &str = "unmatched";

/// Metrics middleware that tracks request metrics
///
/// Paths are labelled by route template (`/webhooks/{id}`), never by the raw
/// URI, so arbitrary capture paths cannot blow up label cardinality.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());
    let start = Instant::now();

    counter!("http_requests_total", "method" => method.clone(), "route" => route.clone())
        .increment(1);
    gauge!("http_requests_in_flight", "route" => route.clone()).increment(1.0);

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    let duration = start.elapsed();

    gauge!("http_requests_in_flight", "route" => route.clone()).decrement(1.0);

    histogram!(
        "http_request_duration_seconds",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status.clone()
    )
    .record(duration.as_secs_f64());

    counter!(
        "http_responses_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status.clone()
    )
    .increment(1);

    if response.status().is_server_error() {
        counter!(
            "http_errors_total",
            "method" => method,
            "route" => route,
            "status" => status
        )
        .increment(1);
    }

    response
}

/// Track a stored capture
pub fn track_capture(method: &str, has_body: bool) {
    counter!(
        "webhooks_captured_total",
        "method" => method.to_string(),
        "has_body" => has_body.to_string()
    )
    .increment(1);
}

