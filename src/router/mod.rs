//! Router configuration.
//!
//! `/capture` accepts every method; `/webhooks` is the inspection API.

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::{any, get},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::handlers::{
    capture_webhook, delete_webhook, get_prometheus_metrics, get_webhook, health_check,
    list_webhooks, view_webhook,
};
use crate::middleware::{add_security_headers, metrics_middleware, request_logger_middleware};
use crate::openapi::ApiDoc;

/// Build the application router.
pub fn build_router(app_state: AppState) -> Router {
    let request_timeout = Duration::from_secs(app_state.config.request_timeout_secs);
    let max_body_bytes = app_state.config.max_body_bytes;

    let ops = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(get_prometheus_metrics));

    let capture = Router::new()
        .route("/capture", any(capture_webhook))
        .route("/capture/", any(capture_webhook))
        .route("/capture/{*rest}", any(capture_webhook))
        .layer(DefaultBodyLimit::max(max_body_bytes));

    let webhooks = Router::new()
        .route("/webhooks", get(list_webhooks))
        .route("/webhooks/{id}", get(get_webhook).delete(delete_webhook))
        .route("/webhooks/{id}/view", get(view_webhook));

    ops.merge(capture)
        .merge(webhooks)
        .fallback(route_not_found)
        .layer(middleware::from_fn(metrics_middleware))
        .merge(SwaggerUi::new("/docs").url("/docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logger_middleware))
                .layer(middleware::from_fn(add_security_headers))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route")
}
