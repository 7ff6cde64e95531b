// Metrics endpoint for Prometheus

use axum::extract::State;

use super::response::PrometheusText;
use crate::AppState;

/// Prometheus metrics endpoint
///
/// Renders an empty exposition when no recorder is installed, e.g. in tests.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "metrics",
    summary = "Prometheus metrics",
    responses(
        (status = 200, description = "Prometheus metrics", content_type = "text/plain")
    )
)]
pub async fn get_prometheus_metrics(State(state): State<AppState>) -> PrometheusText {
    let text = state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default();

    PrometheusText(text)
}
