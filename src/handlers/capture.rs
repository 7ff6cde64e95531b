use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, ConnectInfo, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;
use validator::Validate;

use crate::error::{ApiError, ErrorResponse, Result};
use crate::middleware::metrics::track_capture;
use crate::models::CaptureResponse;
use crate::services::capture::{build_new_webhook, InboundRequest};
use crate::utils::request_info::client_ip;
use crate::AppState;

/// Capture any request sent under `/capture`
///
/// Every method is accepted. The request is stored as-is and the generated
/// id is returned so the caller can look the capture up later.
#[utoipa::path(
    post,
    path = "/capture/{rest}",
    tag = "capture",
    params(("rest" = String, Path, description = "Any path; stored relative to /capture")),
    request_body(content = String, description = "Any payload", content_type = "*/*"),
    responses(
        (status = 200, description = "Request captured", body = CaptureResponse),
        (status = 413, description = "Body exceeds the configured limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn capture_webhook(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Response> {
    let body = body?;
    let ip = client_ip(&headers, peer, state.config.trust_proxy_headers);

    let new = build_new_webhook(InboundRequest {
        method: &method,
        uri: &uri,
        headers: &headers,
        body: &body,
        ip,
    })?;
    new.validate()?;

    let record = state.store.insert(new).await?;
    track_capture(&record.method, record.body.is_some());

    info!(
        id = %record.id,
        method = %record.method,
        path = %record.path,
        ip = %record.ip,
        "Webhook captured"
    );

    let status = u16::try_from(record.status_code)
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::OK);

    Ok((status, Json(CaptureResponse { id: record.id })).into_response())
}
