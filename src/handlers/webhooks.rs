//! Read and delete access to captured webhooks.

use axum::{
    extract::State,
    response::Html,
    Json,
};
use tracing::{debug, info};

use super::extractors::{DetailViewQuery, ListWebhooksQuery, ValidatedQuery, WebhookId};
use super::response::NoContent;
use crate::error::{ApiError, ErrorResponse, Result};
use crate::models::{WebhookListResponse, WebhookRecord};
use crate::views::DetailHeader;
use crate::AppState;

const RESOURCE: &str = "Webhook";

/// Get a captured webhook by id
#[utoipa::path(
    get,
    path = "/webhooks/{id}",
    tag = "webhooks",
    params(("id" = String, Path, description = "Webhook id (UUID)")),
    responses(
        (status = 200, description = "Captured webhook", body = WebhookRecord),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Webhook not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_webhook(
    State(state): State<AppState>,
    WebhookId(id): WebhookId,
) -> Result<Json<WebhookRecord>> {
    debug!(%id, "Fetching webhook");

    state
        .store
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(RESOURCE))
}

/// Delete a captured webhook
#[utoipa::path(
    delete,
    path = "/webhooks/{id}",
    tag = "webhooks",
    params(("id" = String, Path, description = "Webhook id (UUID)")),
    responses(
        (status = 204, description = "Webhook deleted"),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Webhook not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_webhook(
    State(state): State<AppState>,
    WebhookId(id): WebhookId,
) -> Result<NoContent> {
    match state.store.delete_by_id(id).await? {
        Some(_) => {
            info!(%id, "Webhook deleted");
            Ok(NoContent)
        }
        None => Err(ApiError::not_found(RESOURCE)),
    }
}

/// List captured webhooks, newest first
#[utoipa::path(
    get,
    path = "/webhooks",
    tag = "webhooks",
    params(ListWebhooksQuery),
    responses(
        (status = 200, description = "One page of webhooks", body = WebhookListResponse),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_webhooks(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListWebhooksQuery>,
) -> Result<Json<WebhookListResponse>> {
    let limit = query.limit();
    let rows = state.store.list(query.cursor, limit).await?;

    Ok(Json(WebhookListResponse::new(rows, limit)))
}

/// Detail header of a captured webhook, as an HTML fragment
#[utoipa::path(
    get,
    path = "/webhooks/{id}/view",
    tag = "webhooks",
    params(
        ("id" = String, Path, description = "Webhook id (UUID)"),
        DetailViewQuery
    ),
    responses(
        (status = 200, description = "Detail header fragment", content_type = "text/html"),
        (status = 400, description = "Malformed id or offset", body = ErrorResponse),
        (status = 404, description = "Webhook not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn view_webhook(
    State(state): State<AppState>,
    WebhookId(id): WebhookId,
    ValidatedQuery(query): ValidatedQuery<DetailViewQuery>,
) -> Result<Html<String>> {
    let offset = query.offset()?;

    let record = state
        .store
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(RESOURCE))?;

    let html = state
        .renderer
        .render_detail_header(&DetailHeader::from_record(&record, offset))
        .map_err(|e| ApiError::Internal(format!("rendering detail header: {}", e)))?;

    Ok(Html(html))
}
