//! Common extractors for API handlers.
//!
//! Path and query input is validated here, before any handler touches the
//! store.

use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use chrono::FixedOffset;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;

/// Validated UUID helper
pub struct ValidatedUuid;

impl ValidatedUuid {
    /// Parse a string into a UUID, returning an ApiError on failure
    pub fn parse(s: &str) -> Result<Uuid, ApiError> {
        Uuid::parse_str(s)
            .map_err(|_| ApiError::validation_field("id", format!("Invalid UUID: {}", s)))
    }
}

/// `{id}` path segment of the webhook routes, parsed as a UUID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookId(pub Uuid);

impl<S> FromRequestParts<S> for WebhookId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        ValidatedUuid::parse(&raw).map(WebhookId)
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query string of `GET /webhooks`
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListWebhooksQuery {
    /// Page size, 1 to 100 (default 20)
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
    /// Only return webhooks older than this id
    pub cursor: Option<Uuid>,
}

impl ListWebhooksQuery {
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

/// Query string of `GET /webhooks/{id}/view`
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DetailViewQuery {
    /// Viewer's offset from UTC in minutes, e.g. -300 for UTC-5
    #[validate(range(min = -720, max = 840, message = "tzOffsetMinutes must be between -720 and 840"))]
    pub tz_offset_minutes: Option<i32>,
}

impl DetailViewQuery {
    pub fn offset(&self) -> Result<FixedOffset, ApiError> {
        let minutes = self.tz_offset_minutes.unwrap_or(0);
        FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
            ApiError::validation_field("tzOffsetMinutes", "tzOffsetMinutes is out of range")
        })
    }
}

/// Query extractor that validates its payload and reports failures as
/// [`ApiError`] instead of axum's plain-text rejection.
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: serde::de::DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}
