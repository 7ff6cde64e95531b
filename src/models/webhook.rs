//! Captured webhook records
//!
//! A record is written once at capture time and never updated. Defaults for
//! the status code and the capture timestamp are filled by
//! [`WebhookRecord::from_new`] so every storage backend applies them the same
//! way.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Status code returned to the caller of the capture endpoint
pub const DEFAULT_STATUS_CODE: i32 = 200;

/// Header and query-string maps, ordered by key
pub type StringMap = BTreeMap<String, String>;

/// How the `body` field is encoded when it is not plain UTF-8 text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    Base64,
}

impl BodyEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyEncoding::Base64 => "base64",
        }
    }
}

impl fmt::Display for BodyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base64" => Ok(BodyEncoding::Base64),
            other => Err(format!("unknown body encoding: {}", other)),
        }
    }
}

/// One captured inbound HTTP call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRecord {
    pub id: Uuid,
    pub method: String,
    pub path: String,
    pub ip: String,
    pub status_code: i32,
    pub content_type: Option<String>,
    pub content_length: Option<i32>,
    pub query_params: Option<StringMap>,
    pub headers: StringMap,
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_encoding: Option<BodyEncoding>,
    pub created_at: DateTime<Utc>,
}

impl WebhookRecord {
    /// Build the stored form of `new`, assigning identity and capture time.
    pub fn from_new(new: NewWebhook, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            method: new.method,
            path: new.path,
            ip: new.ip,
            status_code: new.status_code.unwrap_or(DEFAULT_STATUS_CODE),
            content_type: new.content_type,
            content_length: new.content_length,
            query_params: new.query_params,
            headers: new.headers,
            body: new.body,
            body_encoding: new.body_encoding,
            created_at: storage_timestamp(now),
        }
    }

    pub fn summary(&self) -> WebhookSummary {
        WebhookSummary {
            id: self.id,
            method: self.method.clone(),
            path: self.path.clone(),
            created_at: self.created_at,
        }
    }
}

/// Capture time at the precision PostgreSQL keeps.
///
/// Sub-microsecond remainders are rounded up so the stored value is never
/// earlier than the instant it was taken.
pub fn storage_timestamp(now: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = now.trunc_subsecs(6);
    if truncated == now {
        now
    } else {
        truncated + Duration::microseconds(1)
    }
}

/// Input to the record store: a record without identity or capture time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewWebhook {
    #[validate(length(min = 1, max = 16, message = "method must be 1 to 16 characters"))]
    pub method: String,

    #[validate(length(min = 1, max = 2048, message = "path must be 1 to 2048 characters"))]
    pub path: String,

    #[validate(length(min = 1, message = "ip must not be empty"))]
    pub ip: String,

    #[validate(range(min = 100, max = 599, message = "statusCode must be between 100 and 599"))]
    #[serde(default)]
    pub status_code: Option<i32>,

    #[serde(default)]
    pub content_type: Option<String>,

    #[validate(range(min = 0, message = "contentLength must not be negative"))]
    #[serde(default)]
    pub content_length: Option<i32>,

    #[serde(default)]
    pub query_params: Option<StringMap>,

    #[serde(default)]
    pub headers: StringMap,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub body_encoding: Option<BodyEncoding>,
}

impl NewWebhook {
    pub fn new(method: impl Into<String>, path: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ip: ip.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Listing row: enough to pick a record out of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSummary {
    pub id: Uuid,
    pub method: String,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

/// Page of summaries, newest first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookListResponse {
    pub webhooks: Vec<WebhookSummary>,
    pub next_cursor: Option<Uuid>,
}

impl WebhookListResponse {
    /// `next_cursor` is only set when the page came back full.
    pub fn new(webhooks: Vec<WebhookSummary>, limit: u32) -> Self {
        let next_cursor = if webhooks.len() == limit as usize {
            webhooks.last().map(|w| w.id)
        } else {
            None
        };
        Self {
            webhooks,
            next_cursor,
        }
    }
}

/// Body returned by the capture endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaptureResponse {
    pub id: Uuid,
}
