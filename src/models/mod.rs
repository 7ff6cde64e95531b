// Data models and DTOs

pub mod webhook;

pub use webhook::{
    BodyEncoding, CaptureResponse, NewWebhook, StringMap, WebhookListResponse, WebhookRecord,
    WebhookSummary, DEFAULT_STATUS_CODE,
};
