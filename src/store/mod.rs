//! Record store for captured webhooks.
//!
//! Handlers only ever talk to [`WebhookStore`]. Identity and capture time are
//! assigned inside the store, never taken from callers. Two backends exist:
//! PostgreSQL for deployments and an in-memory map for tests and local runs.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewWebhook, WebhookRecord, WebhookSummary};

pub mod id;
pub mod memory;
pub mod postgres;

pub use id::IdGenerator;
pub use memory::InMemoryWebhookStore;
pub use postgres::PgWebhookStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored row is invalid: {0}")]
    InvalidRow(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable persistence of webhook records keyed by id.
#[async_trait]
pub trait WebhookStore: Send + Sync {
    /// Persist `new` with a freshly generated id and capture time.
    async fn insert(&self, new: NewWebhook) -> StoreResult<WebhookRecord>;

    /// `Ok(None)` when no record has this id.
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<WebhookRecord>>;

    /// Remove the record and hand it back, or `Ok(None)` when it was absent.
    async fn delete_by_id(&self, id: Uuid) -> StoreResult<Option<WebhookRecord>>;

    /// Newest first; with a cursor only ids strictly below it are returned.
    ///
    /// Ids are assigned before the row is committed, so under concurrent
    /// writes a slower insert can land behind a cursor a reader already
    /// passed. A walk over pages is only eventually complete; a fresh
    /// listing without a cursor sees such rows.
    async fn list(&self, cursor: Option<Uuid>, limit: u32) -> StoreResult<Vec<WebhookSummary>>;

    async fn ping(&self) -> StoreResult<()>;

    /// Release backend resources at shutdown.
    async fn close(&self) {}

    fn backend_name(&self) -> &'static str;
}
