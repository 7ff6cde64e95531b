use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{IdGenerator, StoreResult, WebhookStore};
use crate::models::{NewWebhook, WebhookRecord, WebhookSummary};

/// Process-local store ordered by id. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryWebhookStore {
    records: RwLock<BTreeMap<Uuid, WebhookRecord>>,
    ids: IdGenerator,
}

impl InMemoryWebhookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl WebhookStore for InMemoryWebhookStore {
    async fn insert(&self, new: NewWebhook) -> StoreResult<WebhookRecord> {
        let mut records = self.records.write().await;
        // Id minted under the write lock so map order matches insertion order.
        let record = WebhookRecord::from_new(new, self.ids.next_id(), Utc::now());
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<WebhookRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<Option<WebhookRecord>> {
        Ok(self.records.write().await.remove(&id))
    }

    async fn list(&self, cursor: Option<Uuid>, limit: u32) -> StoreResult<Vec<WebhookSummary>> {
        let records = self.records.read().await;
        let page = match cursor {
            Some(cursor) => records
                .range(..cursor)
                .rev()
                .take(limit as usize)
                .map(|(_, r)| r.summary())
                .collect(),
            None => records
                .values()
                .rev()
                .take(limit as usize)
                .map(WebhookRecord::summary)
                .collect(),
        };
        Ok(page)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
