use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use super::{IdGenerator, StoreError, StoreResult, WebhookStore};
use crate::models::{BodyEncoding, NewWebhook, StringMap, WebhookRecord, WebhookSummary};

/// PostgreSQL-backed store over the `webhooks` table.
///
/// Every operation is a single statement, so row-level atomicity is all the
/// isolation required; no transaction spans more than one record.
#[derive(Debug, Clone)]
pub struct PgWebhookStore {
    pool: PgPool,
    ids: Arc<IdGenerator>,
}

/// Row shape as stored; json columns are decoded into maps.
#[derive(Debug, FromRow)]
struct WebhookRow {
    id: Uuid,
    method: String,
    path: String,
    ip: String,
    status_code: i32,
    content_type: Option<String>,
    content_length: Option<i32>,
    query_params: Option<Json<StringMap>>,
    headers: Json<StringMap>,
    body: Option<String>,
    body_encoding: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<WebhookRow> for WebhookRecord {
    type Error = StoreError;

    fn try_from(row: WebhookRow) -> Result<Self, Self::Error> {
        let body_encoding = row
            .body_encoding
            .as_deref()
            .map(str::parse::<BodyEncoding>)
            .transpose()
            .map_err(StoreError::InvalidRow)?;

        Ok(WebhookRecord {
            id: row.id,
            method: row.method,
            path: row.path,
            ip: row.ip,
            status_code: row.status_code,
            content_type: row.content_type,
            content_length: row.content_length,
            query_params: row.query_params.map(|Json(map)| map),
            headers: row.headers.0,
            body: row.body,
            body_encoding,
            created_at: row.created_at,
        })
    }
}

impl PgWebhookStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            ids: Arc::new(IdGenerator::new()),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl WebhookStore for PgWebhookStore {
    async fn insert(&self, new: NewWebhook) -> StoreResult<WebhookRecord> {
        let record = WebhookRecord::from_new(new, self.ids.next_id(), Utc::now());

        let row = sqlx::query_as::<_, WebhookRow>(
            r#"
            INSERT INTO webhooks (
                id, method, path, ip, status_code, content_type, content_length,
                query_params, headers, body, body_encoding, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, method, path, ip, status_code, content_type, content_length,
                      query_params, headers, body, body_encoding, created_at
            "#,
        )
        .bind(record.id)
        .bind(&record.method)
        .bind(&record.path)
        .bind(&record.ip)
        .bind(record.status_code)
        .bind(&record.content_type)
        .bind(record.content_length)
        .bind(record.query_params.as_ref().map(Json))
        .bind(Json(&record.headers))
        .bind(&record.body)
        .bind(record.body_encoding.map(|e| e.as_str()))
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await?;

        debug!(webhook_id = %row.id, "Inserted webhook");
        row.try_into()
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<WebhookRecord>> {
        let row = sqlx::query_as::<_, WebhookRow>(
            r#"
            SELECT id, method, path, ip, status_code, content_type, content_length,
                   query_params, headers, body, body_encoding, created_at
            FROM webhooks
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(WebhookRecord::try_from).transpose()
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<Option<WebhookRecord>> {
        let row = sqlx::query_as::<_, WebhookRow>(
            r#"
            DELETE FROM webhooks
            WHERE id = $1
            RETURNING id, method, path, ip, status_code, content_type, content_length,
                      query_params, headers, body, body_encoding, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = &row {
            debug!(webhook_id = %row.id, "Deleted webhook");
        }
        row.map(WebhookRecord::try_from).transpose()
    }

    // Keyset paging on the id; see the trait note on concurrent inserts.
    async fn list(&self, cursor: Option<Uuid>, limit: u32) -> StoreResult<Vec<WebhookSummary>> {
        let rows = sqlx::query_as::<_, WebhookSummary>(
            r#"
            SELECT id, method, path, created_at
            FROM webhooks
            WHERE ($1::uuid IS NULL OR id < $1)
            ORDER BY id DESC
            LIMIT $2
            "#,
        )
        .bind(cursor)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        info!("Closing PostgreSQL connection pool");
        self.pool.close().await;
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
