//! Application startup and initialization logic.
//!
//! Opens the record store once, runs migrations, and installs the metrics
//! recorder before the router is built.

use std::sync::Arc;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::{Config, LogFormat, StorageBackend};
use crate::database;
use crate::store::{InMemoryWebhookStore, PgWebhookStore, WebhookStore};

const DEFAULT_LOG_FILTER: &str = "webhook_inspector=debug,tower_http=debug";

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Initialize application services and create the AppState.
pub async fn initialize_app(config: &Config) -> Result<AppState> {
    info!(
        environment = %config.environment,
        backend = %config.storage_backend,
        "Starting webhook inspector"
    );

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
    info!("Prometheus metrics initialized");

    let store = open_store(config).await?;
    info!(backend = store.backend_name(), "Record store ready");

    Ok(AppState::new(store, config.clone())?.with_metrics(metrics_handle))
}

/// Open the configured record store.
pub async fn open_store(config: &Config) -> Result<Arc<dyn WebhookStore>> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = database::setup_database(&config.database).await?;
            info!("PostgreSQL connection established");

            database::run_migrations(&pool).await?;
            info!("Database migrations completed");

            Ok(Arc::new(PgWebhookStore::new(pool)))
        }
        StorageBackend::Memory => {
            if config.is_production() {
                tracing::warn!("In-memory store selected in production; captures are lost on restart");
            }
            Ok(Arc::new(InMemoryWebhookStore::new()))
        }
    }
}
