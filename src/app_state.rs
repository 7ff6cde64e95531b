//! Application state shared across all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::Config;
use crate::store::WebhookStore;
use crate::views::Renderer;

/// Application state shared across handlers.
///
/// The store handle is opened at process start and injected here; handlers
/// never reach for a global connection.
#[derive(Clone)]
pub struct AppState {
    /// Record store backing every webhook endpoint
    pub store: Arc<dyn WebhookStore>,
    /// Application configuration
    pub config: Arc<Config>,
    /// Prometheus renderer; absent when no recorder was installed
    pub metrics_handle: Option<PrometheusHandle>,
    /// Compiled HTML view templates
    pub renderer: Arc<Renderer>,
}

impl AppState {
    pub fn new(store: Arc<dyn WebhookStore>, config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            store,
            config: Arc::new(config),
            metrics_handle: None,
            renderer: Arc::new(Renderer::new()?),
        })
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
