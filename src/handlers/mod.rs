// HTTP handlers

pub mod capture;
pub mod extractors;
pub mod health;
pub mod metrics;
pub mod response;
pub mod webhooks;

pub use capture::capture_webhook;
pub use health::health_check;
pub use metrics::get_prometheus_metrics;
pub use webhooks::{delete_webhook, get_webhook, list_webhooks, view_webhook};
