use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Webhook Inspector API",
        description = "Capture arbitrary HTTP requests and inspect them later",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:3333", description = "Local development server")
    ),
    paths(
        // Capture
        crate::handlers::capture::capture_webhook,

        // Webhooks
        crate::handlers::webhooks::list_webhooks,
        crate::handlers::webhooks::get_webhook,
        crate::handlers::webhooks::delete_webhook,
        crate::handlers::webhooks::view_webhook,

        // Operations
        crate::handlers::health::health_check,
        crate::handlers::metrics::get_prometheus_metrics,
    ),
    components(
        schemas(
            crate::models::WebhookRecord,
            crate::models::WebhookSummary,
            crate::models::WebhookListResponse,
            crate::models::BodyEncoding,
            crate::models::CaptureResponse,
            crate::error::ErrorResponse,
            crate::handlers::health::HealthStatus,
            crate::handlers::health::ServiceHealth,
        )
    ),
    tags(
        (name = "capture", description = "Record inbound requests"),
        (name = "webhooks", description = "Inspect and delete captured requests"),
        (name = "health", description = "Health check endpoints"),
        (name = "metrics", description = "Prometheus metrics"),
    )
)]
pub struct ApiDoc;
