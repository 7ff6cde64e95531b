//! Integration tests for capturing requests under /capture
//!
//! Each test captures through the router, then reads the record back through
//! the inspection API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use webhook_inspector::store::InMemoryWebhookStore;
use webhook_inspector::{build_router, AppState, Config};

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with(config: Config) -> (Router, Arc<InMemoryWebhookStore>) {
        let store = Arc::new(InMemoryWebhookStore::new());
        let app = build_router(AppState::new(store.clone(), config).unwrap())
            .layer(MockConnectInfo(SocketAddr::from(([10, 0, 0, 1], 40000))));
        (app, store)
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Capture `request` and return the stored record as JSON.
    async fn capture(app: &Router, request: Request<Body>) -> Value {
        let (status, body) = call(app, request).await;
        assert_eq!(status, StatusCode::OK);
        let id = body["id"].as_str().unwrap().to_string();

        let (status, record) = call(
            app,
            Request::get(format!("/webhooks/{}", id)).body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["id"], id.as_str());
        record
    }

    #[tokio::test]
    async fn test_capture_post_with_query_and_json_body() {
        let (app, _) = app_with(Config::default());

        let record = capture(
            &app,
            Request::post("/capture/hook?a=1&a=2")
                .header("content-type", "application/json")
                .header("content-length", "7")
                .header("x-tag", "first")
                .body(Body::from("{\"x\":1}"))
                .unwrap(),
        )
        .await;

        assert_eq!(record["method"], "POST");
        assert_eq!(record["path"], "/hook");
        assert_eq!(record["ip"], "10.0.0.1");
        assert_eq!(record["statusCode"], 200);
        assert_eq!(record["contentType"], "application/json");
        assert_eq!(record["contentLength"], 7);
        assert_eq!(record["queryParams"]["a"], "1,2");
        assert_eq!(record["headers"]["x-tag"], "first");
        assert_eq!(record["body"], "{\"x\":1}");
        assert!(record.get("bodyEncoding").is_none());
    }

    #[tokio::test]
    async fn test_capture_accepts_any_method_and_bare_prefix() {
        let (app, store) = app_with(Config::default());

        let record = capture(
            &app,
            Request::put("/capture").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(record["method"], "PUT");
        assert_eq!(record["path"], "/");
        assert!(record["body"].is_null());
        assert!(record["queryParams"].is_null());

        let record = capture(
            &app,
            Request::delete("/capture/deeply/nested/path")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(record["method"], "DELETE");
        assert_eq!(record["path"], "/deeply/nested/path");

        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_binary_body_is_stored_as_base64() {
        let (app, _) = app_with(Config::default());

        let record = capture(
            &app,
            Request::post("/capture/upload")
                .header("content-type", "application/octet-stream")
                .body(Body::from(vec![0xff_u8, 0x00, 0xfe]))
                .unwrap(),
        )
        .await;

        assert_eq!(record["body"], "/wD+");
        assert_eq!(record["bodyEncoding"], "base64");
    }

    #[tokio::test]
    async fn test_nul_bytes_are_stored_safely() {
        let (app, _) = app_with(Config::default());

        let record = capture(
            &app,
            Request::post("/capture/hook?a=%00")
                .body(Body::from(b"a\0b".to_vec()))
                .unwrap(),
        )
        .await;

        assert_eq!(record["body"], "YQBi");
        assert_eq!(record["bodyEncoding"], "base64");
        assert_eq!(record["queryParams"]["a"], "%00");
    }

    #[tokio::test]
    async fn test_long_forwarded_address_is_captured() {
        let trusted = Config {
            trust_proxy_headers: true,
            ..Config::default()
        };
        let (app, store) = app_with(trusted);
        let long_ip = "a".repeat(65);

        let record = capture(
            &app,
            Request::post("/capture/hook")
                .header("x-forwarded-for", long_ip.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(record["ip"], long_ip.as_str());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected_without_capture() {
        let config = Config {
            max_body_bytes: 16,
            ..Config::default()
        };
        let (app, store) = app_with(config);

        let (status, body) = call(
            &app,
            Request::post("/capture/big")
                .body(Body::from(vec![b'a'; 64]))
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["message"], "Request body is too large");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_proxy_headers_only_when_trusted() {
        let forwarded = || {
            Request::post("/capture/hook")
                .header("x-forwarded-for", "203.0.113.7, 10.0.0.2")
                .body(Body::empty())
                .unwrap()
        };

        let (app, _) = app_with(Config::default());
        let record = capture(&app, forwarded()).await;
        assert_eq!(record["ip"], "10.0.0.1");

        let trusted = Config {
            trust_proxy_headers: true,
            ..Config::default()
        };
        let (app, _) = app_with(trusted);
        let record = capture(&app, forwarded()).await;
        assert_eq!(record["ip"], "203.0.113.7");
    }

    #[tokio::test]
    async fn test_captures_are_listed_newest_first() {
        let (app, _) = app_with(Config::default());

        let first = capture(&app, Request::post("/capture/one").body(Body::empty()).unwrap()).await;
        let second = capture(&app, Request::post("/capture/two").body(Body::empty()).unwrap()).await;

        let (status, page) = call(
            &app,
            Request::get("/webhooks").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["webhooks"][0]["id"], second["id"]);
        assert_eq!(page["webhooks"][0]["path"], "/two");
        assert_eq!(page["webhooks"][1]["id"], first["id"]);
        assert!(page["nextCursor"].is_null());
    }
}
