use axum::{
    body::Body,
    http::{header, HeaderValue, Request, Response},
    middleware::Next,
};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
                                       script-src 'self' 'unsafe-inline'; \
                                       style-src 'self' 'unsafe-inline'; \
                                       img-src 'self' data:; \
                                       frame-ancestors 'none'; \
                                       base-uri 'self'; \
                                       form-action 'self'";

/// Add security headers to all responses
///
/// The detail view renders captured, attacker-controlled values as HTML, so
/// these apply to every route.
pub async fn add_security_headers(request: Request<Body>, next: Next) -> Response<Body> {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );

    response
}
