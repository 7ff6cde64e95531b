//! Turns an arbitrary inbound HTTP request into a [`NewWebhook`].
//!
//! Policies for the parts of a request that do not map one-to-one onto a
//! record:
//! - repeated header names are joined with `", "` in arrival order
//! - repeated query keys are joined with `","`
//! - bodies that are not valid UTF-8, or that contain a NUL byte, are stored
//!   base64-encoded and flagged with [`BodyEncoding::Base64`]
//! - U+0000 in header and query text is stored as the literal `%00`, since
//!   neither PostgreSQL `text` nor `jsonb` can hold it
//! - an empty body is stored as absent

use axum::extract::Query;
use axum::http::{header, HeaderMap, Method, Uri};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::ApiError;
use crate::models::{BodyEncoding, NewWebhook, StringMap};

/// Route prefix under which every request is captured
pub const CAPTURE_PREFIX: &str = "/capture";

/// Borrowed view of the request being captured
#[derive(Debug)]
pub struct InboundRequest<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
    pub body: &'a [u8],
    pub ip: String,
}

pub fn build_new_webhook(request: InboundRequest<'_>) -> Result<NewWebhook, ApiError> {
    let (body, body_encoding) = encode_body(request.body);

    Ok(NewWebhook {
        method: request.method.as_str().to_string(),
        path: capture_path(request.uri),
        ip: request.ip,
        status_code: None,
        content_type: request
            .headers
            .get(header::CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned()),
        content_length: content_length(request.headers, request.body.len()),
        query_params: query_params(request.uri)?,
        headers: flatten_headers(request.headers),
        body,
        body_encoding,
    })
}

/// Path the caller targeted, relative to the capture prefix.
pub fn capture_path(uri: &Uri) -> String {
    let rest = uri.path().strip_prefix(CAPTURE_PREFIX).unwrap_or(uri.path());
    if rest.is_empty() {
        "/".to_string()
    } else if rest.starts_with('/') {
        rest.to_string()
    } else {
        format!("/{}", rest)
    }
}

pub fn flatten_headers(headers: &HeaderMap) -> StringMap {
    headers
        .keys()
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|v| escape_nul(&String::from_utf8_lossy(v.as_bytes())))
                .collect::<Vec<_>>()
                .join(", ");
            (name.as_str().to_string(), joined)
        })
        .collect()
}

/// `None` when the request carried no query string at all.
pub fn query_params(uri: &Uri) -> Result<Option<StringMap>, ApiError> {
    if uri.query().is_none() {
        return Ok(None);
    }

    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)?;

    let mut params = StringMap::new();
    for (key, value) in pairs {
        let (key, value) = (escape_nul(&key), escape_nul(&value));
        match params.get_mut(&key) {
            Some(existing) => {
                existing.push(',');
                existing.push_str(&value);
            }
            None => {
                params.insert(key, value);
            }
        }
    }
    Ok(Some(params))
}

/// Declared `Content-Length` when it parses, else the received size of a
/// non-empty body.
pub fn content_length(headers: &HeaderMap, received: usize) -> Option<i32> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i32>().ok())
        .filter(|len| *len >= 0)
        .or_else(|| {
            if received == 0 {
                None
            } else {
                i32::try_from(received).ok()
            }
        })
}

pub fn encode_body(body: &[u8]) -> (Option<String>, Option<BodyEncoding>) {
    if body.is_empty() {
        return (None, None);
    }
    match std::str::from_utf8(body) {
        Ok(text) if !text.contains('\0') => (Some(text.to_string()), None),
        _ => (Some(STANDARD.encode(body)), Some(BodyEncoding::Base64)),
    }
}

/// Replace U+0000 with its percent-encoded form.
pub fn escape_nul(text: &str) -> String {
    text.replace('\0', "%00")
}
