// Utility functions for extracting caller information from captured requests

use std::net::SocketAddr;

use axum::http::HeaderMap;

/// Extract the client address advertised by a reverse proxy.
/// Checks X-Forwarded-For first, then X-Real-IP.
pub fn forwarded_ip_address(headers: &HeaderMap) -> Option<String> {
    // X-Forwarded-For can contain multiple IPs, take the first one
    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(value) = forwarded_for.to_str() {
            let ip = value.split(',').next().unwrap_or("").trim();
            if !ip.is_empty() {
                return Some(ip.to_string());
            }
        }
    }

    // X-Real-IP (common in nginx)
    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(value) = real_ip.to_str() {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    None
}

/// Origin address of a captured request.
///
/// Proxy headers are only honoured when `trust_proxy_headers` is set; the
/// socket peer address is the fallback either way.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        if let Some(ip) = forwarded_ip_address(headers) {
            return ip;
        }
    }
    peer.ip().to_string()
}
