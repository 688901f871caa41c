use axum::http::HeaderMap;
use std::net::IpAddr;

/// Identity shared by every client whose address cannot be trusted.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Resolve the client identity used for rate limiting and stored with each record.
///
/// Proxy headers are only honoured behind a trusted proxy; anywhere else they are freely
/// spoofable, so all such clients share the [`UNKNOWN_CLIENT`] bucket.
pub fn resolve_client_identity(headers: &HeaderMap, trusted_proxy: bool) -> String {
    if !trusted_proxy {
        return UNKNOWN_CLIENT.to_string();
    }
    extract_ip_from_headers(headers).map(|ip| ip.to_string()).unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Extract client IP from proxy headers: first hop of `x-forwarded-for`, then `x-real-ip`.
pub fn extract_ip_from_headers(headers: &HeaderMap) -> Option<IpAddr> {
    if let Some(h) = headers.get("x-forwarded-for").and_then(|hv| hv.to_str().ok()) {
        if let Some(first) = h.split(',').next() {
            if let Ok(ip) = first.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    if let Some(h) = headers.get("x-real-ip").and_then(|hv| hv.to_str().ok()) {
        if let Ok(ip) = h.trim().parse::<IpAddr>() {
            return Some(ip);
        }
    }
    None
}
