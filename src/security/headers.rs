//! Header manipulation for forwarded traffic.
//!
//! # Responsibilities
//! - Add X-Forwarded-For, X-Forwarded-Proto, X-Forwarded-Host
//! - Strip hop-by-hop headers
//! - Disable compression negotiation with the origin
//!
//! # Design Decisions
//! - Client IP comes only from the platform headers named in config; a
//!   client-sent X-Forwarded-For is never passed on
//! - `Host` is never forwarded; the transport derives it from the target URL
//! - Repeated headers keep every value as its own entry

use axum::http::{
    header::{self, HeaderName},
    HeaderMap, HeaderValue, Uri,
};

/// `X-Forwarded-For`.
pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
/// `X-Forwarded-Host`.
pub const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
/// `X-Forwarded-Proto`.
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Headers meaningful only for a single transport-level connection.
const HOP_BY_HOP: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "upgrade",
    "te",
    "trailer",
];

/// How inbound headers are rewritten before dispatch.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    /// Candidate client-IP headers, in order of preference.
    pub client_ip_headers: Vec<HeaderName>,
    /// Remove hop-by-hop headers.
    pub strip_hop_by_hop: bool,
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        Self {
            client_ip_headers: vec![
                HeaderName::from_static("cf-connecting-ip"),
                HeaderName::from_static("x-real-ip"),
            ],
            strip_hop_by_hop: true,
        }
    }
}

/// First non-empty value among the candidate headers.
pub fn forwarded_client_ip(headers: &HeaderMap, candidates: &[HeaderName]) -> Option<HeaderValue> {
    candidates
        .iter()
        .filter_map(|name| headers.get(name))
        .find(|value| !value.as_bytes().iter().all(u8::is_ascii_whitespace))
        .cloned()
}

/// The public hostname the client addressed.
///
/// HTTP/2 requests carry it in the URI authority instead of `Host`.
pub fn inbound_host(headers: &HeaderMap, uri: &Uri) -> Option<HeaderValue> {
    headers.get(header::HOST).cloned().or_else(|| {
        uri.authority()
            .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok())
    })
}

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Build the header set sent to the origin.
pub fn prepare_outbound_headers(inbound: &HeaderMap, uri: &Uri, policy: &HeaderPolicy) -> HeaderMap {
    let mut headers = inbound.clone();

    if policy.strip_hop_by_hop {
        strip_hop_by_hop(&mut headers);
    }

    headers.remove(header::HOST);
    // Recomputed by the transport from the buffered body.
    headers.remove(header::CONTENT_LENGTH);

    // The edge is always reached over TLS.
    headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("https"));
    if let Some(host) = inbound_host(inbound, uri) {
        headers.insert(X_FORWARDED_HOST, host);
    }
    headers.remove(X_FORWARDED_FOR);
    if let Some(ip) = forwarded_client_ip(inbound, &policy.client_ip_headers) {
        headers.insert(X_FORWARDED_FOR, ip);
    }

    headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    headers
}
