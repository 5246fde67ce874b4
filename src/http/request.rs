//! Request handling and transformation.
//!
//! # Responsibilities
//! - Build the target URL from the origin and the inbound path + query
//! - Decide which requests are short-circuited
//! - Buffer the inbound body for methods that carry one
//! - Generate a request ID for log correlation
//!
//! # Design Decisions
//! - Path and query are appended verbatim, never re-encoded
//! - GET and HEAD bodies are never read, even when the client sent one
//! - The request ID lives only in the tracing span; it is not forwarded

use axum::{
    body::{Body, Bytes},
    http::{Method, Uri},
};
use uuid::Uuid;

use crate::config::Origin;
use crate::http::error::ForwardError;

/// Correlation identifier attached to each request's span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// `origin` + inbound path + `?query`.
pub fn target_url(origin: &Origin, uri: &Uri) -> String {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    if path_and_query.starts_with('/') {
        format!("{}{}", origin, path_and_query)
    } else {
        // Asterisk-form (`OPTIONS *`) or a bare query.
        format!("{}/{}", origin, path_and_query)
    }
}

/// Whether the path falls under the ignored polling prefix.
pub fn is_ignored_path(path: &str, prefix: &str) -> bool {
    !prefix.is_empty() && path.starts_with(prefix)
}

/// Only GET and HEAD are sent without a body.
pub fn carries_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD)
}

/// Read the whole inbound body into memory if the method carries one.
pub async fn read_body(method: &Method, body: Body, limit: usize) -> Result<Option<Bytes>, ForwardError> {
    if !carries_body(method) {
        return Ok(None);
    }

    axum::body::to_bytes(body, limit)
        .await
        .map(Some)
        .map_err(ForwardError::BodyRead)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Origin {
        Origin::parse("https://origin.example").unwrap()
    }

    #[test]
    fn path_and_query_appended_verbatim() {
        let uri: Uri = "/foo?x=1".parse().unwrap();
        assert_eq!(target_url(&origin(), &uri), "https://origin.example/foo?x=1");
    }

    #[test]
    fn origin_path_is_replaced() {
        let origin = Origin::parse("http://127.0.0.1:3000/ignored?also=ignored").unwrap();
        let uri: Uri = "/api/v1/items".parse().unwrap();
        assert_eq!(target_url(&origin, &uri), "http://127.0.0.1:3000/api/v1/items");
    }

    #[test]
    fn encoded_segments_survive() {
        let uri: Uri = "/a%20b/c%2Fd?q=%E2%9C%93&x=1&x=2".parse().unwrap();
        assert_eq!(
            target_url(&origin(), &uri),
            "https://origin.example/a%20b/c%2Fd?q=%E2%9C%93&x=1&x=2"
        );
    }

    #[test]
    fn absolute_form_uses_only_path_and_query() {
        let uri: Uri = "http://edge.example.com/login?next=%2F".parse().unwrap();
        assert_eq!(target_url(&origin(), &uri), "https://origin.example/login?next=%2F");
    }

    #[test]
    fn root_path() {
        let uri: Uri = "/".parse().unwrap();
        assert_eq!(target_url(&origin(), &uri), "https://origin.example/");
    }

    #[test]
    fn ignored_prefix_matching() {
        assert!(is_ignored_path("/livereload", "/livereload"));
        assert!(is_ignored_path("/livereload/ws", "/livereload"));
        assert!(is_ignored_path("/livereload.js", "/livereload"));
        assert!(!is_ignored_path("/app/livereload", "/livereload"));
        assert!(!is_ignored_path("/", ""));
    }

    #[test]
    fn body_carrying_methods() {
        assert!(!carries_body(&Method::GET));
        assert!(!carries_body(&Method::HEAD));
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS] {
            assert!(carries_body(&method), "{method} should carry a body");
        }
    }

    #[tokio::test]
    async fn get_body_is_never_read() {
        let body = read_body(&Method::GET, Body::from("ignored"), 1024).await.unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn post_body_buffered_exactly() {
        let body = read_body(&Method::POST, Body::from(r#"{"a":1}"#), 1024).await.unwrap();
        assert_eq!(body.unwrap(), Bytes::from_static(br#"{"a":1}"#));
    }

    #[tokio::test]
    async fn oversized_body_rejected() {
        let err = read_body(&Method::PUT, Body::from(vec![0u8; 64]), 16).await.unwrap_err();
        assert!(matches!(err, ForwardError::BodyRead(_)));
    }

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }
}
