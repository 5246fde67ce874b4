//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the origin response to the client
//! - Synthesize the responses the relay answers on its own
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Redirects are relayed, never followed, so their cookies reach the browser
//! - Hop-by-hop headers stripped when configured
//! - Non-canonical reason phrases are carried through

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use hyper::ext::ReasonPhrase;

use crate::security::headers::strip_hop_by_hop;

/// Turn an origin response into the client response.
pub fn relay(upstream: reqwest::Response, strip: bool) -> Response {
    let status = upstream.status();
    let reason = upstream.extensions().get::<ReasonPhrase>().cloned();
    let mut headers = upstream.headers().clone();
    if strip {
        strip_hop_by_hop(&mut headers);
    }

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    if let Some(reason) = reason {
        response.extensions_mut().insert(reason);
    }
    response
}

/// 204 with an empty body, for ignored polling requests.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Plain-text response with an explicit content type.
pub fn plain_text(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
        body,
    )
        .into_response()
}
