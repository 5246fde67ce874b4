//! Forwarding failures and how they are reported to the client.

use std::error::Error as StdError;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Everything that stops a request from being relayed.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// No origin configured; nothing is sent upstream.
    #[error("{binding} is not configured")]
    MissingOrigin { binding: String },

    /// The inbound body could not be read or exceeded the buffer limit.
    #[error("failed to read request body: {0}")]
    BodyRead(#[source] axum::Error),

    /// The outbound call failed before a response arrived.
    #[error(transparent)]
    Upstream(#[from] reqwest::Error),

    /// The origin did not send response headers before the deadline.
    #[error("origin did not respond within {}s", .0.as_secs())]
    Timeout(Duration),
}

impl ForwardError {
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::MissingOrigin { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ForwardError::BodyRead(_) => StatusCode::BAD_REQUEST,
            ForwardError::Upstream(_) | ForwardError::Timeout(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Label used for the `outcome` metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            ForwardError::MissingOrigin { .. } => "misconfigured",
            ForwardError::BodyRead(_) => "bad_request",
            ForwardError::Upstream(_) | ForwardError::Timeout(_) => "upstream_error",
        }
    }

    /// Plain-text body sent to the client.
    pub fn message(&self) -> String {
        match self {
            ForwardError::Upstream(e) => format!("Proxy error: {}", describe(e)),
            ForwardError::Timeout(_) => format!("Proxy error: {}", self),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}

/// An error's description followed by its source chain.
///
/// Sources already contained in the parent's text are skipped.
pub fn describe(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}
