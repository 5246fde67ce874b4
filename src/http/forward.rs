//! The forwarding handler.
//!
//! One inbound request becomes at most one outbound request against the
//! configured origin. Order of checks:
//!
//! ```text
//! no origin configured        → 500, nothing sent
//! path under ignored prefix   → 204, nothing sent
//! otherwise                   → rewrite headers, buffer body, send once
//!     origin answered         → relay status, headers, streamed body
//!     transport failure       → 502 "Proxy error: ..."
//!     no response headers in time → 502 "Proxy error: ..."
//! ```

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::Request,
    response::Response,
};
use tracing::Instrument;

use crate::config::validation::client_ip_header_names;
use crate::config::{ConfigError, Origin, RelayConfig};
use crate::http::error::ForwardError;
use crate::http::request::{is_ignored_path, read_body, target_url, RequestId};
use crate::http::response::{no_content, plain_text, relay};
use crate::observability::metrics;
use crate::security::headers::{prepare_outbound_headers, HeaderPolicy};

/// Bridges inbound requests to the single origin.
///
/// Holds no per-request state; clones share the outbound client.
#[derive(Debug, Clone)]
pub struct Forwarder {
    origin: Option<Origin>,
    origin_binding: String,
    ignored_path_prefix: String,
    headers: HeaderPolicy,
    max_body_bytes: usize,
    response_timeout: Option<Duration>,
    client: reqwest::Client,
}

impl Forwarder {
    /// Build a forwarder from configuration.
    ///
    /// Invalid client-IP header names or a malformed origin are rejected.
    pub fn new(config: &RelayConfig) -> Result<Self, ConfigError> {
        let forwarding = &config.forwarding;

        let client_ip_headers =
            client_ip_header_names(&forwarding.client_ip_headers).map_err(ConfigError::Validation)?;
        let response_timeout = match config.timeouts.request_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            origin: config.target_origin()?,
            origin_binding: config.origin.env_var.clone(),
            ignored_path_prefix: forwarding.ignored_path_prefix.clone(),
            headers: HeaderPolicy {
                client_ip_headers,
                strip_hop_by_hop: forwarding.strip_hop_by_hop,
            },
            max_body_bytes: forwarding.max_body_bytes,
            response_timeout,
            client: build_client()?,
        })
    }

    /// The resolved origin, if one is configured.
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    /// Handle one inbound request.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let method = request.method().clone();
        let span = tracing::info_span!(
            "forward",
            request_id = %RequestId::new(),
            method = %method,
            path = %request.uri().path(),
        );

        async move {
            match self.dispatch(request).await {
                Ok((response, outcome)) => {
                    metrics::record_request(method.as_str(), response.status().as_u16(), outcome, start);
                    response
                }
                Err(err) => {
                    let status = err.status();
                    match &err {
                        ForwardError::MissingOrigin { .. } => {
                            tracing::error!(error = %err, "Origin not configured")
                        }
                        ForwardError::BodyRead(_) => {
                            tracing::warn!(error = %err, "Rejected request body")
                        }
                        ForwardError::Upstream(_) | ForwardError::Timeout(_) => {
                            tracing::warn!(error = %err.message(), "Upstream error")
                        }
                    }
                    metrics::record_request(method.as_str(), status.as_u16(), err.outcome(), start);
                    plain_text(status, err.message())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, request: Request<Body>) -> Result<(Response, &'static str), ForwardError> {
        let origin = self.origin.as_ref().ok_or_else(|| ForwardError::MissingOrigin {
            binding: self.origin_binding.clone(),
        })?;

        if is_ignored_path(request.uri().path(), &self.ignored_path_prefix) {
            tracing::trace!("Ignored polling request");
            return Ok((no_content(), "ignored"));
        }

        let (parts, body) = request.into_parts();
        let url = target_url(origin, &parts.uri);
        let headers = prepare_outbound_headers(&parts.headers, &parts.uri, &self.headers);
        let body = read_body(&parts.method, body, self.max_body_bytes).await?;

        tracing::debug!(target_url = %url, "Forwarding request");

        let mut outbound = self.client.request(parts.method, url).headers(headers);
        if let Some(bytes) = body {
            outbound = outbound.body(bytes);
        }

        let upstream = match self.response_timeout {
            Some(limit) => tokio::time::timeout(limit, outbound.send())
                .await
                .map_err(|_| ForwardError::Timeout(limit))??,
            None => outbound.send().await?,
        };
        tracing::debug!(status = %upstream.status(), "Origin responded");

        Ok((relay(upstream, self.headers.strip_hop_by_hop), "relayed"))
    }
}

/// Outbound client: never follows redirects, never decompresses, ignores
/// system proxy settings.
fn build_client() -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_gzip()
        .no_brotli()
        .no_deflate()
        .no_proxy()
        .build()
        .map_err(|e| ConfigError::Client(e.to_string()))
}
