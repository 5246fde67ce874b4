//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single origin every request is forwarded to.
    pub origin: OriginConfig,

    /// Per-request forwarding behaviour.
    pub forwarding: ForwardingConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl RelayConfig {
    /// Replace the origin URL with the environment binding, if it is set.
    ///
    /// A blank binding is ignored so that an empty secret does not mask a
    /// value from the config file.
    pub fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(&self.origin.env_var) {
            if !value.trim().is_empty() {
                self.origin.url = Some(value);
            }
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Target origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Base URL of the origin (scheme + host + optional port).
    ///
    /// Left unset, every request is answered with 500.
    pub url: Option<String>,

    /// Environment variable that overrides `url`.
    pub env_var: String,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            url: None,
            env_var: "TARGET_ORIGIN".to_string(),
        }
    }
}

/// Forwarding behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Requests under this path prefix are answered with 204 and never forwarded.
    pub ignored_path_prefix: String,

    /// Headers consulted, in order, for the original client IP.
    pub client_ip_headers: Vec<String>,

    /// Strip hop-by-hop headers in both directions.
    pub strip_hop_by_hop: bool,

    /// Largest inbound body buffered before dispatch, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            ignored_path_prefix: "/livereload".to_string(),
            client_ip_headers: vec!["cf-connecting-ip".to_string(), "x-real-ip".to_string()],
            strip_hop_by_hop: true,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for the origin's response headers in seconds (0 = none).
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
