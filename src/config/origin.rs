//! Target origin parsing.

use std::fmt;
use url::Url;

use crate::config::loader::ConfigError;
use crate::config::schema::RelayConfig;

/// The backend every request is forwarded to.
///
/// Only scheme, host and port are kept; path and query always come from
/// the inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    base: String,
}

impl Origin {
    /// Parse an origin from a base URL such as `https://origin.example:8443`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidOrigin {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(&format!("unsupported scheme `{}`", other))),
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host"));
        }

        Ok(Self {
            base: url.origin().ascii_serialization(),
        })
    }

    /// `scheme://host[:port]` with no trailing slash.
    pub fn as_str(&self) -> &str {
        &self.base
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

impl RelayConfig {
    /// Resolve the configured origin.
    ///
    /// An absent or blank URL is not an error here: the relay still starts
    /// and answers every request with 500.
    pub fn target_origin(&self) -> Result<Option<Origin>, ConfigError> {
        match self.origin.url.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Origin::parse(raw).map(Some),
        }
    }
}
