//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, header names and value ranges
//! - Check that a configured origin is a usable base URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - A missing origin is valid; it is reported per request, not at startup

use std::net::SocketAddr;

use axum::http::HeaderName;

use crate::config::schema::RelayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: `{value}` is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("origin.url: {0}")]
    InvalidOrigin(String),

    #[error("forwarding.ignored_path_prefix: `{0}` must start with `/`")]
    InvalidPathPrefix(String),

    #[error("forwarding.client_ip_headers: `{0}` is not a valid header name")]
    InvalidHeaderName(String),

    #[error("forwarding.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if let Err(e) = config.target_origin() {
        errors.push(ValidationError::InvalidOrigin(e.to_string()));
    }

    let forwarding = &config.forwarding;
    if !forwarding.ignored_path_prefix.starts_with('/') {
        errors.push(ValidationError::InvalidPathPrefix(
            forwarding.ignored_path_prefix.clone(),
        ));
    }

    if let Err(invalid) = client_ip_header_names(&forwarding.client_ip_headers) {
        errors.extend(invalid);
    }

    if forwarding.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse the configured client-IP header names, reporting every invalid one.
pub fn client_ip_header_names(names: &[String]) -> Result<Vec<HeaderName>, Vec<ValidationError>> {
    let mut parsed = Vec::with_capacity(names.len());
    let mut errors = Vec::new();
    for name in names {
        match HeaderName::from_bytes(name.as_bytes()) {
            Ok(header) => parsed.push(header),
            Err(_) => errors.push(ValidationError::InvalidHeaderName(name.clone())),
        }
    }

    if errors.is_empty() {
        Ok(parsed)
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&RelayConfig::default()), Ok(()));
    }

    #[test]
    fn malformed_origin_is_rejected() {
        let mut config = RelayConfig::default();
        config.origin.url = Some("gopher://origin.example".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors.as_slice(), [ValidationError::InvalidOrigin(_)]));
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = RelayConfig::default();
        config.observability.metrics_address = "bogus".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidAddress {
                field: "observability.metrics_address",
                value: "bogus".to_string(),
            }]
        );
    }

    #[test]
    fn collects_every_forwarding_error() {
        let mut config = RelayConfig::default();
        config.forwarding.ignored_path_prefix = "reload".to_string();
        config.forwarding.client_ip_headers = vec!["bad header".to_string()];
        config.forwarding.max_body_bytes = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroBodyLimit));
    }

    #[test]
    fn client_ip_header_names_lowercased_and_checked() {
        let names = client_ip_header_names(&["CF-Connecting-IP".to_string()]).unwrap();
        assert_eq!(names, vec![HeaderName::from_static("cf-connecting-ip")]);

        let errors =
            client_ip_header_names(&["x-real-ip".to_string(), "no spaces".to_string()]).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidHeaderName("no spaces".to_string())]);
    }
}
