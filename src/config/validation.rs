//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem is
//! reported, not just the first one.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid URL '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field}: unsupported scheme '{scheme}' (expected http or https)")]
    UnsupportedScheme { field: &'static str, scheme: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.request_secs ({request_secs}s) must cover two gateway attempts ({needed_ms}ms)")]
    RequestDeadlineTooShort { request_secs: u64, needed_ms: u64 },

    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("listener.strip_prefix '{0}' must start with '/'")]
    InvalidStripPrefix(String),

    #[error("admin.api_key must be set when admin endpoints are enabled")]
    MissingAdminKey,
}

/// Validate a configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_base_url("upstreams.primary_url", &config.upstreams.primary_url, &mut errors);
    check_base_url("upstreams.secondary_url", &config.upstreams.secondary_url, &mut errors);
    check_base_url("upstreams.local_url", &config.upstreams.local_url, &mut errors);

    let timeouts = &config.timeouts;
    if timeouts.gateway_attempt_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.gateway_attempt_ms"));
    }
    if timeouts.page_fetch_attempt_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.page_fetch_attempt_ms"));
    }
    let needed_ms = timeouts.gateway_attempt_ms.saturating_mul(2);
    if timeouts.request_secs.saturating_mul(1000) <= needed_ms {
        errors.push(ValidationError::RequestDeadlineTooShort {
            request_secs: timeouts.request_secs,
            needed_ms,
        });
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if let Some(prefix) = &config.listener.strip_prefix {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::InvalidStripPrefix(prefix.clone()));
        }
    }

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::MissingAdminKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::UnsupportedScheme {
            field,
            scheme: url.scheme().to_string(),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}
