//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and formats.
//! Returns all validation errors, not just the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::RagProxyConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' must be host:port")]
    BindAddress(String),

    #[error("search.rag_name must not be empty")]
    EmptyRagName,

    #[error("search.api_base_url '{0}' must be an http(s) URL")]
    ApiBaseUrl(String),

    #[error("search.api_token_env must not be empty")]
    EmptyTokenEnv,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("limits.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("observability.log_level '{0}' is not a known level")]
    LogLevel(String),
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// An IP socket address, or `host:port` left for the listener to resolve.
fn is_bind_address(value: &str) -> bool {
    if value.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match value.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty() && !host.contains([':', '[', ']']) && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RagProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_bind_address(&config.listener.bind_address) {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.search.rag_name.trim().is_empty() {
        errors.push(ValidationError::EmptyRagName);
    }

    match url::Url::parse(&config.search.api_base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => errors.push(ValidationError::ApiBaseUrl(config.search.api_base_url.clone())),
    }

    if config.search.api_token_env.trim().is_empty() {
        errors.push(ValidationError::EmptyTokenEnv);
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
