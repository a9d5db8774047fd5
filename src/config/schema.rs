//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Secrets are not part of the schema; the API token is read from the
//! environment variable named by [`SearchConfig::api_token_env`].

use serde::{Deserialize, Serialize};

/// Root configuration for the RAG proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RagProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Search backend settings.
    pub search: SearchConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address, IP or host name with port (e.g., "0.0.0.0:8787", "localhost:8787").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8787".to_string(),
        }
    }
}

/// Search backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Name of the target RAG instance.
    pub rag_name: String,

    /// Base URL of the Cloudflare REST API.
    pub api_base_url: String,

    /// Cloudflare account that owns the RAG instance.
    pub account_id: String,

    /// Environment variable holding the API token.
    pub api_token_env: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            rag_name: "portfolio-ai".to_string(),
            api_base_url: "https://api.cloudflare.com/client/v4".to_string(),
            account_id: String::new(),
            api_token_env: "CLOUDFLARE_API_TOKEN".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Backend connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed to produce a response, in seconds.
    ///
    /// Streaming bodies are not bounded by this once headers are sent.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 60,
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for log aggregation.
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
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
