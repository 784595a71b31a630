//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, concurrency bound).
    pub listener: ListenerConfig,

    /// The upstream target every request is forwarded to.
    pub upstream: UpstreamConfig,

    /// Per-request forwarding options (attempts, deadline, backoff).
    pub forward: ForwardConfig,

    /// Body size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Upstream target configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// URL scheme used toward the upstream. Only "http" is accepted; the
    /// relay does not carry a TLS-capable connector.
    pub scheme: String,

    /// Upstream host name or address.
    pub host: String,

    /// Explicit upstream port. When absent, or equal to the scheme
    /// default, the bare host is used on the wire.
    pub port: Option<u16>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "127.0.0.1".to_string(),
            port: Some(3000),
        }
    }
}

impl UpstreamConfig {
    /// Human-readable target label for logs and metrics.
    pub fn label(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }
}

/// Forwarding options applied to every request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardConfig {
    /// Total attempts per request, including the first (>= 1).
    pub attempts: u32,

    /// Per-attempt deadline in seconds (> 0).
    pub timeout_secs: u64,

    /// Base delay for exponential backoff between retryable attempts, in
    /// milliseconds. 0 retries immediately.
    pub base_delay_ms: u64,

    /// Maximum backoff delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout_secs: 30,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

/// Body size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request and response body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_deserializes_with_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [upstream]
            host = "10.0.0.5"
            port = 8000
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.host, "10.0.0.5");
        assert_eq!(config.upstream.port, Some(8000));
        assert_eq!(config.forward.attempts, 3);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_upstream_label_includes_port_when_set() {
        let upstream = UpstreamConfig {
            scheme: "http".to_string(),
            host: "backend".to_string(),
            port: Some(9000),
        };
        assert_eq!(upstream.label(), "backend:9000");

        let bare = UpstreamConfig {
            port: None,
            ..upstream
        };
        assert_eq!(bare.label(), "backend");
    }
}
