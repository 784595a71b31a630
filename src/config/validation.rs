//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts >= 1, timeouts > 0)
//! - Check the upstream target composes into a well-formed URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the parsed config
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug)]
pub enum ValidationError {
    InvalidBindAddress(String),
    ZeroMaxConnections,
    EmptyUpstreamHost,
    UnsupportedScheme(String),
    InvalidUpstreamTarget(String),
    ZeroAttempts,
    ZeroTimeout,
    ZeroMaxBodySize,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address {:?} is not a socket address", addr)
            }
            ValidationError::ZeroMaxConnections => {
                write!(f, "listener.max_connections must be greater than zero")
            }
            ValidationError::EmptyUpstreamHost => write!(f, "upstream.host must not be empty"),
            ValidationError::UnsupportedScheme(scheme) => write!(
                f,
                "upstream.scheme {:?} is not supported; the relay only speaks plain http",
                scheme
            ),
            ValidationError::InvalidUpstreamTarget(target) => {
                write!(f, "upstream target {:?} is not a valid URL", target)
            }
            ValidationError::ZeroAttempts => write!(f, "forward.attempts must be at least 1"),
            ValidationError::ZeroTimeout => {
                write!(f, "forward.timeout_secs must be greater than zero")
            }
            ValidationError::ZeroMaxBodySize => {
                write!(f, "limits.max_body_size must be greater than zero")
            }
        }
    }
}

/// Validate the parsed configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }

    if config.upstream.host.is_empty() {
        errors.push(ValidationError::EmptyUpstreamHost);
    }
    if config.upstream.scheme != "http" {
        errors.push(ValidationError::UnsupportedScheme(
            config.upstream.scheme.clone(),
        ));
    }
    if !config.upstream.host.is_empty() {
        let target = match config.upstream.port {
            Some(port) => format!("{}://{}:{}", config.upstream.scheme, config.upstream.host, port),
            None => format!("{}://{}", config.upstream.scheme, config.upstream.host),
        };
        if Url::parse(&target).is_err() {
            errors.push(ValidationError::InvalidUpstreamTarget(target));
        }
    }

    if config.forward.attempts == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }
    if config.forward.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroMaxBodySize);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
