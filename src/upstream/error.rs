//! Forwarding failure taxonomy.

use axum::http::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::resilience::retry::classify_status;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of one pipeline dispatch.
///
/// The executor surfaces the error of the *last* attempt unchanged when
/// retries are exhausted; there is no synthetic wrapper variant.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The outbound request could not be constructed. Malformed target
    /// fields are the transport's problem, so this is classified with
    /// transport failures and retried.
    #[error("failed to build upstream request: {source}")]
    Build {
        #[source]
        source: axum::http::Error,
    },

    /// Connection refused, DNS failure, broken transfer.
    #[error("upstream transport error: {source}")]
    Transport {
        #[source]
        source: BoxError,
    },

    /// The per-attempt deadline expired before a response arrived.
    #[error("upstream attempt timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// A response arrived with a non-2xx status. Server errors (>= 500)
    /// are retryable; client errors and redirects stop the loop and are
    /// surfaced as this single failure rather than forwarded downstream.
    #[error("upstream returned status {status}")]
    Status { status: StatusCode },

    /// Reading the upstream response body failed while materializing it.
    #[error("failed to read upstream response body: {source}")]
    BodyRead {
        #[source]
        source: axum::Error,
    },

    /// Forward options were absent from the context when the forwarding
    /// stage ran. Produced by a misassembled pipeline, never retried.
    #[error("forward options missing from request context")]
    MissingOptions,
}

impl ForwardError {
    /// Whether another attempt may follow this failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Build { .. } | Self::Transport { .. } | Self::Timeout { .. } => true,
            Self::Status { status } => classify_status(*status).retryable(),
            Self::BodyRead { .. } | Self::MissingOptions => false,
        }
    }
}
