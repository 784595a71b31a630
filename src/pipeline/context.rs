//! Per-request context threaded through the pipeline.
//!
//! # Responsibilities
//! - Carry the inbound request halves (target, headers, body) for translation
//! - Carry the response slot mutated by the forwarding stage
//! - Carry the explicit per-request forward options (no dynamic feature bag)
//!
//! # Design Decisions
//! - The inbound body is buffered once into `Bytes` so every upstream attempt
//!   gets an independently replayable copy
//! - Options are stamped by an earlier stage; a missing value when the
//!   forwarding stage runs is a configuration error, not a default

use axum::body::Bytes;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Method, StatusCode};
use std::time::Duration;

use crate::config::ForwardConfig;
use crate::http::request::RequestId;

/// Inbound request half of the context.
///
/// `scheme`, `host`, and `port` describe the upstream target and are stamped
/// by the target stage; the remaining fields describe the request as the
/// caller sent it.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub scheme: String,
    pub host: String,
    pub port: Option<u16>,
    /// Request path, starting with `/`.
    pub path: String,
    /// Query string including its leading `?`, or empty.
    pub query: String,
    pub headers: HeaderMap,
    pub body: ForwardBody,
}

impl InboundRequest {
    /// Build an inbound request from decomposed axum request parts plus the
    /// already-buffered body.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        let query = parts
            .uri
            .query()
            .map(|q| format!("?{q}"))
            .unwrap_or_default();

        let mut headers = parts.headers.clone();
        // The inbound Host names this relay, not the upstream; the transport
        // derives the right one from the rewritten URI.
        headers.remove(axum::http::header::HOST);

        Self {
            method: parts.method.clone(),
            scheme: "http".to_string(),
            host: String::new(),
            port: None,
            path: parts.uri.path().to_string(),
            query,
            headers,
            body: ForwardBody::from_bytes(body),
        }
    }
}

impl Default for InboundRequest {
    fn default() -> Self {
        Self {
            method: Method::GET,
            scheme: "http".to_string(),
            host: String::new(),
            port: None,
            path: "/".to_string(),
            query: String::new(),
            headers: HeaderMap::new(),
            body: ForwardBody::Empty,
        }
    }
}

/// Replayable request body.
#[derive(Debug, Clone)]
pub enum ForwardBody {
    /// The canonical empty-body sentinel.
    Empty,
    /// A body buffered up front so retries can re-send it.
    Buffered(Bytes),
}

impl ForwardBody {
    pub fn from_bytes(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            ForwardBody::Empty
        } else {
            ForwardBody::Buffered(bytes)
        }
    }
}

/// Response half of the context, filled in by the forwarding stage.
#[derive(Debug, Clone)]
pub struct ResponseSlot {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Default for ResponseSlot {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }
}

/// Per-request forwarding options.
///
/// `attempts` counts total attempts (not extra retries) and is always at
/// least 1; `timeout` is the independent deadline applied to each attempt.
#[derive(Debug, Clone)]
pub struct ForwardOptions {
    pub attempts: u32,
    pub timeout: Duration,
    /// Base delay for backoff between retryable attempts; 0 retries
    /// immediately.
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl From<&ForwardConfig> for ForwardOptions {
    fn from(config: &ForwardConfig) -> Self {
        Self {
            attempts: config.attempts.max(1),
            timeout: Duration::from_secs(config.timeout_secs.max(1)),
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }
}

/// Mutable request-scoped context owned by one pipeline dispatch.
#[derive(Debug)]
pub struct ForwardContext {
    pub request: InboundRequest,
    pub response: ResponseSlot,
    pub options: Option<ForwardOptions>,
    pub id: RequestId,
}

impl ForwardContext {
    pub fn new(request: InboundRequest, id: RequestId) -> Self {
        Self {
            request,
            response: ResponseSlot::default(),
            options: None,
            id,
        }
    }
}
