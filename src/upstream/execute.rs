//! Retry/timeout execution of upstream attempts.
//!
//! # Responsibilities
//! - Rebuild the outbound request fresh for every attempt
//! - Bound each attempt with an independent deadline
//! - Drive the retry loop off the attempt classification
//! - Surface the last failure unchanged when attempts are exhausted
//!
//! # Design Decisions
//! - Attempts are strictly sequential; no parallel racing of retries
//! - A received 100-499 non-2xx status stops the loop at once: the stage
//!   deliberately does not forward client errors or redirects as
//!   pass-through responses, it raises them to the outer layer
//! - The shared client is safe for concurrent use; its pooling is the
//!   transport's concern

use axum::body::Body;
use axum::http::Response;
use hyper::body::Incoming;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use std::time::Duration;

use crate::http::request::RequestId;
use crate::observability::metrics;
use crate::pipeline::context::{ForwardOptions, InboundRequest};
use crate::resilience::backoff::retry_delay;
use crate::resilience::retry::{classify_status, AttemptOutcome};
use crate::resilience::timeouts::deadline;
use crate::upstream::error::ForwardError;
use crate::upstream::translate;

/// Drives upstream attempts through the shared HTTP client.
#[derive(Clone)]
pub struct Executor {
    client: Client<HttpConnector, Body>,
}

impl Executor {
    pub fn new(client: Client<HttpConnector, Body>) -> Self {
        Self { client }
    }

    /// Execute up to `options.attempts` attempts and return the first 2xx
    /// response, or the last failure once no attempt remains.
    pub async fn send(
        &self,
        request: &InboundRequest,
        options: &ForwardOptions,
        id: &RequestId,
    ) -> Result<Response<Incoming>, ForwardError> {
        let attempts = options.attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.attempt(request, options.timeout).await {
                Ok(response) => {
                    if attempt > 1 {
                        tracing::info!(
                            request_id = %id,
                            attempt,
                            "Upstream exchange succeeded after retries"
                        );
                    }
                    return Ok(response);
                }
                Err(error) => {
                    if !error.is_retryable() || attempt >= attempts {
                        tracing::warn!(
                            request_id = %id,
                            attempt,
                            error = %error,
                            "Upstream exchange failed"
                        );
                        return Err(error);
                    }

                    let delay = retry_delay(attempt, options.base_delay_ms, options.max_delay_ms);
                    tracing::info!(
                        request_id = %id,
                        attempt,
                        delay = ?delay,
                        error = %error,
                        "Retrying upstream request"
                    );
                    metrics::record_retry(&request.host);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }

    /// One attempt: fresh request, independent deadline, classified result.
    async fn attempt(
        &self,
        request: &InboundRequest,
        timeout: Duration,
    ) -> Result<Response<Incoming>, ForwardError> {
        let outbound = translate::build(request).map_err(|source| ForwardError::Build { source })?;

        let response = deadline(timeout, self.client.request(outbound))
            .await
            .map_err(|_| ForwardError::Timeout { timeout })?
            .map_err(|source| ForwardError::Transport {
                source: Box::new(source),
            })?;

        match classify_status(response.status()) {
            AttemptOutcome::Success => Ok(response),
            _ => Err(ForwardError::Status {
                status: response.status(),
            }),
        }
    }
}
