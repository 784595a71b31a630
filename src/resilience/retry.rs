//! Retry classification.
//!
//! # Responsibilities
//! - Tag each upstream attempt outcome for the retry decision
//! - Keep the status-magnitude policy in one place
//!
//! # Design Decisions
//! - Classification is data, not exception inspection: the executor
//!   matches on a tag
//! - Client errors and redirects (100-499, non-2xx) never retry; only
//!   missing responses and server errors continue the loop

use axum::http::StatusCode;

/// Classification of one upstream attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// 2xx response; the loop stops and keeps it.
    Success,
    /// Received status in 100-499 outside 2xx; stops the loop immediately.
    ClientOrRedirect,
    /// Received status >= 500; eligible for another attempt.
    ServerError,
    /// No response at all (timeout, connect/DNS failure); eligible for
    /// another attempt.
    TransportFailure,
}

impl AttemptOutcome {
    pub fn retryable(&self) -> bool {
        matches!(self, Self::ServerError | Self::TransportFailure)
    }
}

/// Classify a received status code.
pub fn classify_status(status: StatusCode) -> AttemptOutcome {
    if status.is_success() {
        AttemptOutcome::Success
    } else if status.is_server_error() {
        AttemptOutcome::ServerError
    } else {
        AttemptOutcome::ClientOrRedirect
    }
}
