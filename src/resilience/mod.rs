//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream attempt:
//!     → timeouts.rs (independent per-attempt deadline)
//!     → retry.rs (classify the outcome: success / client / server / transport)
//!     → backoff.rs (jittered delay before the next retryable attempt)
//! ```
//!
//! # Design Decisions
//! - Every upstream call has a deadline; expiry counts as a transport failure
//! - Client errors and redirects stop the loop; only missing responses and
//!   server errors continue it
//! - Jittered backoff prevents retry storms against a struggling upstream

pub mod backoff;
pub mod retry;
pub mod timeouts;
