//! Lifecycle coordination.
//!
//! # Responsibilities
//! - Broadcast graceful-shutdown signal to long-running tasks (shutdown.rs)
//! - Translate OS signals into that broadcast (signals.rs)

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
