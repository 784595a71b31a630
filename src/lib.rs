//! Upstream-forwarding relay library.
//!
//! The heart of the crate is a pipeline stage that rebuilds each inbound
//! request as an outbound HTTP request, executes it with bounded retries
//! and a per-attempt deadline, and writes the upstream response back into
//! the request context before invoking the next stage.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod resilience;
pub mod routing;
pub mod upstream;

pub use config::RelayConfig;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
pub use pipeline::{ForwardContext, Pipeline, Stage};
pub use upstream::ForwardError;
