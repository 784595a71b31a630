//! Target selection subsystem.
//!
//! # Data Flow
//! ```text
//! ForwardContext (fresh from the ingress)
//!     → target.rs (stamp configured scheme/host/port + forward options)
//!     → forwarding stage (consumes what was stamped)
//! ```
//!
//! # Design Decisions
//! - One configured target; balancing and discovery are out of scope
//! - Options travel on the context as an explicit struct, not a lookup bag

pub mod target;

pub use target::TargetStage;
