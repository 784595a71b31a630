//! Upstream response materialization.
//!
//! # Responsibilities
//! - Copy upstream headers onto the context's response slot (additive)
//! - Propagate the upstream status code
//! - Read the upstream body fully so downstream stages see buffered bytes
//!
//! # Design Decisions
//! - Headers set by earlier stages survive; the copy appends, never clears
//! - Body materialization is bounded by the configured limit

use axum::body::{Body, Bytes};
use axum::http::Response;

use crate::pipeline::context::ForwardContext;
use crate::upstream::error::ForwardError;

/// Copy status, headers, and the fully-read body of `response` onto the
/// context's response slot.
pub async fn apply<B>(
    response: Response<B>,
    ctx: &mut ForwardContext,
    max_body: usize,
) -> Result<(), ForwardError>
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<axum::BoxError>,
{
    let (parts, body) = response.into_parts();

    for (name, value) in parts.headers.iter() {
        ctx.response.headers.append(name.clone(), value.clone());
    }
    ctx.response.status = parts.status;

    let bytes = axum::body::to_bytes(Body::new(body), max_body)
        .await
        .map_err(|source| ForwardError::BodyRead { source })?;
    ctx.response.body = bytes;

    Ok(())
}
