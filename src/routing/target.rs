//! Upstream target stamping.

use futures_util::future::BoxFuture;

use crate::config::{ForwardConfig, UpstreamConfig};
use crate::pipeline::{ForwardContext, ForwardOptions, Next, Stage};
use crate::upstream::ForwardError;

/// Pipeline stage that stamps the configured upstream target and the
/// per-request forward options onto the context.
///
/// Stands in for whatever routing or balancing layer would otherwise pick
/// the target; the forwarding stage only ever reads what this one wrote.
pub struct TargetStage {
    scheme: String,
    host: String,
    port: Option<u16>,
    options: ForwardOptions,
}

impl TargetStage {
    pub fn from_config(upstream: &UpstreamConfig, forward: &ForwardConfig) -> Self {
        Self {
            scheme: upstream.scheme.clone(),
            host: upstream.host.clone(),
            port: upstream.port,
            options: ForwardOptions::from(forward),
        }
    }
}

impl Stage for TargetStage {
    fn invoke<'a>(
        &'a self,
        ctx: &'a mut ForwardContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), ForwardError>> {
        Box::pin(async move {
            ctx.request.scheme = self.scheme.clone();
            ctx.request.host = self.host.clone();
            ctx.request.port = self.port;
            ctx.options = Some(self.options.clone());
            next.run(ctx).await
        })
    }
}
