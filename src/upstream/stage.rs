//! The forwarding pipeline stage.

use futures_util::future::BoxFuture;

use crate::pipeline::{ForwardContext, Next, Stage};
use crate::upstream::error::ForwardError;
use crate::upstream::execute::Executor;
use crate::upstream::respond;

/// Pipeline stage that exchanges the context's request with the upstream
/// and materializes the response before handing control to the next stage.
///
/// The next stage runs exactly once, and only after a successful exchange;
/// executor failures propagate out of the pipeline unchanged for the outer
/// layer to render.
pub struct ForwardStage {
    executor: Executor,
    max_body: usize,
}

impl ForwardStage {
    pub fn new(executor: Executor, max_body: usize) -> Self {
        Self { executor, max_body }
    }
}

impl Stage for ForwardStage {
    fn invoke<'a>(
        &'a self,
        ctx: &'a mut ForwardContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), ForwardError>> {
        Box::pin(async move {
            let options = ctx.options.clone().ok_or(ForwardError::MissingOptions)?;
            let response = self.executor.send(&ctx.request, &options, &ctx.id).await?;
            respond::apply(response, ctx, self.max_body).await?;
            next.run(ctx).await
        })
    }
}
