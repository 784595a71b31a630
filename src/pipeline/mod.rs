//! Pipeline composition.
//!
//! # Data Flow
//! ```text
//! Inbound request:
//!     → ForwardContext built by the ingress
//!     → Pipeline::dispatch walks the ordered stage list
//!     → each stage mutates the context and may invoke the rest of the
//!       chain through its Next handle (at most once)
//!     → the mutated context (or the propagated error) flows back out
//! ```
//!
//! # Design Decisions
//! - Stages are trait objects composed at startup, not a delegate chain
//! - `Next` is consumed by `run`, so a stage cannot invoke its tail twice
//! - An empty tail completes successfully; the last stage is the terminal

pub mod context;

use futures_util::future::BoxFuture;
use std::sync::Arc;

pub use context::{ForwardBody, ForwardContext, ForwardOptions, InboundRequest, ResponseSlot};

use crate::upstream::error::ForwardError;

/// One stage of the relay pipeline.
pub trait Stage: Send + Sync {
    /// Process the context and, if appropriate, hand control to the rest of
    /// the chain via `next`.
    fn invoke<'a>(
        &'a self,
        ctx: &'a mut ForwardContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), ForwardError>>;
}

/// Handle to the remaining stages of the chain.
pub struct Next<'a> {
    stages: &'a [Arc<dyn Stage>],
}

impl<'a> Next<'a> {
    /// Run the rest of the chain. Consumes the handle.
    pub async fn run(self, ctx: &mut ForwardContext) -> Result<(), ForwardError> {
        match self.stages.split_first() {
            Some((stage, rest)) => stage.invoke(ctx, Next { stages: rest }).await,
            None => Ok(()),
        }
    }
}

/// An ordered, immutable chain of stages composed at startup.
#[derive(Clone)]
pub struct Pipeline {
    stages: Arc<[Arc<dyn Stage>]>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder { stages: Vec::new() }
    }

    /// Dispatch one context through the whole chain.
    pub async fn dispatch(&self, ctx: &mut ForwardContext) -> Result<(), ForwardError> {
        Next {
            stages: &self.stages,
        }
        .run(ctx)
        .await
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Builder collecting stages in invocation order.
pub struct PipelineBuilder {
    stages: Vec<Arc<dyn Stage>>,
}

impl PipelineBuilder {
    pub fn stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::RequestId;
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Stage for Recorder {
        fn invoke<'a>(
            &'a self,
            ctx: &'a mut ForwardContext,
            next: Next<'a>,
        ) -> BoxFuture<'a, Result<(), ForwardError>> {
            Box::pin(async move {
                self.log.lock().unwrap().push(self.name);
                next.run(ctx).await
            })
        }
    }

    struct Failing;

    impl Stage for Failing {
        fn invoke<'a>(
            &'a self,
            _ctx: &'a mut ForwardContext,
            _next: Next<'a>,
        ) -> BoxFuture<'a, Result<(), ForwardError>> {
            Box::pin(async move { Err(ForwardError::MissingOptions) })
        }
    }

    fn test_context() -> ForwardContext {
        ForwardContext::new(InboundRequest::default(), RequestId::new())
    }

    #[tokio::test]
    async fn test_stages_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .stage(Recorder {
                name: "first",
                log: log.clone(),
            })
            .stage(Recorder {
                name: "second",
                log: log.clone(),
            })
            .build();

        let mut ctx = test_context();
        pipeline.dispatch(&mut ctx).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_failing_stage_short_circuits_the_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .stage(Failing)
            .stage(Recorder {
                name: "unreached",
                log: log.clone(),
            })
            .build();

        let mut ctx = test_context();
        let result = pipeline.dispatch(&mut ctx).await;
        assert!(matches!(result, Err(ForwardError::MissingOptions)));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_pipeline_completes() {
        let pipeline = Pipeline::builder().build();
        let mut ctx = test_context();
        pipeline.dispatch(&mut ctx).await.unwrap();
    }
}
