//! HTTP ingress server.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all relay handler
//! - Wire up middleware (tracing, request ID, concurrency bound)
//! - Buffer the inbound body and build the per-request context
//! - Dispatch the context through the relay pipeline
//! - Render the mutated context, or map a propagated failure to a
//!   gateway-style status (this is the outer error-handling layer the
//!   forwarding stage defers to)

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::RelayConfig;
use crate::http::request::{RequestIdExt, RequestIdLayer};
use crate::observability::metrics;
use crate::pipeline::{ForwardContext, InboundRequest, Pipeline, ResponseSlot};
use crate::routing::TargetStage;
use crate::upstream::{Executor, ForwardError, ForwardStage};

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub upstream: Arc<str>,
    pub max_body_size: usize,
}

/// HTTP server fronting the relay pipeline.
pub struct RelayServer {
    router: Router,
    config: RelayConfig,
}

impl RelayServer {
    /// Create a new relay server with the given configuration.
    pub fn new(config: RelayConfig) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        let executor = Executor::new(client);

        let pipeline = Pipeline::builder()
            .stage(TargetStage::from_config(&config.upstream, &config.forward))
            .stage(ForwardStage::new(executor, config.limits.max_body_size))
            .build();

        let state = AppState {
            pipeline,
            upstream: config.upstream.label().into(),
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(relay_handler))
            .route("/", any(relay_handler))
            .with_state(state)
            .layer(GlobalConcurrencyLimitLayer::new(
                config.listener.max_connections,
            ))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.label(),
            "Relay server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Relay server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Main relay handler: context in, pipeline dispatch, response out.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let id = request.request_id().cloned().unwrap_or_default();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %id,
        method = %method,
        path = %path,
        "Relaying request"
    );

    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!(request_id = %id, "Inbound body exceeded the configured limit");
            metrics::record_request(
                &method,
                StatusCode::PAYLOAD_TOO_LARGE.as_u16(),
                &state.upstream,
                start,
            );
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let mut ctx = ForwardContext::new(InboundRequest::from_parts(&parts, body), id.clone());

    match state.pipeline.dispatch(&mut ctx).await {
        Ok(()) => {
            let status = ctx.response.status;
            metrics::record_request(&method, status.as_u16(), &state.upstream, start);
            render(ctx.response)
        }
        Err(error) => {
            let status = error_status(&error);
            tracing::error!(
                request_id = %id,
                error = %error,
                status = %status,
                "Relay failed"
            );
            metrics::record_request(&method, status.as_u16(), &state.upstream, start);
            (status, "Upstream request failed").into_response()
        }
    }
}

/// Map a propagated pipeline failure to the status this layer answers with.
fn error_status(error: &ForwardError) -> StatusCode {
    match error {
        ForwardError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        ForwardError::MissingOptions => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Turn the materialized response slot into the wire response.
fn render(slot: ResponseSlot) -> Response {
    let mut response = Response::new(Body::from(slot.body));
    *response.status_mut() = slot.status;
    *response.headers_mut() = slot.headers;
    // The body was re-framed from a buffer; hop-by-hop framing headers from
    // the upstream no longer apply.
    response.headers_mut().remove(header::TRANSFER_ENCODING);
    response.headers_mut().remove(header::CONNECTION);
    response
}
