//! Outbound request construction.
//!
//! # Responsibilities
//! - Compose the upstream host string, eliding scheme-default ports
//! - Compose the upstream URL from scheme, host string, path, and query
//! - Substitute an explicit empty body for the empty-stream sentinel
//! - Copy inbound headers with caller precedence over transport defaults
//!
//! # Design Decisions
//! - Called fresh for every attempt; bodies are cheap clones of the
//!   buffered bytes, so retries never re-read a consumed stream
//! - Builder failures are handed to the executor, which classifies them
//!   with transport failures

use axum::body::Body;
use axum::http::Request;

use crate::pipeline::context::{ForwardBody, InboundRequest};

/// Default port for a scheme, where one is defined.
fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "https" => Some(443),
        "http" => Some(80),
        _ => None,
    }
}

/// Compose the authority portion of the upstream URL.
///
/// An explicit port is appended unless it is the scheme's default; some
/// upstreams reject redundant default-port suffixes.
pub fn host_string(request: &InboundRequest) -> String {
    match request.port {
        None => request.host.clone(),
        Some(port) if default_port(&request.scheme) == Some(port) => request.host.clone(),
        Some(port) => format!("{}:{}", request.host, port),
    }
}

/// Build one outbound request from the context's request half.
///
/// The URL is the literal concatenation of scheme, host string, path, and
/// query; the query is expected to already carry its leading `?` or be
/// empty.
pub fn build(request: &InboundRequest) -> Result<Request<Body>, axum::http::Error> {
    let url = format!(
        "{}://{}{}{}",
        request.scheme,
        host_string(request),
        request.path,
        request.query
    );

    let body = match &request.body {
        // An explicit empty body makes the transport emit Content-Length: 0
        // instead of leaving the framing ambiguous.
        ForwardBody::Empty => Body::from(String::new()),
        ForwardBody::Buffered(bytes) => Body::from(bytes.clone()),
    };

    let mut outbound = Request::builder()
        .method(request.method.clone())
        .uri(url)
        .body(body)?;

    // Remove-then-append so caller-supplied values win over anything the
    // body wrapper or transport would imply (Content-Type, Content-Length).
    let headers = outbound.headers_mut();
    for name in request.headers.keys() {
        headers.remove(name);
        for value in request.headers.get_all(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    Ok(outbound)
}
