//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use relay_proxy::config::RelayConfig;
use relay_proxy::{RelayServer, Shutdown};

/// Start a programmable mock backend; the closure decides each response.
/// Returns the address the backend is listening on.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        // Drain the request head before answering.
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend that accepts connections and never answers.
/// Returns the address and a counter of accepted connections.
#[allow(dead_code)]
pub async fn start_silent_backend() -> (SocketAddr, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        // Hold the connection open without ever responding.
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, hits)
}

/// Start an axum backend that echoes the request body and the `x-trace`
/// header back to the caller.
#[allow(dead_code)]
pub async fn start_echo_backend() -> SocketAddr {
    use axum::body::Bytes;
    use axum::http::HeaderMap;
    use axum::response::IntoResponse;
    use axum::routing::any;
    use axum::Router;

    async fn echo(headers: HeaderMap, body: Bytes) -> impl IntoResponse {
        let mut response_headers = HeaderMap::new();
        if let Some(value) = headers.get("x-trace") {
            response_headers.insert("x-trace", value.clone());
        }
        (response_headers, body)
    }

    let app = Router::new()
        .route("/{*path}", any(echo))
        .route("/", any(echo));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Base relay config pointing at `backend`, tuned for fast tests.
#[allow(dead_code)]
pub fn relay_config(backend: SocketAddr) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.upstream.host = backend.ip().to_string();
    config.upstream.port = Some(backend.port());
    config.forward.base_delay_ms = 10;
    config.forward.max_delay_ms = 50;
    config.observability.metrics_enabled = false;
    config
}

/// Spawn the relay server on an ephemeral port.
/// Returns its address and the shutdown handle for teardown.
#[allow(dead_code)]
pub async fn start_relay(mut config: RelayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = RelayServer::new(config);

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Give the accept loop a moment to come up.
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, shutdown)
}

/// A client that never reuses pooled connections between tests.
#[allow(dead_code)]
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
