//! Failure injection tests for the relay's retry and timeout policy.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

mod common;

#[tokio::test]
async fn test_all_server_errors_exhaust_attempts() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let backend = common::start_programmable_backend(move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (503, "Service Unavailable".to_string())
        }
    })
    .await;

    let mut config = common::relay_config(backend);
    config.forward.attempts = 3;
    let (relay, shutdown) = common::start_relay(config).await;

    let client = common::test_client();
    let res = client
        .get(format!("http://{}", relay))
        .send()
        .await
        .expect("Relay unreachable");

    assert_eq!(res.status(), 502);
    assert_eq!(
        call_count.load(Ordering::SeqCst),
        3,
        "Every configured attempt should have been used"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_client_error_stops_retries_immediately() {
    let call_count = Arc::new(AtomicU32::new(0));
    let cc = call_count.clone();
    let backend = common::start_programmable_backend(move || {
        let cc = cc.clone();
        async move {
            cc.fetch_add(1, Ordering::SeqCst);
            (404, "Not Found".to_string())
        }
    })
    .await;

    let mut config = common::relay_config(backend);
    config.forward.attempts = 3;
    let (relay, shutdown) = common::start_relay(config).await;

    let client = common::test_client();
    let res = client
        .get(format!("http://{}", relay))
        .send()
        .await
        .expect("Relay unreachable");

    // The upstream 404 is surfaced as a relay failure, not passed through.
    assert_eq!(res.status(), 502);
    assert_eq!(res.text().await.unwrap(), "Upstream request failed");
    assert_eq!(
        call_count.load(Ordering::SeqCst),
        1,
        "Client errors must not be retried"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_timeout_is_retried_then_surfaces_gateway_timeout() {
    let (backend, hits) = common::start_silent_backend().await;

    let mut config = common::relay_config(backend);
    config.forward.attempts = 2;
    config.forward.timeout_secs = 1;
    config.forward.base_delay_ms = 0;
    let (relay, shutdown) = common::start_relay(config).await;

    let client = common::test_client();
    let start = Instant::now();
    let res = client
        .get(format!("http://{}", relay))
        .send()
        .await
        .expect("Relay unreachable");

    assert_eq!(res.status(), 504);
    assert_eq!(
        hits.load(Ordering::SeqCst),
        2,
        "Each attempt should have opened its own connection"
    );
    assert!(
        start.elapsed() >= Duration::from_secs(2),
        "Both attempts should have run their full deadline"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_connection_refused_surfaces_bad_gateway() {
    // Bind and immediately drop a listener to get a port nothing serves.
    let unused: SocketAddr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let mut config = common::relay_config(unused);
    config.forward.attempts = 2;
    config.forward.base_delay_ms = 0;
    let (relay, shutdown) = common::start_relay(config).await;

    let client = common::test_client();
    let res = client
        .get(format!("http://{}", relay))
        .send()
        .await
        .expect("Relay unreachable");

    assert_eq!(res.status(), 502);

    shutdown.trigger();
}
