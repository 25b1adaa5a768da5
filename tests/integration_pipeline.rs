//! Integration tests for the frame-serving pipeline
//!
//! Tests the complete request lifecycle through the public API including:
//! - Live frame delivery and the placeholder fallback
//! - Cache-busting query handling
//! - Concurrent request handling
//! - Deactivation while a capture read is in flight
//! - Shutdown ordering and idempotence
//! - End-to-end serving over a real TCP socket

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use bytes::Bytes;
use http_body_util::BodyExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tower::ServiceExt;

use framegrab_rs::{
    create_router, grab_frame, CaptureSource, Dispatcher, Frame, FrameServer, Liveness,
    PipelineContext, ServerConfig, SharedSource, TestPatternSource, FRAME_PATH, MEDIA_TYPE_JPEG,
    MEDIA_TYPE_PNG, PLACEHOLDER_PNG,
};

/// Capture fake whose reads take a configurable amount of wall time.
struct SlowSource {
    reads: Arc<AtomicU64>,
    delay: Duration,
}

impl CaptureSource for SlowSource {
    fn is_opened(&self) -> bool {
        true
    }

    fn read(&mut self) -> Option<Frame> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        Some(Frame::black(64, 48))
    }

    fn release(&mut self) {}
}

/// Capture fake that counts how many times it was released.
struct TrackedSource {
    opened: bool,
    releases: Arc<AtomicU64>,
}

impl CaptureSource for TrackedSource {
    fn is_opened(&self) -> bool {
        self.opened
    }

    fn read(&mut self) -> Option<Frame> {
        Some(Frame::black(8, 8))
    }

    fn release(&mut self) {
        self.opened = false;
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

fn pattern_context(active: bool) -> Arc<PipelineContext> {
    let source = SharedSource::new(Box::new(TestPatternSource::new(64, 48)));
    let dispatcher = Dispatcher::new(2, 8, Duration::from_millis(500)).unwrap();
    Arc::new(PipelineContext::new(
        source,
        dispatcher,
        Liveness::new(active),
        85,
    ))
}

async fn fetch(router: axum::Router, uri: &str) -> (StatusCode, String, Bytes) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, body)
}

#[tokio::test]
async fn test_live_request_returns_current_jpeg() {
    let ctx = pattern_context(true);
    let app = create_router(ctx.clone());

    let (status, content_type, body) = fetch(app, FRAME_PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, MEDIA_TYPE_JPEG);

    let decoded = image::load_from_memory(&body).expect("live response should be a decodable JPEG");
    assert_eq!(decoded.width(), 64);
    assert_eq!(decoded.height(), 48);

    let stats = ctx.stats.snapshot();
    assert_eq!(stats.requests, 1);
    assert_eq!(stats.live_frames, 1);
    assert_eq!(stats.placeholders, 0);
}

#[tokio::test]
async fn test_inactive_pipeline_serves_placeholder_without_device_work() {
    let ctx = pattern_context(false);
    let app = create_router(ctx.clone());

    let (status, content_type, body) = fetch(app, FRAME_PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, MEDIA_TYPE_PNG);
    assert_eq!(
        body.as_ref(),
        PLACEHOLDER_PNG,
        "inactive responses should be the exact placeholder bytes"
    );

    let stats = ctx.stats.snapshot();
    assert_eq!(stats.placeholders, 1);
    assert_eq!(stats.capture_reads, 0, "no device read should be scheduled");
    assert_eq!(stats.encode_jobs, 0, "no encode should be scheduled");
}

#[tokio::test]
async fn test_cache_busting_query_is_ignored() {
    let ctx = pattern_context(true);
    let app = create_router(ctx);

    let uris = [
        FRAME_PATH.to_string(),
        format!("{}?1699999999.123", FRAME_PATH),
        format!("{}?t=42&nocache=1", FRAME_PATH),
    ];

    for uri in &uris {
        let (status, content_type, body) = fetch_clone(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "query '{}' should be accepted", uri);
        assert_eq!(content_type, MEDIA_TYPE_JPEG);

        let decoded = image::load_from_memory(&body).expect("response should decode");
        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 48);
    }
}

async fn fetch_clone(router: &axum::Router, uri: &str) -> (StatusCode, String, Bytes) {
    fetch(router.clone(), uri).await
}

#[tokio::test]
async fn test_concurrent_requests_all_complete() {
    let ctx = pattern_context(true);
    let app = create_router(ctx.clone());

    let mut tasks = Vec::new();
    for _ in 0..12 {
        let app = app.clone();
        tasks.push(tokio::spawn(async move { fetch(app, FRAME_PATH).await }));
    }

    for task in tasks {
        let (status, content_type, body) = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("request should not hang")
            .unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, MEDIA_TYPE_JPEG);
        image::load_from_memory(&body).expect("every concurrent response should decode");
    }

    assert_eq!(ctx.stats.snapshot().requests, 12);
}

#[tokio::test]
async fn test_deactivation_short_circuits_inflight_encode() {
    let reads = Arc::new(AtomicU64::new(0));
    let source = SharedSource::new(Box::new(SlowSource {
        reads: reads.clone(),
        delay: Duration::from_millis(80),
    }));
    let dispatcher = Dispatcher::new(1, 4, Duration::from_millis(500)).unwrap();
    let ctx = Arc::new(PipelineContext::new(
        source,
        dispatcher,
        Liveness::new(true),
        85,
    ));

    // First request starts its slow device read.
    let first_ctx = ctx.clone();
    let first = tokio::spawn(async move { grab_frame(&first_ctx).await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Serving goes inactive while that read is still in flight.
    ctx.liveness.set(false);

    // A new request resolves immediately; it never waits on the device.
    let started = Instant::now();
    let second = grab_frame(&ctx).await;
    assert!(
        started.elapsed() < Duration::from_millis(50),
        "inactive request should not queue behind the in-flight read"
    );
    assert_eq!(second.media_type, MEDIA_TYPE_PNG);

    // The first request's encode is skipped on the worker thread.
    let first = first.await.unwrap();
    assert_eq!(first.media_type, MEDIA_TYPE_PNG);
    assert_eq!(first.data.as_ref(), PLACEHOLDER_PNG);

    let stats = ctx.stats.snapshot();
    assert_eq!(reads.load(Ordering::SeqCst), 1);
    assert_eq!(stats.capture_reads, 1);
    assert_eq!(stats.encode_jobs, 1);
    assert_eq!(stats.encode_skips, 1);
    assert_eq!(stats.live_frames, 0);
    assert_eq!(stats.placeholders, 2);
}

#[tokio::test]
async fn test_shutdown_sequence_is_idempotent() {
    let releases = Arc::new(AtomicU64::new(0));
    let server = FrameServer::new(
        ServerConfig::with_addr("127.0.0.1:0".parse().unwrap()),
        Box::new(TrackedSource {
            opened: true,
            releases: releases.clone(),
        }),
    )
    .unwrap();

    let handle = server.shutdown_handle();
    handle.terminate().await;
    handle.terminate().await;

    assert_eq!(
        releases.load(Ordering::SeqCst),
        1,
        "repeat terminations must not release the device again"
    );
    assert!(handle.is_terminated());
    assert!(!server.context().liveness.is_active());
    assert!(server.context().dispatcher.is_closed());

    // Requests arriving after shutdown degrade to the placeholder.
    let image = grab_frame(&server.context()).await;
    assert_eq!(image.media_type, MEDIA_TYPE_PNG);
    assert_eq!(image.data.as_ref(), PLACEHOLDER_PNG);
}

#[tokio::test]
async fn test_serves_over_tcp_until_stopped() {
    // Reserve a free port, then hand it to the server.
    let reserved = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = reserved.local_addr().unwrap();
    drop(reserved);

    let config = ServerConfig::with_addr(addr).shutdown_grace(Duration::from_millis(500));
    let server = FrameServer::new(config, Box::new(TestPatternSource::new(64, 48))).unwrap();
    let handle = server.shutdown_handle();

    let running = tokio::spawn(async move { server.run_until(std::future::pending::<()>()).await });

    let mut stream = None;
    for _ in 0..50 {
        match TcpStream::connect(addr).await {
            Ok(s) => {
                stream = Some(s);
                break;
            }
            Err(_) => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    let mut stream = stream.expect("server should start accepting connections");

    let request = format!(
        "GET {}?t=123 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        FRAME_PATH
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();

    let header_end = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response should have a header block");
    let head = String::from_utf8_lossy(&response[..header_end]).to_lowercase();
    let body = &response[header_end + 4..];

    assert!(head.starts_with("http/1.1 200"), "head was: {}", head);
    assert!(head.contains("content-type: image/jpeg"));
    assert_eq!(&body[..2], &[0xFF, 0xD8], "body should start with the JPEG SOI marker");

    handle.terminate().await;
    let result = tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("server should stop after termination")
        .unwrap();
    assert!(result.is_ok());
}
