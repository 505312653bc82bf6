//! Server infrastructure tests.
//!
//! These tests start a real server, send raw TCP traffic, and assert on
//! observable behavior shared by every fixture.

use std::sync::Arc;

use canary::HelloService;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::{raw_request, start_server};

/// Sends headers declaring a 10 MB Content-Length; the server rejects based
/// on the header alone and returns 413 Payload Too Large.
#[tokio::test]
async fn server_rejects_oversized_body() {
    let server = start_server(Arc::new(HelloService)).await;
    let addr = server.addr();

    let response = raw_request(
        addr,
        b"POST /echo HTTP/1.1\r\nHost: localhost\r\nContent-Length: 10485760\r\nConnection: close\r\n\r\n",
    )
    .await;
    let response_str = String::from_utf8_lossy(&response);

    server.shutdown().await.unwrap();

    assert!(
        response_str.contains("413"),
        "Expected 413 Payload Too Large, got:\n{response_str}"
    );
}

/// Opening 200 connections results in at least one being refused or
/// receiving a 503.
#[tokio::test]
async fn server_rejects_excess_connections() {
    let server = start_server(Arc::new(HelloService)).await;
    let addr = server.addr();

    let mut streams = Vec::new();
    let mut refused = 0usize;

    for _ in 0..200 {
        match TcpStream::connect(addr).await {
            Ok(s) => streams.push(s),
            Err(_) => refused += 1,
        }
    }

    // Give the server a moment to accept and categorise all connections
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let mut service_unavailable = 0usize;
    for mut stream in streams {
        let req = b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n";
        if stream.write_all(req).await.is_ok() {
            let mut buf = vec![0u8; 4096];
            match tokio::time::timeout(std::time::Duration::from_secs(5), stream.read(&mut buf))
                .await
            {
                Ok(Ok(n)) if n > 0 => {
                    let resp = String::from_utf8_lossy(&buf[..n]);
                    if resp.contains("503") {
                        service_unavailable += 1;
                    }
                }
                _ => {}
            }
        }
    }

    server.shutdown().await.unwrap();

    assert!(
        refused + service_unavailable > 0,
        "Expected at least one connection refused or 503, but all 200 were accepted and served"
    );
}

/// A connection that stalls during header transmission is closed.
#[tokio::test]
async fn server_closes_slow_connections() {
    let server = start_server(Arc::new(HelloService)).await;
    let addr = server.addr();

    // Partial headers (no \r\n\r\n terminator)
    let mut stream = TcpStream::connect(addr).await.expect("failed to connect");
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n")
        .await
        .expect("failed to write partial request");

    tokio::time::sleep(std::time::Duration::from_secs(3)).await;

    let mut buf = vec![0u8; 4096];
    let result =
        tokio::time::timeout(std::time::Duration::from_secs(2), stream.read(&mut buf)).await;

    server.shutdown().await.unwrap();

    match result {
        Ok(Ok(0)) => {}
        Ok(Err(_)) => {}
        Ok(Ok(n)) => {
            let resp = String::from_utf8_lossy(&buf[..n]);
            assert!(
                resp.contains("408") || resp.contains("timeout"),
                "Expected connection close or 408, got:\n{resp}"
            );
        }
        Err(_) => {
            panic!("Server did not close the slow connection within 5 seconds");
        }
    }
}

/// Every response carries `X-Content-Type-Options: nosniff`.
#[tokio::test]
async fn server_returns_nosniff_header() {
    let server = start_server(Arc::new(HelloService)).await;
    let addr = server.addr();

    let response = raw_request(
        addr,
        b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    let response_str = String::from_utf8_lossy(&response);

    server.shutdown().await.unwrap();

    assert!(
        response_str
            .to_ascii_lowercase()
            .contains("x-content-type-options: nosniff"),
        "Expected X-Content-Type-Options header in response:\n{response_str}"
    );
}

/// The server speaks HTTP/2 when a client sends the connection preface.
#[tokio::test]
async fn server_speaks_http2() {
    let server = start_server(Arc::new(HelloService)).await;
    let addr = server.addr();

    // HTTP/2 connection preface followed by an empty SETTINGS frame
    let mut preface = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n".to_vec();
    preface.extend_from_slice(&[0, 0, 0, 0x04, 0x00, 0, 0, 0, 0]);

    let mut stream = TcpStream::connect(addr).await.expect("failed to connect");
    stream
        .write_all(&preface)
        .await
        .expect("failed to write h2 preface");

    let mut buf = vec![0u8; 256];
    let result =
        tokio::time::timeout(std::time::Duration::from_secs(2), stream.read(&mut buf)).await;

    server.shutdown().await.unwrap();

    match result {
        Ok(Ok(0)) | Ok(Err(_)) | Err(_) => {
            panic!("Server closed connection or timed out, HTTP/2 not supported");
        }
        Ok(Ok(n)) => {
            let data = &buf[..n];
            // A valid HTTP/2 response starts with a SETTINGS frame
            assert!(
                n >= 9 && data[3] == 0x04,
                "Expected HTTP/2 SETTINGS frame, got {} bytes: {:?}",
                n,
                &data[..n.min(32)]
            );
        }
    }
}

/// Shutdown stops the accept loop; new connections are refused afterwards.
#[tokio::test]
async fn shutdown_stops_accepting() {
    let server = start_server(Arc::new(HelloService)).await;
    let addr = server.addr();
    server.shutdown().await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(TcpStream::connect(addr).await.is_err());
}

/// Clients that connect and vanish do not take the accept loop down.
#[tokio::test]
async fn server_keeps_accepting_after_dropped_clients() {
    let server = start_server(Arc::new(HelloService)).await;
    let addr = server.addr();

    for _ in 0..50 {
        let stream = TcpStream::connect(addr).await.expect("failed to connect");
        drop(stream);
    }
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let response = raw_request(
        addr,
        b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    let response_str = String::from_utf8_lossy(&response);

    server.shutdown().await.unwrap();

    assert!(
        response_str.starts_with("HTTP/1.1 200"),
        "Expected the server to keep serving, got:\n{response_str}"
    );
}
