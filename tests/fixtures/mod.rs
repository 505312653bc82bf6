//! Shared harness for the fixture suite.

mod error_disclosure;
mod server;
mod sync;

use std::net::SocketAddr;
use std::sync::Arc;

use canary::config::{Config, Server as ServerConfig};
use canary::server::{self as http, Server};
use canary::service::Service;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Start `service` on a random local port with default config.
pub async fn start_server(service: Arc<dyn Service>) -> Server {
    start_server_with_config(service, Config::default()).await
}

/// Start `service` on a random local port, keeping everything but the
/// listen address from `config`.
pub async fn start_server_with_config(
    service: Arc<dyn Service>,
    config: Config,
) -> Server {
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        ..config
    };

    http::start(config, service)
        .await
        .expect("failed to start test server")
}

/// Send a raw HTTP/1.1 request with `Connection: close` and read the full response.
pub async fn raw_request(addr: SocketAddr, payload: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.expect("failed to connect");
    stream.write_all(payload).await.expect("failed to write");

    let mut buf = Vec::new();
    let _ = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        stream.read_to_end(&mut buf),
    )
    .await;
    buf
}

/// Build a request with a form body and the right `Content-Length`.
pub fn form_request(method: &str, target: &str, body: &str) -> Vec<u8> {
    format!(
        "{method} {target} HTTP/1.1\r\nHost: fixture.test\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .into_bytes()
}

/// Split a raw response into (head, body).
pub fn split_response(raw: &[u8]) -> (String, String) {
    let text = String::from_utf8_lossy(raw).into_owned();
    match text.split_once("\r\n\r\n") {
        Some((head, body)) => (head.to_string(), body.to_string()),
        None => (text, String::new()),
    }
}
