//! Shared utilities for integration tests.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use feed_gateway::config::{Environment, GatewayConfig};
use feed_gateway::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const SECRET: &str = "integration-secret";

pub const RSS_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example Feed</title>
    <link>https://rsshub.app/example</link>
    <description>Integration fixture</description>
    <item>
      <title>First post</title>
      <link>https://rsshub.app/example/1</link>
      <guid>post-1</guid>
      <pubDate>Mon, 06 Jan 2025 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Second post</title>
      <link>https://rsshub.app/example/2</link>
      <guid>post-2</guid>
    </item>
  </channel>
</rss>"#;

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        403 => "403 Forbidden",
        404 => "404 Not Found",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Start a programmable upstream on an ephemeral port.
///
/// Returns the bound address and a counter of requests served.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> (SocketAddr, Arc<AtomicU32>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    serve_raw(move || {
        let response = f();
        async move {
            let (status, body) = response.await;
            (status_line(status).to_string(), body)
        }
    })
    .await
}

/// Start an upstream whose status line is sent verbatim, e.g. `"404 Feed Gone Away"`.
#[allow(dead_code)]
pub async fn start_upstream_with_status_line(
    line: &'static str,
    body: &'static str,
) -> (SocketAddr, Arc<AtomicU32>) {
    serve_raw(move || async move { (line.to_string(), body.to_string()) }).await
}

async fn serve_raw<F, Fut>(f: F) -> (SocketAddr, Arc<AtomicU32>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (String, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let f = Arc::new(f);

    let counter = hits.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let counter = counter.clone();
            tokio::spawn(async move {
                // Drain the request head; a single read is enough for a GET.
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                counter.fetch_add(1, Ordering::SeqCst);

                let (status_line, body) = f().await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/rss+xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });

    (addr, hits)
}

/// Start an upstream that always answers with `status` and `body`.
pub async fn start_upstream(status: u16, body: &'static str) -> (SocketAddr, Arc<AtomicU32>) {
    start_programmable_upstream(move || async move { (status, body.to_string()) }).await
}

/// Config for a production-mode gateway that may fetch from localhost.
pub fn test_config() -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.auth.secret = Some(SECRET.into());
    config.upstream.allowed_host = "127.0.0.1".into();
    config
}

#[allow(dead_code)]
pub fn development_config() -> GatewayConfig {
    let mut config = test_config();
    config.environment = Environment::Development;
    config
}

/// Run a gateway on an ephemeral port until the returned `Shutdown` fires.
pub async fn start_gateway(config: GatewayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// `http://<gateway>/api/parse` with `url` pointing at `upstream` + `path`.
#[allow(dead_code)]
pub fn parse_url(gateway: SocketAddr, upstream: SocketAddr, path: &str) -> String {
    format!("http://{gateway}/api/parse?url=http://{upstream}{path}")
}
