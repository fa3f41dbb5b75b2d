//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use expense_tracker_api::config::{ApiConfig, AuthProvider};
use expense_tracker_api::lifecycle::{self, Shutdown};

pub const TOKEN_U1: &str = "token-u1";
pub const TOKEN_U2: &str = "token-u2";

/// A running API server on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config with static tokens for users `u1` and `u2`.
pub fn test_config() -> ApiConfig {
    let mut config = ApiConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.database.url = "sqlite::memory:".into();
    config.auth.provider = AuthProvider::Static;
    config
        .auth
        .static_tokens
        .insert(TOKEN_U1.into(), "u1".into());
    config
        .auth
        .static_tokens
        .insert(TOKEN_U2.into(), "u2".into());
    config
}

/// Same tokens, backed by a SQLite file in `dir` with a multi-connection pool.
#[allow(dead_code)]
pub fn file_backed_config(dir: &Path) -> ApiConfig {
    let mut config = test_config();
    config.database.url = format!("sqlite://{}", dir.join("tracker.db").display());
    config.database.max_connections = 4;
    config
}

pub async fn start_server() -> TestServer {
    start_server_with(test_config()).await
}

pub async fn start_server_with(config: ApiConfig) -> TestServer {
    let server = lifecycle::bootstrap(config).await.unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    TestServer {
        addr,
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
        shutdown,
    }
}

/// Send a request head and the start of a JSON body, then leave it unfinished.
#[allow(dead_code)]
pub async fn send_stalled_request(addr: SocketAddr, method: &str, path: &str, token: &str) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let head = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nAuthorization: Bearer {token}\r\n\
         Content-Type: application/json\r\nContent-Length: 256\r\n\r\n{{\"UID\""
    );
    stream.write_all(head.as_bytes()).await.unwrap();
    stream.flush().await.unwrap();
    stream
}

/// Read from `stream` until `needle` shows up or `limit` passes.
#[allow(dead_code)]
pub async fn read_until(stream: &mut TcpStream, needle: &str, limit: Duration) -> String {
    let mut received = Vec::new();
    let mut buf = [0u8; 1024];
    let _ = tokio::time::timeout(limit, async {
        loop {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    received.extend_from_slice(&buf[..n]);
                    if String::from_utf8_lossy(&received).contains(needle) {
                        break;
                    }
                }
            }
        }
    })
    .await;
    String::from_utf8_lossy(&received).into_owned()
}
