#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use freight_engine::config::HttpServerConfig;
use freight_engine::http::HttpServer;
use freight_executor::{Database, QueryError, Row};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// In-memory stand-in for the database: canned rows per statement, or a
/// forced driver failure while `failing` is set.
#[derive(Default)]
pub struct MockDatabase {
    rows: Mutex<HashMap<String, Vec<Row>>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, sql: &str, rows: Vec<Row>) -> Self {
        if let Ok(mut guard) = self.rows.lock() {
            guard.insert(sql.to_string(), rows);
        }
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Database for MockDatabase {
    async fn fetch_all(&self, sql: &str) -> Result<Vec<Row>, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(QueryError::Driver(sqlx::Error::Protocol(
                "Lost connection to MySQL server during query".to_string(),
            )));
        }
        let guard = self.rows.lock().expect("mock rows lock");
        Ok(guard.get(sql).cloned().unwrap_or_default())
    }
}

pub fn row(pairs: &[(&str, Value)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Serves `router` on an ephemeral local port.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let server = HttpServer::new(
        router,
        HttpServerConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
        },
    );
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });
    addr
}

pub struct Reply {
    pub status: u16,
    pub head: String,
    pub body: String,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("json body")
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim()
                .eq_ignore_ascii_case(name)
                .then(|| v.trim().to_string())
        })
    }
}

/// Plain HTTP/1.1 GET with `Connection: close`, read to EOF.
pub async fn get(addr: SocketAddr, path: &str) -> Reply {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, addr
    );
    stream.write_all(request.as_bytes()).await.expect("write");
    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.expect("read");
    let text = String::from_utf8(raw).expect("utf8 response");
    let (head, body) = text.split_once("\r\n\r\n").expect("header terminator");
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status code");
    Reply {
        status,
        head: head.to_string(),
        body: body.to_string(),
    }
}
