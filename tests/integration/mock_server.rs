//! Mock HTTP server and scripted transport for integration tests

use async_trait::async_trait;
use mockito::{Mock, Server, ServerGuard};
use opencode_sdk::transport::{HttpTransport, TransportError};
use opencode_sdk::{OpencodeClient, OpencodeClientBuilder};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// Client pointed at the mock server.
    pub fn client(&self, max_retries: u32) -> OpencodeClient {
        OpencodeClientBuilder::new()
            .base_url(&self.base_url)
            .max_retries(max_retries)
            .build()
            .expect("client")
    }

    /// JSON response expected exactly `hits` times.
    pub async fn mock_json(&self, method: &str, path: &str, status: usize, body: &str, hits: usize) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock(method, path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Server-sent-event response built from complete frames.
    pub async fn mock_sse(&self, path: &str, frames: &[&str]) -> Mock {
        let body: String = frames.iter().map(|f| format!("{}\n\n", f)).collect();
        let mut server = self.server.lock().await;
        server
            .mock("GET", path)
            .match_header("accept", "text/event-stream")
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await
    }

    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, ServerGuard> {
        self.server.lock().await
    }
}

/// A request as seen by [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: url::Url,
    pub headers: reqwest::header::HeaderMap,
    pub body: Option<String>,
}

/// Transport that answers from a script and records what it was sent.
///
/// Once the script runs out the last response is repeated.
#[derive(Default)]
pub struct ScriptedTransport {
    script: std::sync::Mutex<VecDeque<(u16, Vec<(&'static str, &'static str)>, String)>>,
    last: std::sync::Mutex<Option<(u16, Vec<(&'static str, &'static str)>, String)>>,
    seen: std::sync::Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(self: &Arc<Self>, status: u16, body: &str) -> Arc<Self> {
        self.respond_with(status, &[], body)
    }

    pub fn respond_with(self: &Arc<Self>, status: u16, headers: &[(&'static str, &'static str)], body: &str) -> Arc<Self> {
        self.script
            .lock()
            .unwrap()
            .push_back((status, headers.to_vec(), body.to_string()));
        Arc::clone(self)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.seen.lock().unwrap().clone()
    }

    pub fn client(self: &Arc<Self>, base_url: &str, max_retries: u32) -> OpencodeClient {
        OpencodeClientBuilder::new()
            .base_url(base_url)
            .max_retries(max_retries)
            .transport(Arc::clone(self) as Arc<dyn HttpTransport>)
            .build()
            .expect("client")
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, TransportError> {
        let body = request
            .body()
            .and_then(|b| b.as_bytes())
            .map(|b| String::from_utf8_lossy(b).into_owned());
        self.seen.lock().unwrap().push(Recorded {
            method: request.method().to_string(),
            url: request.url().clone(),
            headers: request.headers().clone(),
            body,
        });

        let next = {
            let mut script = self.script.lock().unwrap();
            let mut last = self.last.lock().unwrap();
            if let Some(step) = script.pop_front() {
                *last = Some(step.clone());
            }
            last.clone()
        };
        let (status, headers, body) =
            next.ok_or_else(|| TransportError::Other("script is empty".into()))?;

        let mut builder = http::Response::builder().status(status);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        let response = builder
            .body(body)
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(reqwest::Response::from(response))
    }
}
