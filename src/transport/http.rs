use async_trait::async_trait;
use reqwest::Proxy;
use std::env;
use std::time::Duration;

/// Sends one fully built request.
///
/// Implementations must not retry on their own; retry policy lives in the executor.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, TransportError>;
}

#[async_trait]
impl HttpTransport for reqwest::Client {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, TransportError> {
        self.execute(request).await.map_err(TransportError::Http)
    }
}

/// Builds the default connection-pooled client.
///
/// No client-wide timeout is set: per-attempt timeouts are applied on each request so that
/// long-lived event streams are not cut off.
pub fn default_http_client() -> Result<reqwest::Client, TransportError> {
    let mut builder = reqwest::Client::builder()
        .pool_max_idle_per_host(
            env::var("OPENCODE_HTTP_POOL_MAX_IDLE_PER_HOST")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(32),
        )
        .pool_idle_timeout(Some(Duration::from_secs(
            env::var("OPENCODE_HTTP_POOL_IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(90),
        )))
        .connect_timeout(Duration::from_secs(10));

    if let Ok(proxy_url) = env::var("OPENCODE_PROXY_URL") {
        if let Ok(proxy) = Proxy::all(&proxy_url) {
            builder = builder.proxy(proxy);
        }
    }

    builder
        .build()
        .map_err(|e| TransportError::Other(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Connection failures and per-attempt timeouts are worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Http(e) => e.is_connect() || e.is_timeout(),
            TransportError::Timeout(_) => true,
            TransportError::Other(_) => false,
        }
    }
}
