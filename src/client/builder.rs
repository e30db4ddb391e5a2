use crate::client::core::{ClientConfig, OpencodeClient};
use crate::client::options::{header_pair, parse_base_url, validate_max_retries, validate_timeout};
use crate::transport::{default_http_client, HttpTransport};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating clients with custom configuration.
///
/// Anything not set explicitly falls back to the environment, read once in [`build`]:
///
/// - `OPENCODE_BASE_URL` (default `http://localhost:54321`)
/// - `OPENCODE_TIMEOUT_SECS` (default 60)
/// - `OPENCODE_MAX_RETRIES` (default 2, at most 10)
///
/// [`build`]: OpencodeClientBuilder::build
#[derive(Default)]
pub struct OpencodeClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    transport: Option<Arc<dyn HttpTransport>>,
    headers: Vec<(String, String)>,
}

impl OpencodeClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Per-attempt timeout for ordinary calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = Some(n);
        self
    }

    /// Replace the HTTP transport, e.g. with a recording fake in tests.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a preconfigured `reqwest::Client`.
    pub fn http_client(self, client: reqwest::Client) -> Self {
        self.transport(Arc::new(client))
    }

    /// Header sent on every request. A `User-Agent` here replaces the default one.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<OpencodeClient> {
        let base_url = match self.base_url.or_else(|| env_string("OPENCODE_BASE_URL")) {
            Some(raw) => parse_base_url(&raw).map_err(into_configuration)?,
            None => parse_base_url(ClientConfig::DEFAULT_BASE_URL).map_err(into_configuration)?,
        };

        let mut config = ClientConfig::new(base_url);

        let timeout = self.timeout.or_else(|| {
            env_string("OPENCODE_TIMEOUT_SECS")
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .map(Duration::from_secs_f64)
        });
        if let Some(timeout) = timeout {
            config.timeout = validate_timeout(timeout, "timeout").map_err(into_configuration)?;
        }

        let max_retries = self.max_retries.or_else(|| {
            env_string("OPENCODE_MAX_RETRIES").and_then(|s| s.parse::<u32>().ok())
        });
        if let Some(n) = max_retries {
            config.max_retries = validate_max_retries(n, "max_retries").map_err(into_configuration)?;
        }

        for (name, value) in &self.headers {
            let (name, value) = header_pair(name, value).map_err(into_configuration)?;
            config.headers.insert(name, value);
        }

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(default_http_client()?),
        };

        Ok(OpencodeClient {
            config: Arc::new(config),
            transport,
        })
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// Builder-time problems are configuration errors, not per-call validation errors.
fn into_configuration(err: Error) -> Error {
    match err {
        Error::Validation { message, context } => Error::Configuration {
            message,
            context: ErrorContext {
                source: Some("client_builder".into()),
                ..context
            },
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::USER_AGENT;

    #[test]
    fn explicit_settings_win() {
        let client = OpencodeClientBuilder::new()
            .base_url("https://example.test/api/")
            .timeout(Duration::from_secs(5))
            .max_retries(7)
            .default_header("user-agent", "custom/1")
            .build()
            .unwrap();
        let cfg = client.config();
        assert_eq!(cfg.base_url.as_str(), "https://example.test/api/");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.max_retries, 7);
        assert_eq!(cfg.headers.get(USER_AGENT).unwrap(), "custom/1");
    }

    #[test]
    fn invalid_settings_are_configuration_errors() {
        let bad = [
            OpencodeClientBuilder::new().base_url("file:///tmp"),
            OpencodeClientBuilder::new().base_url("http://h").timeout(Duration::ZERO),
            OpencodeClientBuilder::new().base_url("http://h").max_retries(11),
        ];
        for builder in bad {
            let err = builder.build().unwrap_err();
            assert!(matches!(err, Error::Configuration { .. }), "{}", err);
            assert_eq!(err.context().and_then(|c| c.source.as_deref()), Some("client_builder"));
        }
    }

    #[test]
    fn default_user_agent_is_versioned() {
        let client = OpencodeClientBuilder::new().base_url("http://h").build().unwrap();
        let ua = client.config().headers.get(USER_AGENT).unwrap().to_str().unwrap();
        assert!(ua.starts_with("opencode-sdk-rust/"));
    }
}
