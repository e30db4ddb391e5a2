//! Per-call request options.
//!
//! Options are applied in order on top of the client configuration; a later option
//! overrides an earlier one. Invalid options are reported before anything is sent.

use crate::client::core::ClientConfig;
use crate::client::policy::RetryPolicy;
use crate::client::request::QueryOp;
use crate::transport::HttpTransport;
use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// One per-call override.
#[derive(Clone)]
pub enum RequestOption {
    BaseUrl(String),
    /// Sends this call through another transport.
    Transport(Arc<dyn HttpTransport>),
    /// Sets a header, replacing every existing value (including `User-Agent`).
    Header(String, String),
    /// Appends a header value. `User-Agent` is single-valued and is replaced instead.
    HeaderAdd(String, String),
    HeaderDel(String),
    /// Sets a query parameter, replacing every existing value.
    Query(String, String),
    QueryAdd(String, String),
    QueryDel(String),
    /// Per-attempt timeout. Also enables a timeout on streams.
    Timeout(Duration),
    /// Retries after the first attempt, 0 to 10.
    MaxRetries(u32),
}

impl RequestOption {
    pub fn base_url(url: impl Into<String>) -> Self {
        Self::BaseUrl(url.into())
    }

    pub fn transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self::Transport(transport)
    }

    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Header(name.into(), value.into())
    }

    pub fn header_add(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::HeaderAdd(name.into(), value.into())
    }

    pub fn header_del(name: impl Into<String>) -> Self {
        Self::HeaderDel(name.into())
    }

    pub fn query(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Query(key.into(), value.into())
    }

    pub fn query_add(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::QueryAdd(key.into(), value.into())
    }

    pub fn query_del(key: impl Into<String>) -> Self {
        Self::QueryDel(key.into())
    }

    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout(timeout)
    }

    pub fn max_retries(n: u32) -> Self {
        Self::MaxRetries(n)
    }
}

impl fmt::Debug for RequestOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BaseUrl(u) => f.debug_tuple("BaseUrl").field(u).finish(),
            Self::Transport(_) => f.write_str("Transport(..)"),
            Self::Header(k, v) => f.debug_tuple("Header").field(k).field(v).finish(),
            Self::HeaderAdd(k, v) => f.debug_tuple("HeaderAdd").field(k).field(v).finish(),
            Self::HeaderDel(k) => f.debug_tuple("HeaderDel").field(k).finish(),
            Self::Query(k, v) => f.debug_tuple("Query").field(k).field(v).finish(),
            Self::QueryAdd(k, v) => f.debug_tuple("QueryAdd").field(k).field(v).finish(),
            Self::QueryDel(k) => f.debug_tuple("QueryDel").field(k).finish(),
            Self::Timeout(d) => f.debug_tuple("Timeout").field(d).finish(),
            Self::MaxRetries(n) => f.debug_tuple("MaxRetries").field(n).finish(),
        }
    }
}

/// Client configuration with every option of one call folded in.
pub(crate) struct ResolvedOptions {
    pub base_url: Url,
    pub transport: Arc<dyn HttpTransport>,
    pub headers: HeaderMap,
    pub query: Vec<QueryOp>,
    /// `None` only for streams without an explicit timeout.
    pub timeout: Option<Duration>,
    pub max_retries: u32,
}

impl ResolvedOptions {
    pub fn resolve(
        config: &ClientConfig,
        transport: &Arc<dyn HttpTransport>,
        options: &[RequestOption],
        streaming: bool,
    ) -> Result<Self> {
        let mut resolved = Self {
            base_url: config.base_url.clone(),
            transport: transport.clone(),
            headers: config.headers.clone(),
            query: Vec::new(),
            timeout: if streaming { None } else { Some(config.timeout) },
            max_retries: config.max_retries,
        };

        for option in options {
            match option {
                RequestOption::BaseUrl(raw) => resolved.base_url = parse_base_url(raw)?,
                RequestOption::Transport(t) => resolved.transport = t.clone(),
                RequestOption::Header(k, v) => {
                    let (name, value) = header_pair(k, v)?;
                    resolved.headers.insert(name, value);
                }
                RequestOption::HeaderAdd(k, v) => {
                    let (name, value) = header_pair(k, v)?;
                    // single-valued: an added agent replaces the default one
                    if name == USER_AGENT {
                        resolved.headers.insert(name, value);
                    } else {
                        resolved.headers.append(name, value);
                    }
                }
                RequestOption::HeaderDel(k) => {
                    resolved.headers.remove(header_name(k)?);
                }
                RequestOption::Query(k, v) => resolved.query.push(QueryOp::Set(k.clone(), v.clone())),
                RequestOption::QueryAdd(k, v) => resolved.query.push(QueryOp::Add(k.clone(), v.clone())),
                RequestOption::QueryDel(k) => resolved.query.push(QueryOp::Del(k.clone())),
                RequestOption::Timeout(d) => resolved.timeout = Some(validate_timeout(*d, "options.timeout")?),
                RequestOption::MaxRetries(n) => {
                    resolved.max_retries = validate_max_retries(*n, "options.max_retries")?
                }
            }
        }
        Ok(resolved)
    }

    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries)
    }
}

/// Parses a base URL; only `http` and `https` are accepted.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| {
        Error::validation_with_context(
            format!("invalid base URL: {}", e),
            ErrorContext::new().with_field_path("base_url").with_details(raw.to_string()),
        )
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::validation_with_context(
            format!("unsupported base URL scheme `{}`", url.scheme()),
            ErrorContext::new()
                .with_field_path("base_url")
                .with_details("expected http or https"),
        ));
    }
    Ok(url)
}

pub(crate) fn validate_timeout(timeout: Duration, field: &str) -> Result<Duration> {
    if timeout.is_zero() {
        return Err(Error::validation_with_context(
            "timeout must be positive",
            ErrorContext::new().with_field_path(field.to_string()),
        ));
    }
    Ok(timeout)
}

pub(crate) fn validate_max_retries(n: u32, field: &str) -> Result<u32> {
    if n > RetryPolicy::MAX_RETRIES_LIMIT {
        return Err(Error::validation_with_context(
            format!("max retries must be at most {}", RetryPolicy::MAX_RETRIES_LIMIT),
            ErrorContext::new()
                .with_field_path(field.to_string())
                .with_details(format!("got {}", n)),
        ));
    }
    Ok(n)
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
        Error::validation_with_context(
            "invalid header name",
            ErrorContext::new().with_field_path(format!("headers.{}", name)),
        )
    })
}

pub(crate) fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let value = HeaderValue::from_str(value).map_err(|_| {
        Error::validation_with_context(
            "invalid header value",
            ErrorContext::new().with_field_path(format!("headers.{}", name)),
        )
    })?;
    Ok((header_name(name)?, value))
}
