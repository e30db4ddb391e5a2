//! 请求执行逻辑：重试、状态分类与响应解码。
//!
//! Request execution: attempts, retry loop, error mapping and body decoding.

use crate::client::context::RequestContext;
use crate::client::core::OpencodeClient;
use crate::client::options::{RequestOption, ResolvedOptions};
use crate::client::policy::{header_first, Decision, Outcome};
use crate::client::request::ApiRequest;
use crate::client::stream::SseStream;
use crate::error::{message_from_body, ApiError};
use crate::pipeline::{decode_events, SseDecoder};
use crate::transport::TransportError;
use crate::{Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

const JSON: &str = "application/json";
const EVENT_STREAM: &str = "text/event-stream";
const REQUEST_ID_HEADERS: &[&str] = &["x-request-id", "request-id"];

/// A fully read response.
struct Received {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl OpencodeClient {
    /// Executes `request` with retries and decodes a 2xx body into `T`.
    ///
    /// An empty body decodes as JSON `null`, so `T = ()` or `Option<_>` suits endpoints
    /// that answer with nothing.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        request: ApiRequest,
        options: &[RequestOption],
    ) -> Result<T> {
        let resolved = ResolvedOptions::resolve(&self.config, &self.transport, options, false)?;
        let url = request.url(&resolved.base_url, &resolved.query)?;
        let policy = resolved.policy();
        let method = request.method().clone();
        let start = Instant::now();

        let mut attempt: u32 = 0;
        loop {
            ctx.check()?;
            debug!(method = %method, url = %url, attempt, "sending request");

            let sent = ctx.run(self.attempt(&resolved, &request, &url)).await?;
            let failure = match sent {
                Ok(received) if received.status.is_success() => {
                    return decode_body(&method, &url, &received.body);
                }
                Ok(received) => Failure::Status(received),
                Err(e) => Failure::Transport(e),
            };

            let outcome = match &failure {
                Failure::Status(r) => Outcome::Status {
                    status: r.status.as_u16(),
                    headers: &r.headers,
                },
                Failure::Transport(e) => Outcome::Transport(e),
            };

            match policy.decide(outcome, attempt) {
                Decision::Retry { delay } => {
                    warn!(
                        method = %method,
                        url = %url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        reason = %failure.reason(),
                        "retrying request"
                    );
                    ctx.sleep(delay).await?;
                    attempt += 1;
                }
                Decision::Fail => {
                    let err = failure.into_error(&method, &url);
                    info!(
                        http_status = err.status().unwrap_or(0),
                        error_class = err.class().map(|c| c.name()).unwrap_or("transport"),
                        request_id = err.as_api().and_then(|e| e.request_id.as_deref()).unwrap_or(""),
                        endpoint = url.path(),
                        retry_count = attempt,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "opencode request failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Opens a server-sent-event stream. Single attempt, no retry.
    ///
    /// Failures (invalid options, transport errors, non-2xx statuses) are not returned
    /// directly: the stream comes back already terminated and [`SseStream::err`] holds the
    /// cause. A non-2xx body is read before returning.
    pub async fn execute_stream<T>(
        &self,
        ctx: &RequestContext,
        request: ApiRequest,
        options: &[RequestOption],
    ) -> SseStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        match self.open_stream(ctx, request, options).await {
            Ok(stream) => stream,
            Err(err) => SseStream::failed(err, ctx.clone()),
        }
    }

    async fn open_stream<T>(
        &self,
        ctx: &RequestContext,
        request: ApiRequest,
        options: &[RequestOption],
    ) -> Result<SseStream<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let resolved = ResolvedOptions::resolve(&self.config, &self.transport, options, true)?;
        let url = request.url(&resolved.base_url, &resolved.query)?;
        let method = request.method().clone();
        let start = Instant::now();
        debug!(method = %method, url = %url, "opening event stream");

        let http_request = build_request(&resolved, &request, &url, EVENT_STREAM);
        let send = async {
            let pending = resolved.transport.send(http_request);
            let sent = match resolved.timeout {
                Some(limit) => tokio::time::timeout(limit, pending)
                    .await
                    .unwrap_or(Err(TransportError::Timeout(limit))),
                None => pending.await,
            };
            sent.map_err(Error::from)
        };
        let resp = ctx.run(send).await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let headers = resp.headers().clone();
            let body = ctx
                .run(async { resp.bytes().await.map_err(|e| Error::from(TransportError::Http(e))) })
                .await?;
            let err = Error::Api(api_error(&method, &url, status, &headers, &body));
            info!(
                http_status = status.as_u16(),
                error_class = err.class().map(|c| c.name()).unwrap_or("none"),
                request_id = header_first(&headers, REQUEST_ID_HEADERS).unwrap_or(""),
                endpoint = url.path(),
                duration_ms = start.elapsed().as_millis() as u64,
                "opencode event stream failed"
            );
            return Err(err);
        }

        let bytes: crate::BoxStream<'static, Bytes> = Box::pin(
            resp.bytes_stream()
                .map_err(|e| Error::Transport(TransportError::Http(e))),
        );
        Ok(SseStream::new(decode_events(&SseDecoder, bytes), ctx.clone()))
    }

    /// One attempt: send, then read the whole body, all under the per-attempt timeout.
    async fn attempt(
        &self,
        resolved: &ResolvedOptions,
        request: &ApiRequest,
        url: &Url,
    ) -> Result<std::result::Result<Received, TransportError>> {
        let http_request = build_request(resolved, request, url, JSON);
        let exchange = async {
            let resp = resolved.transport.send(http_request).await?;
            let status = resp.status();
            let headers = resp.headers().clone();
            let body = resp.bytes().await?;
            Ok::<_, TransportError>(Received {
                status,
                headers,
                body,
            })
        };
        Ok(match resolved.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .unwrap_or(Err(TransportError::Timeout(limit))),
            None => exchange.await,
        })
    }
}

enum Failure {
    Status(Received),
    Transport(TransportError),
}

impl Failure {
    fn reason(&self) -> String {
        match self {
            Failure::Status(r) => format!("HTTP {}", r.status.as_u16()),
            Failure::Transport(e) => e.to_string(),
        }
    }

    fn into_error(self, method: &Method, url: &Url) -> Error {
        match self {
            Failure::Status(r) => Error::Api(api_error(method, url, r.status, &r.headers, &r.body)),
            Failure::Transport(e) => Error::Transport(e),
        }
    }
}

fn build_request(resolved: &ResolvedOptions, request: &ApiRequest, url: &Url, accept: &'static str) -> reqwest::Request {
    let mut http_request = reqwest::Request::new(request.method().clone(), url.clone());
    let headers = http_request.headers_mut();
    *headers = resolved.headers.clone();
    if !headers.contains_key(ACCEPT) {
        headers.insert(ACCEPT, HeaderValue::from_static(accept));
    }
    if let Some(body) = request.body() {
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        }
        *http_request.body_mut() = Some(body.to_vec().into());
    }
    http_request
}

fn decode_body<T: DeserializeOwned>(method: &Method, url: &Url, body: &[u8]) -> Result<T> {
    let text: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };
    serde_json::from_slice(text).map_err(|source| Error::Decode {
        message: format!("{} {}", method, url),
        source,
    })
}

/// Builds the structured error for a non-2xx response.
pub(crate) fn api_error(
    method: &Method,
    url: &Url,
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
) -> ApiError {
    let text = String::from_utf8_lossy(body).trim().to_string();
    let message = message_from_body(&text)
        .or_else(|| (!text.is_empty()).then(|| text.clone()))
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default();
    ApiError {
        status: status.as_u16(),
        message,
        request_id: header_first(headers, REQUEST_ID_HEADERS).map(str::to_string),
        body: (!text.is_empty()).then_some(text),
        method: method.to_string(),
        url: url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("http://h/session").unwrap()
    }

    #[test]
    fn message_from_json_shapes() {
        for (body, expected) in [
            (r#"{"message":"top"}"#, "top"),
            (r#"{"data":{"message":"nested"}}"#, "nested"),
            (r#"{"error":{"message":"inner"}}"#, "inner"),
            (r#"{"error":"plain"}"#, "plain"),
        ] {
            let e = api_error(&Method::GET, &url(), StatusCode::BAD_REQUEST, &HeaderMap::new(), body.as_bytes());
            assert_eq!(e.message, expected);
        }
    }

    #[test]
    fn message_falls_back_to_text_then_reason() {
        let e = api_error(&Method::GET, &url(), StatusCode::BAD_GATEWAY, &HeaderMap::new(), b"upstream down");
        assert_eq!(e.message, "upstream down");
        let e = api_error(&Method::GET, &url(), StatusCode::NOT_FOUND, &HeaderMap::new(), b"");
        assert_eq!(e.message, "Not Found");
        assert_eq!(e.body, None);
    }

    #[test]
    fn request_id_is_captured() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("req_9"));
        let e = api_error(&Method::POST, &url(), StatusCode::CONFLICT, &headers, b"{}");
        assert_eq!(e.request_id.as_deref(), Some("req_9"));
        assert_eq!(e.method, "POST");
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let unit: () = decode_body(&Method::DELETE, &url(), b"").unwrap();
        assert_eq!(unit, ());
        let none: Option<u32> = decode_body(&Method::GET, &url(), b"  \n").unwrap();
        assert_eq!(none, None);
        let err = decode_body::<u32>(&Method::GET, &url(), b"\"x\"").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
