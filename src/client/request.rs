//! Request descriptor and URL construction.

use crate::{Error, ErrorContext, Result};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

/// One API call, before options and the base URL are applied.
///
/// Built fresh for every call and never shared; the executor turns it into a
/// `reqwest::Request` once per attempt.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// `path` is a fixed route such as `"session"` or `"tui/open-help"`; its `/` separate
    /// segments. Caller-supplied values go through [`segment`](Self::segment).
    pub fn new(method: Method, path: impl AsRef<str>) -> Self {
        Self {
            method,
            segments: path
                .as_ref()
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl AsRef<str>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl AsRef<str>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl AsRef<str>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl AsRef<str>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl AsRef<str>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends one path segment taken verbatim; `/`, `?` and `%` in it are percent-encoded.
    pub fn segment(mut self, value: impl Into<String>) -> Self {
        self.segments.push(value.into());
        self
    }

    /// Appends the fields of `params` as query pairs (see [`encode_query`]).
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self> {
        let value = serde_json::to_value(params)?;
        self.query.extend(encode_query(&value));
        Ok(self)
    }

    /// Appends one raw query pair.
    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The unencoded segments, joined with `/`.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Resolves the full URL against `base`.
    ///
    /// Base query pairs are kept unless the call sets the same key, in which case the call
    /// wins. Query overrides from request options are applied last, in order.
    pub(crate) fn url(&self, base: &Url, overrides: &[QueryOp]) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::validation_with_context(
                    "base URL cannot carry a path",
                    ErrorContext::new().with_details(base.as_str().to_string()),
                )
            })?;
            segments.pop_if_empty();
            for segment in &self.segments {
                segments.push(segment);
            }
        }

        let mut pairs: Vec<(String, String)> = base
            .query_pairs()
            .filter(|(k, _)| !self.query.iter().any(|(key, _)| key == k))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        pairs.extend(self.query.iter().cloned());
        for op in overrides {
            op.apply(&mut pairs);
        }

        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs.iter());
        }
        Ok(url)
    }
}

/// Query edits carried by request options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum QueryOp {
    Set(String, String),
    Add(String, String),
    Del(String),
}

impl QueryOp {
    fn apply(&self, pairs: &mut Vec<(String, String)>) {
        match self {
            QueryOp::Set(k, v) => {
                pairs.retain(|(key, _)| key != k);
                pairs.push((k.clone(), v.clone()));
            }
            QueryOp::Add(k, v) => pairs.push((k.clone(), v.clone())),
            QueryOp::Del(k) => pairs.retain(|(key, _)| key != k),
        }
    }
}

/// Flattens a serialized parameter struct into query pairs.
///
/// - `null` fields are dropped;
/// - arrays are joined with commas;
/// - nested objects use bracket keys (`time[start]=1`).
pub fn encode_query(value: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    if let Value::Object(map) = value {
        for (key, v) in map {
            encode_into(key, v, &mut out);
        }
    }
    out
}

fn encode_into(key: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (sub, v) in map {
                encode_into(&format!("{}[{}]", key, sub), v, out);
            }
        }
        Value::Array(items) if items.is_empty() => {}
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().filter_map(scalar).collect();
            out.push((key.to_string(), joined.join(",")));
        }
        other => {
            if let Some(s) = scalar(other) {
                out.push((key.to_string(), s));
            }
        }
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Validates a required path parameter before any network call.
///
/// `.` and `..` are rejected: URL normalisation would turn them into another route.
pub(crate) fn path_param<'a>(name: &'static str, value: &'a str) -> Result<&'a str> {
    let value = required("path", name, value)?;
    if value == "." || value == ".." {
        return Err(Error::validation_with_context(
            format!("invalid {} parameter `{}`", name, value),
            ErrorContext::new()
                .with_field_path(format!("path.{}", name))
                .with_source("request_builder"),
        ));
    }
    Ok(value)
}

/// Validates a required query parameter before any network call.
pub(crate) fn query_param<'a>(name: &'static str, value: &'a str) -> Result<&'a str> {
    required("query", name, value)
}

fn required<'a>(location: &str, name: &'static str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(Error::validation_with_context(
            format!("missing required {} parameter", name),
            ErrorContext::new()
                .with_field_path(format!("{}.{}", location, name))
                .with_source("request_builder"),
        ));
    }
    Ok(value)
}
