//! Pluggable HTTP transport.
//!
//! The executor only needs "send a request, get a response or an error". Anything
//! implementing [`HttpTransport`] can stand in for the default `reqwest::Client`,
//! e.g. a recording transport in tests or a proxying one in an embedding app.

pub mod http;

pub use http::{default_http_client, HttpTransport, TransportError};
