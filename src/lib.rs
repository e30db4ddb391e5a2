//! # opencode-sdk
//!
//! opencode 服务端 HTTP API 的类型化异步客户端。
//!
//! Typed async client for the opencode server HTTP API.
//!
//! ## Overview
//!
//! Two pieces carry the weight of this crate:
//!
//! - **Request executor**: builds each request from a base URL, a relative path, query
//!   parameters and an optional JSON body, retries rate limits and server errors with
//!   exponential backoff, and turns every non-2xx response into a structured [`ApiError`].
//!   Server-sent-event endpoints are exposed as pull-based [`SseStream`]s.
//! - **Discriminated unions**: payloads such as [`types::Event`] or [`types::Part`] keep
//!   their raw JSON and are decoded into a concrete variant only when asked
//!   (`event.as_message_updated()?`). See [`union`].
//!
//! Resource methods (`client.session().list(..)`, `client.event().subscribe(..)`, ...)
//! are thin wrappers in [`api`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use opencode_sdk::{OpencodeClient, RequestContext};
//! use opencode_sdk::api::DirectoryParams;
//!
//! #[tokio::main]
//! async fn main() -> opencode_sdk::Result<()> {
//!     let client = OpencodeClient::builder()
//!         .base_url("http://localhost:4096")
//!         .build()?;
//!
//!     let ctx = RequestContext::new();
//!     for session in client.session().list(&ctx, &DirectoryParams::default()).await? {
//!         println!("{} {}", session.id, session.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client, builder, per-call options, executor and streams |
//! | [`api`] | Resource services (session, event, file, ...) |
//! | [`types`] | Wire types and discriminated unions |
//! | [`union`] | Raw-JSON-backed union machinery |
//! | [`pipeline`] | Server-sent-event framing |
//! | [`transport`] | Pluggable HTTP transport |
//! | [`error_code`] | HTTP status classification |

pub mod api;
pub mod client;
pub mod error_code;
pub mod pipeline;
pub mod transport;
pub mod types;
pub mod union;

pub use client::{
    ApiRequest, ClientConfig, OpencodeClient, OpencodeClientBuilder, RequestContext,
    RequestOption, SseStream,
};
pub use error_code::ErrorClass;
pub use union::{Discriminant, JsonShape, VariantError, VariantOf};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `Result<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::{ApiError, Error, ErrorContext};
