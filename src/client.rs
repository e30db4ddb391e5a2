//! Client interface for the opencode server.
//!
//! Developer-friendly goal: keep the public surface small and predictable.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod context;
pub mod core;
mod execution;
pub mod options;
mod policy;
pub mod request;
pub mod stream;

pub use builder::OpencodeClientBuilder;
pub use context::RequestContext;
pub use core::{ClientConfig, OpencodeClient};
pub use options::RequestOption;
pub use request::ApiRequest;
pub use stream::SseStream;
