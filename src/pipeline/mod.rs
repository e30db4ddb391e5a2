//! 事件流水线：将 SSE 字节流解码为类型化事件。
//!
//! # Event Pipeline
//!
//! Turns the body of a `text/event-stream` response into typed values.
//!
//! ```text
//! Raw Bytes → SseDecoder → SseFrame → JSON decode → T (e.g. Event union)
//! ```
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Decoder`] | Trait for frame decoders over a byte stream |
//! | [`decode::SseDecoder`] | Server-sent-event framing |
//! | [`decode_events`] | Frames to typed payloads |
//!
//! The pipeline never restarts a connection; errors are terminal for the stream that
//! produced them.

pub mod decode;


use crate::error::message_from_body;
use crate::BoxStream;
use bytes::Bytes;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tracing::trace;

pub use decode::{FrameDecoder, SseDecoder, SseFrame};

/// Decoder trait for stream framing
pub trait Decoder: Send + Sync {
    /// Split a byte stream into frames
    fn decode_stream(&self, input: BoxStream<'static, Bytes>) -> BoxStream<'static, SseFrame>;
}

/// Pipeline error types
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("server sent an error event: {message}")]
    ServerEvent { message: String },

    #[error("invalid payload in `{}` event: {source}", .event.as_deref().unwrap_or("message"))]
    Payload {
        event: Option<String>,
        #[source]
        source: serde_json::Error,
    },
}

/// Decodes every data-carrying SSE frame of `input` into `T`.
///
/// An `event: error` frame becomes a terminal [`PipelineError::ServerEvent`] carrying the
/// JSON error message when the data has one, else the raw data.
pub fn decode_events<T>(decoder: &dyn Decoder, input: BoxStream<'static, Bytes>) -> BoxStream<'static, T>
where
    T: DeserializeOwned + Send + 'static,
{
    let frames = decoder.decode_stream(input);
    Box::pin(frames.map(|frame| {
        let frame = frame?;
        trace!(event = frame.event.as_deref().unwrap_or("message"), data = %frame.data, "sse frame");
        if frame.event.as_deref() == Some("error") {
            let message = message_from_body(&frame.data).unwrap_or(frame.data);
            return Err(PipelineError::ServerEvent { message }.into());
        }
        serde_json::from_str::<T>(&frame.data).map_err(|source| {
            PipelineError::Payload {
                event: frame.event,
                source,
            }
            .into()
        })
    }))
}
