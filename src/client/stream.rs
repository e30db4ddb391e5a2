//! Pull-based server-sent-event stream.

use crate::client::context::RequestContext;
use crate::{BoxStream, Error};
use futures::{stream, StreamExt};

/// Typed event stream returned by [`OpencodeClient::execute_stream`].
///
/// ```rust,no_run
/// # async fn demo(client: opencode_sdk::OpencodeClient) {
/// use opencode_sdk::RequestContext;
///
/// let ctx = RequestContext::new();
/// let mut events = client.event().subscribe(&ctx, &Default::default()).await;
/// while events.next().await {
///     if let Some(event) = events.current() {
///         println!("{}", event.kind());
///     }
/// }
/// if let Some(err) = events.err() {
///     eprintln!("stream ended: {}", err);
/// }
/// # }
/// ```
///
/// Once [`next`](Self::next) returns `false` the stream is finished for good; [`err`](Self::err)
/// then tells a clean end of stream (`None`) from a failure. Dropping the stream or calling
/// [`close`](Self::close) releases the connection.
///
/// [`OpencodeClient::execute_stream`]: crate::OpencodeClient::execute_stream
pub struct SseStream<T> {
    inner: Option<BoxStream<'static, T>>,
    current: Option<T>,
    err: Option<Error>,
    ctx: RequestContext,
}

impl<T> SseStream<T> {
    pub(crate) fn new(inner: BoxStream<'static, T>, ctx: RequestContext) -> Self {
        Self {
            inner: Some(inner),
            current: None,
            err: None,
            ctx,
        }
    }

    /// A stream that failed before producing anything.
    pub(crate) fn failed(err: Error, ctx: RequestContext) -> Self {
        Self {
            inner: None,
            current: None,
            err: Some(err),
            ctx,
        }
    }

    /// Advances to the next event. Returns `false` at end of stream or on error.
    pub async fn next(&mut self) -> bool {
        let Some(inner) = self.inner.as_mut() else {
            self.current = None;
            return false;
        };

        match self.ctx.run(async { Ok(inner.next().await) }).await {
            Ok(Some(Ok(item))) => {
                self.current = Some(item);
                true
            }
            Ok(Some(Err(err))) | Err(err) => {
                self.finish(Some(err));
                false
            }
            Ok(None) => {
                self.finish(None);
                false
            }
        }
    }

    /// The event produced by the last successful [`next`](Self::next).
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    /// Moves the current event out.
    pub fn take_current(&mut self) -> Option<T> {
        self.current.take()
    }

    /// The terminal error, if the stream failed.
    pub fn err(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    /// Whether the stream can still produce events.
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Releases the connection. Idempotent; later `next` calls return `false`.
    pub fn close(&mut self) {
        self.finish(None);
    }

    fn finish(&mut self, err: Option<Error>) {
        self.inner = None;
        self.current = None;
        if self.err.is_none() {
            self.err = err;
        }
    }
}

impl<T: Send + 'static> SseStream<T> {
    /// Adapts into a `futures::Stream`. A terminal error is yielded as the last item.
    pub fn into_stream(self) -> BoxStream<'static, T> {
        Box::pin(stream::unfold(self, |mut s| async move {
            if s.next().await {
                let item = s.current.take()?;
                return Some((Ok(item), s));
            }
            let err = s.err.take()?;
            Some((Err(err), s))
        }))
    }
}

impl<T> std::fmt::Debug for SseStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseStream")
            .field("open", &self.inner.is_some())
            .field("err", &self.err)
            .finish_non_exhaustive()
    }
}
