use crate::api::DirectoryParams;
use crate::client::{ApiRequest, RequestContext, SseStream};
use crate::types::Event;

service! {
    /// The server's event bus.
    EventService
}

impl<'a> EventService<'a> {
    /// `GET /event`: a stream of bus events, starting with `server.connected`.
    ///
    /// Never fails directly; check [`SseStream::err`] once `next` returns `false`.
    pub async fn subscribe(&self, ctx: &RequestContext, params: &DirectoryParams) -> SseStream<Event> {
        let request = match ApiRequest::get("event").query(params) {
            Ok(request) => request,
            Err(err) => return SseStream::failed(err, ctx.clone()),
        };
        self.client.execute_stream(ctx, request, &self.options).await
    }
}
