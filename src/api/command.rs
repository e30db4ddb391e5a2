use crate::api::DirectoryParams;
use crate::client::{ApiRequest, RequestContext};
use crate::types::Command;
use crate::Result;

service! {
    /// Slash commands.
    CommandService
}

impl<'a> CommandService<'a> {
    /// `GET /command`
    pub async fn list(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<Vec<Command>> {
        let request = ApiRequest::get("command").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }
}
