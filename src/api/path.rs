use crate::api::DirectoryParams;
use crate::client::{ApiRequest, RequestContext};
use crate::types::Path;
use crate::Result;

service! {
    PathService
}

impl<'a> PathService<'a> {
    /// `GET /path`
    pub async fn get(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<Path> {
        let request = ApiRequest::get("path").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }
}
