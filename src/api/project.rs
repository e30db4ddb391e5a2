use crate::api::DirectoryParams;
use crate::client::{ApiRequest, RequestContext};
use crate::types::Project;
use crate::Result;

service! {
    /// Projects the server knows about.
    ProjectService
}

impl<'a> ProjectService<'a> {
    /// `GET /project`
    pub async fn list(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<Vec<Project>> {
        let request = ApiRequest::get("project").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `GET /project/current`
    pub async fn current(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<Project> {
        let request = ApiRequest::get("project/current").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }
}
