use crate::api::DirectoryParams;
use crate::client::request::query_param;
use crate::client::{ApiRequest, RequestContext};
use crate::types::ToolListItem;
use crate::Result;
use serde::Serialize;

service! {
    /// Tool registry (experimental endpoints).
    ToolService
}

/// Tools available to one provider/model pair.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ToolListParams {
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl<'a> ToolService<'a> {
    /// `GET /experimental/tool/ids`
    pub async fn ids(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<Vec<String>> {
        let request = ApiRequest::get("experimental/tool/ids").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `GET /experimental/tool`
    pub async fn list(&self, ctx: &RequestContext, params: &ToolListParams) -> Result<Vec<ToolListItem>> {
        query_param("provider", &params.provider)?;
        query_param("model", &params.model)?;
        let request = ApiRequest::get("experimental/tool").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }
}
