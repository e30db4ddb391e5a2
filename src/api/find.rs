use crate::client::request::query_param;
use crate::client::{ApiRequest, RequestContext};
use crate::types::{FindMatch, Symbol};
use crate::Result;
use serde::Serialize;

service! {
    /// File, symbol and text search.
    FindService
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FindFilesParams {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FindSymbolsParams {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FindTextParams {
    /// Regular expression, ripgrep syntax.
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl<'a> FindService<'a> {
    /// `GET /find/file`: paths matching a fuzzy query.
    pub async fn files(&self, ctx: &RequestContext, params: &FindFilesParams) -> Result<Vec<String>> {
        query_param("query", &params.query)?;
        let request = ApiRequest::get("find/file").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `GET /find/symbol`
    pub async fn symbols(&self, ctx: &RequestContext, params: &FindSymbolsParams) -> Result<Vec<Symbol>> {
        query_param("query", &params.query)?;
        let request = ApiRequest::get("find/symbol").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `GET /find`
    pub async fn text(&self, ctx: &RequestContext, params: &FindTextParams) -> Result<Vec<FindMatch>> {
        query_param("pattern", &params.pattern)?;
        let request = ApiRequest::get("find").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }
}
