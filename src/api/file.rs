use crate::api::DirectoryParams;
use crate::client::request::query_param;
use crate::client::{ApiRequest, RequestContext};
use crate::types::{File, FileContent, FileNode};
use crate::Result;
use serde::Serialize;

service! {
    /// Files in the project worktree.
    FileService
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FileListParams {
    /// Directory to list, relative to the worktree.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReadParams {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl<'a> FileService<'a> {
    /// `GET /file`
    pub async fn list(&self, ctx: &RequestContext, params: &FileListParams) -> Result<Vec<FileNode>> {
        query_param("path", &params.path)?;
        let request = ApiRequest::get("file").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `GET /file/content`
    pub async fn read(&self, ctx: &RequestContext, params: &FileReadParams) -> Result<FileContent> {
        query_param("path", &params.path)?;
        let request = ApiRequest::get("file/content").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `GET /file/status`: files changed in the working tree.
    pub async fn status(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<Vec<File>> {
        let request = ApiRequest::get("file/status").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }
}
