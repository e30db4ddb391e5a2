use crate::api::{in_directory, DirectoryParams};
use crate::client::{ApiRequest, RequestContext};
use crate::Result;
use serde::Serialize;

service! {
    /// Drives a running terminal UI.
    TuiService
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TuiShowToastParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
    pub variant: ToastVariant,
    #[serde(skip)]
    pub directory: Option<String>,
}

#[derive(Serialize)]
struct TextBody<'b> {
    text: &'b str,
}

#[derive(Serialize)]
struct CommandBody<'b> {
    command: &'b str,
}

impl<'a> TuiService<'a> {
    /// `POST /tui/append-prompt`
    pub async fn append_prompt(&self, ctx: &RequestContext, text: &str, params: &DirectoryParams) -> Result<bool> {
        let request = ApiRequest::post("tui/append-prompt").query(params)?.json(&TextBody { text })?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /tui/submit-prompt`
    pub async fn submit_prompt(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<bool> {
        self.action(ctx, "tui/submit-prompt", params).await
    }

    /// `POST /tui/clear-prompt`
    pub async fn clear_prompt(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<bool> {
        self.action(ctx, "tui/clear-prompt", params).await
    }

    /// `POST /tui/open-help`
    pub async fn open_help(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<bool> {
        self.action(ctx, "tui/open-help", params).await
    }

    /// `POST /tui/open-sessions`
    pub async fn open_sessions(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<bool> {
        self.action(ctx, "tui/open-sessions", params).await
    }

    /// `POST /tui/open-themes`
    pub async fn open_themes(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<bool> {
        self.action(ctx, "tui/open-themes", params).await
    }

    /// `POST /tui/open-models`
    pub async fn open_models(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<bool> {
        self.action(ctx, "tui/open-models", params).await
    }

    /// `POST /tui/execute-command`, e.g. `agent_cycle` or `session_new`.
    pub async fn execute_command(&self, ctx: &RequestContext, command: &str, params: &DirectoryParams) -> Result<bool> {
        let request = ApiRequest::post("tui/execute-command")
            .query(params)?
            .json(&CommandBody { command })?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /tui/show-toast`
    pub async fn show_toast(&self, ctx: &RequestContext, params: &TuiShowToastParams) -> Result<bool> {
        let request = in_directory(ApiRequest::post("tui/show-toast"), params.directory.as_deref()).json(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    async fn action(&self, ctx: &RequestContext, path: &str, params: &DirectoryParams) -> Result<bool> {
        let request = ApiRequest::post(path).query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }
}
