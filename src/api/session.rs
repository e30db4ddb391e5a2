use crate::api::{in_directory, DirectoryParams};
use crate::client::request::path_param;
use crate::client::{ApiRequest, RequestContext};
use crate::types::{Message, MessageWithParts, ModelRef, PartInput, PermissionResponse, Session};
use crate::Result;
use reqwest::Method;
use serde::Serialize;
use std::collections::BTreeMap;

service! {
    /// Sessions, their messages and the actions that drive them.
    SessionService
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionCreateParams {
    #[serde(rename = "parentID", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip)]
    pub directory: Option<String>,
}

/// Partial update; absent fields are left unchanged on the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip)]
    pub directory: Option<String>,
}

/// Analyzes the project and writes `AGENTS.md`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionInitParams {
    #[serde(rename = "messageID")]
    pub message_id: String,
    #[serde(rename = "providerID")]
    pub provider_id: String,
    #[serde(rename = "modelID")]
    pub model_id: String,
    #[serde(skip)]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionPromptParams {
    pub parts: Vec<PartInput>,
    #[serde(rename = "messageID", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Per-tool enable flags for this turn.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tools: BTreeMap<String, bool>,
    #[serde(rename = "noReply", skip_serializing_if = "Option::is_none")]
    pub no_reply: Option<bool>,
    #[serde(skip)]
    pub directory: Option<String>,
}

impl SessionPromptParams {
    /// A prompt made of one text part.
    pub fn text(text: impl Into<String>) -> Result<Self> {
        Ok(Self {
            parts: vec![PartInput::text(text)?],
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionCommandParams {
    pub command: String,
    pub arguments: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// `provider/model`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "messageID", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip)]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionShellParams {
    pub agent: String,
    pub command: String,
    #[serde(skip)]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionRevertParams {
    #[serde(rename = "messageID")]
    pub message_id: String,
    #[serde(rename = "partID", skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,
    #[serde(skip)]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionSummarizeParams {
    #[serde(rename = "providerID")]
    pub provider_id: String,
    #[serde(rename = "modelID")]
    pub model_id: String,
    #[serde(skip)]
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionPermissionParams {
    pub response: PermissionResponse,
    #[serde(skip)]
    pub directory: Option<String>,
}

impl<'a> SessionService<'a> {
    /// `GET /session`
    pub async fn list(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<Vec<Session>> {
        let request = ApiRequest::get("session").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /session`
    pub async fn create(&self, ctx: &RequestContext, params: &SessionCreateParams) -> Result<Session> {
        let request = in_directory(ApiRequest::post("session"), params.directory.as_deref()).json(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `GET /session/{id}`
    pub async fn get(&self, ctx: &RequestContext, id: &str, params: &DirectoryParams) -> Result<Session> {
        let request = session_request(Method::GET, id, &[])?.query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `PATCH /session/{id}`
    pub async fn update(&self, ctx: &RequestContext, id: &str, params: &SessionUpdateParams) -> Result<Session> {
        let request = session_request(Method::PATCH, id, &[])?;
        let request = in_directory(request, params.directory.as_deref()).json(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `DELETE /session/{id}`: deletes the session and everything in it.
    pub async fn delete(&self, ctx: &RequestContext, id: &str, params: &DirectoryParams) -> Result<bool> {
        let request = session_request(Method::DELETE, id, &[])?.query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /session/{id}/abort`
    pub async fn abort(&self, ctx: &RequestContext, id: &str, params: &DirectoryParams) -> Result<bool> {
        let request = session_request(Method::POST, id, &["abort"])?.query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `GET /session/{id}/children`
    pub async fn children(&self, ctx: &RequestContext, id: &str, params: &DirectoryParams) -> Result<Vec<Session>> {
        let request = session_request(Method::GET, id, &["children"])?.query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /session/{id}/init`
    pub async fn init(&self, ctx: &RequestContext, id: &str, params: &SessionInitParams) -> Result<bool> {
        let request = session_request(Method::POST, id, &["init"])?;
        let request = in_directory(request, params.directory.as_deref()).json(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `GET /session/{id}/message`
    pub async fn messages(
        &self,
        ctx: &RequestContext,
        id: &str,
        params: &DirectoryParams,
    ) -> Result<Vec<MessageWithParts>> {
        let request = session_request(Method::GET, id, &["message"])?.query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `GET /session/{id}/message/{messageID}`
    pub async fn message(
        &self,
        ctx: &RequestContext,
        id: &str,
        message_id: &str,
        params: &DirectoryParams,
    ) -> Result<MessageWithParts> {
        let message_id = path_param("messageID", message_id)?;
        let request = session_request(Method::GET, id, &["message", message_id])?.query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /session/{id}/message`: sends a prompt and waits for the assistant's reply.
    pub async fn prompt(
        &self,
        ctx: &RequestContext,
        id: &str,
        params: &SessionPromptParams,
    ) -> Result<MessageWithParts> {
        let request = session_request(Method::POST, id, &["message"])?;
        let request = in_directory(request, params.directory.as_deref()).json(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /session/{id}/command`
    pub async fn command(
        &self,
        ctx: &RequestContext,
        id: &str,
        params: &SessionCommandParams,
    ) -> Result<MessageWithParts> {
        let request = session_request(Method::POST, id, &["command"])?;
        let request = in_directory(request, params.directory.as_deref()).json(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /session/{id}/shell`: runs a shell command; the reply is an assistant message.
    pub async fn shell(&self, ctx: &RequestContext, id: &str, params: &SessionShellParams) -> Result<Message> {
        let request = session_request(Method::POST, id, &["shell"])?;
        let request = in_directory(request, params.directory.as_deref()).json(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /session/{id}/revert`
    pub async fn revert(&self, ctx: &RequestContext, id: &str, params: &SessionRevertParams) -> Result<Session> {
        let request = session_request(Method::POST, id, &["revert"])?;
        let request = in_directory(request, params.directory.as_deref()).json(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /session/{id}/unrevert`
    pub async fn unrevert(&self, ctx: &RequestContext, id: &str, params: &DirectoryParams) -> Result<Session> {
        let request = session_request(Method::POST, id, &["unrevert"])?.query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /session/{id}/share`
    pub async fn share(&self, ctx: &RequestContext, id: &str, params: &DirectoryParams) -> Result<Session> {
        let request = session_request(Method::POST, id, &["share"])?.query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `DELETE /session/{id}/share`
    pub async fn unshare(&self, ctx: &RequestContext, id: &str, params: &DirectoryParams) -> Result<Session> {
        let request = session_request(Method::DELETE, id, &["share"])?.query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /session/{id}/summarize`
    pub async fn summarize(
        &self,
        ctx: &RequestContext,
        id: &str,
        params: &SessionSummarizeParams,
    ) -> Result<bool> {
        let request = session_request(Method::POST, id, &["summarize"])?;
        let request = in_directory(request, params.directory.as_deref()).json(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /session/{id}/permissions/{permissionID}`: answers a permission request.
    pub async fn respond_permission(
        &self,
        ctx: &RequestContext,
        id: &str,
        permission_id: &str,
        params: &SessionPermissionParams,
    ) -> Result<bool> {
        let permission_id = path_param("permissionID", permission_id)?;
        let request = session_request(Method::POST, id, &["permissions", permission_id])?;
        let request = in_directory(request, params.directory.as_deref()).json(params)?;
        self.client.execute(ctx, request, &self.options).await
    }
}

/// `session/{id}` followed by `rest`, each as its own path segment.
fn session_request(method: Method, id: &str, rest: &[&str]) -> Result<ApiRequest> {
    let id = path_param("id", id)?;
    let request = ApiRequest::new(method, "session").segment(id);
    Ok(rest.iter().fold(request, |request, s| request.segment(*s)))
}
