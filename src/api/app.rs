use crate::api::{in_directory, DirectoryParams};
use crate::client::{ApiRequest, RequestContext};
use crate::types::Agent;
use crate::Result;
use serde::Serialize;
use serde_json::{Map, Value};

service! {
    /// Agents and server-side logging.
    AppService
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Error,
    Warn,
}

/// An entry for the server log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppLogParams {
    pub service: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Map<String, Value>>,
    #[serde(skip)]
    pub directory: Option<String>,
}

impl<'a> AppService<'a> {
    /// `GET /agent`
    pub async fn agents(&self, ctx: &RequestContext, params: &DirectoryParams) -> Result<Vec<Agent>> {
        let request = ApiRequest::get("agent").query(params)?;
        self.client.execute(ctx, request, &self.options).await
    }

    /// `POST /log`. Returns whether the server accepted the entry.
    pub async fn log(&self, ctx: &RequestContext, params: &AppLogParams) -> Result<bool> {
        let request = in_directory(ApiRequest::post("log"), params.directory.as_deref()).json(params)?;
        self.client.execute(ctx, request, &self.options).await
    }
}
