//! 资源服务：每个服务把类型化参数翻译成一次请求执行。
//!
//! Resource services. Each is a short-lived handle borrowed from the client
//! (`client.session()`, `client.file()`, ...) that turns typed parameters into an
//! [`ApiRequest`] and hands it to the executor.
//!
//! Options added with `with_option` apply to every call made through that handle:
//!
//! ```rust,no_run
//! # async fn demo(client: opencode_sdk::OpencodeClient) -> opencode_sdk::Result<()> {
//! use opencode_sdk::{RequestContext, RequestOption};
//!
//! let ctx = RequestContext::new();
//! let sessions = client
//!     .session()
//!     .with_option(RequestOption::max_retries(0))
//!     .list(&ctx, &Default::default())
//!     .await?;
//! # let _ = sessions;
//! # Ok(())
//! # }
//! ```

use crate::client::ApiRequest;
use serde::Serialize;

macro_rules! service {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name<'a> {
            client: &'a $crate::client::OpencodeClient,
            options: Vec<$crate::client::RequestOption>,
        }

        impl<'a> $name<'a> {
            pub(crate) fn new(client: &'a $crate::client::OpencodeClient) -> Self {
                Self {
                    client,
                    options: Vec::new(),
                }
            }

            /// Adds an option applied to every call made through this handle.
            pub fn with_option(mut self, option: $crate::client::RequestOption) -> Self {
                self.options.push(option);
                self
            }
        }
    };
}

pub mod app;
pub mod auth;
pub mod command;
pub mod config;
pub mod event;
pub mod file;
pub mod find;
pub mod path;
pub mod project;
pub mod session;
pub mod tool;
pub mod tui;

pub use app::{AppLogParams, AppService, LogLevel};
pub use auth::AuthService;
pub use command::CommandService;
pub use config::ConfigService;
pub use event::EventService;
pub use file::{FileListParams, FileReadParams, FileService};
pub use find::{FindFilesParams, FindService, FindSymbolsParams, FindTextParams};
pub use path::PathService;
pub use project::ProjectService;
pub use session::{
    SessionCommandParams, SessionCreateParams, SessionInitParams, SessionPermissionParams,
    SessionPromptParams, SessionRevertParams, SessionService, SessionShellParams,
    SessionSummarizeParams, SessionUpdateParams,
};
pub use tool::{ToolListParams, ToolService};
pub use tui::{ToastVariant, TuiService, TuiShowToastParams};

/// The optional `directory` query parameter most endpoints accept.
///
/// Selects which project instance on the server handles the call; the server's working
/// directory is used when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl DirectoryParams {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: Some(directory.into()),
        }
    }
}

/// Adds `directory` as a query pair for calls whose other parameters travel in the body.
pub(crate) fn in_directory(request: ApiRequest, directory: Option<&str>) -> ApiRequest {
    match directory {
        Some(dir) => request.query_pair("directory", dir),
        None => request,
    }
}
