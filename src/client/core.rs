use crate::api::{
    AppService, AuthService, CommandService, ConfigService, EventService, FileService,
    FindService, PathService, ProjectService, SessionService, ToolService, TuiService,
};
use crate::client::builder::OpencodeClientBuilder;
use crate::transport::HttpTransport;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Value of the `User-Agent` header sent on every request unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("opencode-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// Immutable client-wide configuration. Built once by [`OpencodeClientBuilder`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Per-attempt timeout for ordinary calls. Streams ignore it unless a call sets one.
    pub timeout: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Sent on every request; per-call header options apply on top.
    pub headers: HeaderMap,
}

impl ClientConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:54321";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Defaults for everything but the base URL.
    pub fn new(base_url: Url) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        Self {
            base_url,
            timeout: Self::DEFAULT_TIMEOUT,
            max_retries: crate::client::policy::RetryPolicy::DEFAULT_MAX_RETRIES,
            headers,
        }
    }
}

/// Client for the opencode server.
///
/// Cheap to clone; clones share configuration and the connection pool. Safe to use from
/// many tasks at once since nothing in it is mutated after construction.
#[derive(Clone)]
pub struct OpencodeClient {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for OpencodeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpencodeClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OpencodeClient {
    pub fn builder() -> OpencodeClientBuilder {
        OpencodeClientBuilder::new()
    }

    /// Client configured from the environment and defaults.
    pub fn new() -> crate::Result<Self> {
        OpencodeClientBuilder::new().build()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn app(&self) -> AppService<'_> {
        AppService::new(self)
    }

    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    pub fn command(&self) -> CommandService<'_> {
        CommandService::new(self)
    }

    pub fn config_api(&self) -> ConfigService<'_> {
        ConfigService::new(self)
    }

    pub fn event(&self) -> EventService<'_> {
        EventService::new(self)
    }

    pub fn file(&self) -> FileService<'_> {
        FileService::new(self)
    }

    pub fn find(&self) -> FindService<'_> {
        FindService::new(self)
    }

    pub fn path(&self) -> PathService<'_> {
        PathService::new(self)
    }

    pub fn project(&self) -> ProjectService<'_> {
        ProjectService::new(self)
    }

    pub fn session(&self) -> SessionService<'_> {
        SessionService::new(self)
    }

    pub fn tool(&self) -> ToolService<'_> {
        ToolService::new(self)
    }

    pub fn tui(&self) -> TuiService<'_> {
        TuiService::new(self)
    }
}
