use crate::error_code::ErrorClass;
use crate::pipeline::PipelineError;
use crate::transport::TransportError;
use crate::union::VariantError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Parameter or configuration key that caused the error (e.g., "path.sessionID", "options.max_retries")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected range, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "client_builder", "request_options")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A non-2xx response from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    /// Derived from the body: the JSON error message when there is one, else the raw text.
    pub message: String,
    /// `X-Request-Id` of the failing response, if the server sent one.
    pub request_id: Option<String>,
    /// Raw response body, kept for diagnostics.
    pub body: Option<String>,
    pub method: String,
    pub url: String,
}

impl ApiError {
    pub fn class(&self) -> Option<ErrorClass> {
        ErrorClass::from_http_status(self.status)
    }

    pub fn is(&self, class: ErrorClass) -> bool {
        self.class() == Some(class)
    }

    pub fn is_not_found(&self) -> bool {
        self.is(ErrorClass::NotFound)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.is(ErrorClass::Unauthorized)
    }

    pub fn is_forbidden(&self) -> bool {
        self.is(ErrorClass::Forbidden)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.is(ErrorClass::RateLimited)
    }

    pub fn is_invalid_request(&self) -> bool {
        self.is(ErrorClass::InvalidRequest)
    }

    pub fn is_internal(&self) -> bool {
        self.is(ErrorClass::Internal)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: HTTP {}", self.method, self.url, self.status)?;
        if let Some(class) = self.class() {
            write!(f, " ({})", class)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(id) = &self.request_id {
            write!(f, " [request-id: {}]", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Pulls a human-readable message out of the usual JSON error shapes.
///
/// Used for non-2xx bodies and for the data of `event: error` frames.
pub(crate) fn message_from_body(text: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(text).ok()?;
    let candidates = [
        json.get("message"),
        json.get("data").and_then(|d| d.get("message")),
        json.get("error").and_then(|e| e.get("message")),
        json.get("error"),
    ];
    let message = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    message
}

/// Unified error type for the opencode client.
///
/// Transport failures, cancellation and deadlines are kept apart from [`Error::Api`] so a
/// caller can tell "never got a response" from "got an error response".
#[derive(Debug, Error)]
pub enum Error {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to decode response body: {message}")]
    Decode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Variant(#[from] VariantError),

    #[error("Event stream error: {0}")]
    Pipeline(#[from] PipelineError),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// The structured API error, when the server answered with a non-2xx status.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.as_api().map(|e| e.status)
    }

    /// Sentinel class of the error; `None` for anything that is not an API error.
    pub fn class(&self) -> Option<ErrorClass> {
        self.as_api().and_then(ApiError::class)
    }

    pub fn is(&self, class: ErrorClass) -> bool {
        self.class() == Some(class)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    pub fn is_wrong_variant(&self) -> bool {
        matches!(self, Error::Variant(v) if v.is_wrong_variant())
    }
}
