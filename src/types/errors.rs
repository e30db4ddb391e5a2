//! Error payloads attached to sessions and assistant messages.
//!
//! Both unions are keyed by `name` and share the same five payload types.

use crate::union::json_union;
use serde::{Deserialize, Serialize};

/// The provider rejected the configured credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAuthError {
    pub data: ProviderAuthErrorData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAuthErrorData {
    #[serde(rename = "providerID")]
    pub provider_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownError {
    pub data: ErrorMessage,
}

/// The model stopped because it hit its output token limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageOutputLengthError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAbortedError {
    pub data: ErrorMessage,
}

/// A failed call to the model provider's API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderApiError {
    pub data: ProviderApiErrorData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderApiErrorData {
    pub message: String,
    #[serde(rename = "statusCode", default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(rename = "isRetryable")]
    pub is_retryable: bool,
    #[serde(rename = "responseHeaders", default, skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<std::collections::BTreeMap<String, String>>,
    #[serde(rename = "responseBody", default, skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

json_union! {
    /// Error reported for a whole session (`session.error` events).
    pub struct SessionError;
    pub enum SessionErrorName;
    tag = "name";
    variants {
        ProviderAuth("ProviderAuthError") => as_provider_auth: ProviderAuthError,
        UnknownError("UnknownError") => as_unknown: UnknownError,
        OutputLength("MessageOutputLengthError") => as_output_length: MessageOutputLengthError,
        Aborted("MessageAbortedError") => as_aborted: MessageAbortedError,
        Api("APIError") => as_api: ProviderApiError,
    }
}

json_union! {
    /// Error stored on an assistant message that did not complete.
    pub struct AssistantMessageError;
    pub enum AssistantMessageErrorName;
    tag = "name";
    variants {
        ProviderAuth("ProviderAuthError") => as_provider_auth: ProviderAuthError,
        UnknownError("UnknownError") => as_unknown: UnknownError,
        OutputLength("MessageOutputLengthError") => as_output_length: MessageOutputLengthError,
        Aborted("MessageAbortedError") => as_aborted: MessageAbortedError,
        Api("APIError") => as_api: ProviderApiError,
    }
}

impl SessionError {
    /// Human-readable message, whichever variant this is.
    pub fn message(&self) -> Option<String> {
        error_message(self.raw_json())
    }
}

impl AssistantMessageError {
    pub fn message(&self) -> Option<String> {
        error_message(self.raw_json())
    }
}

fn error_message(raw: Option<&str>) -> Option<String> {
    let peeked = crate::union::peek_fields(raw?, &["data"]).ok()?;
    peeked
        .into_iter()
        .next()
        .flatten()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}
