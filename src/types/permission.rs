use crate::union::shape_union;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

shape_union! {
    /// Pattern a permission request applies to: one glob or several.
    pub struct PermissionPattern;
    variants {
        String => as_string: String,
        Array => as_array: Vec<String>,
    }
}

impl PermissionPattern {
    /// All patterns, whichever shape was sent. Malformed payloads yield nothing.
    pub fn patterns(&self) -> Vec<String> {
        match self.shape() {
            crate::union::JsonShape::String => self.as_string().map(|s| vec![s]).unwrap_or_default(),
            crate::union::JsonShape::Array => self.as_array().unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PermissionTime {
    pub created: i64,
}

/// A tool asking the user for permission before it runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    /// Permission kind, e.g. `bash`, `edit` or `webfetch`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<PermissionPattern>,
    #[serde(rename = "sessionID")]
    pub session_id: String,
    #[serde(rename = "messageID")]
    pub message_id: String,
    #[serde(rename = "callID", default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub time: PermissionTime,
}

/// Answer to a [`Permission`] request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionResponse {
    Once,
    Always,
    Reject,
}
