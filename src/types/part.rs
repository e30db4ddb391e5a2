//! Message parts, tool state and the request-side part inputs.
//!
//! Every [`Part`] carries `id`, `sessionID` and `messageID`; those are promoted onto the
//! wrapper, so the variant structs only hold what is specific to them.

use crate::types::errors::ProviderApiError;
use crate::types::file::Range;
use crate::types::message::TokenUsage;
use crate::union::json_union;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartTime {
    pub start: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPart {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthetic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<PartTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningPart {
    pub text: String,
    pub time: PartTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePart {
    pub mime: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<FilePartSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolPart {
    #[serde(rename = "callID")]
    pub call_id: String,
    pub tool: String,
    pub state: ToolPartState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepStartPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepFinishPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub tokens: TokenUsage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPart {
    pub snapshot: String,
}

/// Files changed during a step, identified by snapshot hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchPart {
    pub hash: String,
    pub files: Vec<String>,
}

/// Where an `@agent` mention sits in the prompt text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSource {
    pub value: String,
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPart {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<AgentSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryTime {
    pub created: i64,
}

/// A provider call that failed and is being retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPart {
    pub attempt: u32,
    pub error: ProviderApiError,
    pub time: RetryTime,
}

json_union! {
    /// One piece of a message.
    pub struct Part;
    pub enum PartType;
    tag = "type";
    promote {
        id => "id",
        session_id => "sessionID",
        message_id => "messageID",
    }
    variants {
        Text("text") => as_text: TextPart,
        Reasoning("reasoning") => as_reasoning: ReasoningPart,
        File("file") => as_file: FilePart,
        Tool("tool") => as_tool: ToolPart,
        StepStart("step-start") => as_step_start: StepStartPart,
        StepFinish("step-finish") => as_step_finish: StepFinishPart,
        Snapshot("snapshot") => as_snapshot: SnapshotPart,
        Patch("patch") => as_patch: PatchPart,
        Agent("agent") => as_agent: AgentPart,
        Retry("retry") => as_retry: RetryPart,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolStateTime {
    pub start: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolStatePending {
    #[serde(default)]
    pub input: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolStateRunning {
    #[serde(default)]
    pub input: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub time: ToolStateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolStateCompleted {
    pub input: Map<String, Value>,
    pub output: String,
    pub title: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub time: ToolStateTime,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<FilePart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolStateError {
    #[serde(default)]
    pub input: Map<String, Value>,
    pub error: String,
    pub time: ToolStateTime,
}

json_union! {
    /// Lifecycle of a tool call.
    pub struct ToolPartState;
    pub enum ToolStatus;
    tag = "status";
    variants {
        Pending("pending") => as_pending: ToolStatePending,
        Running("running") => as_running: ToolStateRunning,
        Completed("completed") => as_completed: ToolStateCompleted,
        Error("error") => as_error: ToolStateError,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePartSourceText {
    pub value: String,
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSource {
    pub path: String,
    pub text: FilePartSourceText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSource {
    pub path: String,
    pub text: FilePartSourceText,
    pub name: String,
    pub kind: u32,
    pub range: Range,
}

json_union! {
    /// Where an attached file came from.
    pub struct FilePartSource;
    pub enum FilePartSourceType;
    tag = "type";
    variants {
        File("file") => as_file: FileSource,
        Symbol("symbol") => as_symbol: SymbolSource,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextPartInput {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthetic: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilePartInput {
    pub mime: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<FilePartSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPartInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<AgentSource>,
}

json_union! {
    /// A part sent with a prompt.
    pub struct PartInput;
    pub enum PartInputType;
    tag = "type";
    variants {
        Text("text") => as_text: TextPartInput,
        File("file") => as_file: FilePartInput,
        Agent("agent") => as_agent: AgentPartInput,
    }
}

impl PartInput {
    /// A plain text part.
    pub fn text(text: impl Into<String>) -> Result<Self, serde_json::Error> {
        Self::from_variant(&TextPartInput {
            text: text.into(),
            ..Default::default()
        })
    }

    /// A file attachment given by URL (`file://`, `data:` or `http(s)://`).
    pub fn file(mime: impl Into<String>, url: impl Into<String>) -> Result<Self, serde_json::Error> {
        Self::from_variant(&FilePartInput {
            mime: mime.into(),
            url: url.into(),
            filename: None,
            source: None,
        })
    }

    /// An `@agent` mention.
    pub fn agent(name: impl Into<String>) -> Result<Self, serde_json::Error> {
        Self::from_variant(&AgentPartInput {
            name: name.into(),
            source: None,
        })
    }
}
