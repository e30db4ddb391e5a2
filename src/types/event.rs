//! Bus events delivered over `GET /event`.
//!
//! Every event is `{"type": ..., "properties": {...}}`. The variant structs below mirror
//! that envelope; nested unions (messages, parts, errors) stay raw until asked for.

use crate::types::errors::SessionError;
use crate::types::message::Message;
use crate::types::part::Part;
use crate::types::permission::{Permission, PermissionResponse};
use crate::types::session::{Session, Todo};
use crate::union::json_union;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallationUpdatedProperties {
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LspClientDiagnosticsProperties {
    #[serde(rename = "serverID")]
    pub server_id: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageInfoProperties {
    pub info: Message,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRemovedProperties {
    #[serde(rename = "sessionID")]
    pub session_id: String,
    #[serde(rename = "messageID")]
    pub message_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartUpdatedProperties {
    pub part: Part,
    /// Text appended since the previous update of this part, when streaming.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRemovedProperties {
    #[serde(rename = "sessionID")]
    pub session_id: String,
    #[serde(rename = "messageID")]
    pub message_id: String,
    #[serde(rename = "partID")]
    pub part_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionIdProperties {
    #[serde(rename = "sessionID")]
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionRepliedProperties {
    #[serde(rename = "sessionID")]
    pub session_id: String,
    #[serde(rename = "permissionID")]
    pub permission_id: String,
    pub response: PermissionResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEditedProperties {
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileWatcherUpdatedProperties {
    pub file: String,
    /// `add`, `change` or `unlink`.
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoUpdatedProperties {
    #[serde(rename = "sessionID")]
    pub session_id: String,
    pub todos: Vec<Todo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfoProperties {
    pub info: Session,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionErrorProperties {
    #[serde(rename = "sessionID", default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionError>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyProperties {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeInstalledProperties {
    pub ide: String,
}

macro_rules! event_payloads {
    ($( $(#[$meta:meta])* $name:ident($props:ty) ),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Serialize, Deserialize)]
            pub struct $name {
                pub properties: $props,
            }
        )+
    };
}

event_payloads! {
    EventInstallationUpdated(InstallationUpdatedProperties),
    EventLspClientDiagnostics(LspClientDiagnosticsProperties),
    EventMessageUpdated(MessageInfoProperties),
    EventMessageRemoved(MessageRemovedProperties),
    /// A part was created or grew; `delta` carries streamed text.
    EventMessagePartUpdated(PartUpdatedProperties),
    EventMessagePartRemoved(PartRemovedProperties),
    EventSessionCompacted(SessionIdProperties),
    /// A tool is waiting for the user's permission.
    EventPermissionUpdated(Permission),
    EventPermissionReplied(PermissionRepliedProperties),
    EventFileEdited(FileEditedProperties),
    EventFileWatcherUpdated(FileWatcherUpdatedProperties),
    EventTodoUpdated(TodoUpdatedProperties),
    EventSessionIdle(SessionIdProperties),
    EventSessionCreated(SessionInfoProperties),
    EventSessionUpdated(SessionInfoProperties),
    EventSessionDeleted(SessionInfoProperties),
    EventSessionError(SessionErrorProperties),
    EventServerConnected(EmptyProperties),
    EventIdeInstalled(IdeInstalledProperties),
}

json_union! {
    /// An event from the server's bus.
    pub struct Event;
    pub enum EventType;
    tag = "type";
    variants {
        InstallationUpdated("installation.updated") => as_installation_updated: EventInstallationUpdated,
        LspClientDiagnostics("lsp.client.diagnostics") => as_lsp_client_diagnostics: EventLspClientDiagnostics,
        MessageUpdated("message.updated") => as_message_updated: EventMessageUpdated,
        MessageRemoved("message.removed") => as_message_removed: EventMessageRemoved,
        MessagePartUpdated("message.part.updated") => as_message_part_updated: EventMessagePartUpdated,
        MessagePartRemoved("message.part.removed") => as_message_part_removed: EventMessagePartRemoved,
        SessionCompacted("session.compacted") => as_session_compacted: EventSessionCompacted,
        PermissionUpdated("permission.updated") => as_permission_updated: EventPermissionUpdated,
        PermissionReplied("permission.replied") => as_permission_replied: EventPermissionReplied,
        FileEdited("file.edited") => as_file_edited: EventFileEdited,
        FileWatcherUpdated("file.watcher.updated") => as_file_watcher_updated: EventFileWatcherUpdated,
        TodoUpdated("todo.updated") => as_todo_updated: EventTodoUpdated,
        SessionIdle("session.idle") => as_session_idle: EventSessionIdle,
        SessionCreated("session.created") => as_session_created: EventSessionCreated,
        SessionUpdated("session.updated") => as_session_updated: EventSessionUpdated,
        SessionDeleted("session.deleted") => as_session_deleted: EventSessionDeleted,
        SessionError("session.error") => as_session_error: EventSessionError,
        ServerConnected("server.connected") => as_server_connected: EventServerConnected,
        IdeInstalled("ide.installed") => as_ide_installed: EventIdeInstalled,
    }
}
