//! 类型模块：opencode 服务端的数据模型与判别联合类型。
//!
//! # Types Module
//!
//! Plain response structs plus the tagged unions the server emits. Unions are raw-JSON
//! backed (see [`crate::union`]): decoding one never fails on a variant-specific shape
//! problem, and the typed `as_*` accessors decode on demand.
//!
//! | Union | Discriminator | Variants |
//! |-------|---------------|----------|
//! | [`Event`] | `type` | 19 bus events |
//! | [`Message`] | `role` | user, assistant |
//! | [`Part`] | `type` | text, reasoning, file, tool, step-start, step-finish, snapshot, patch, agent, retry |
//! | [`ToolPartState`] | `status` | pending, running, completed, error |
//! | [`FilePartSource`] | `type` | file, symbol |
//! | [`PartInput`] | `type` | text, file, agent |
//! | [`SessionError`], [`AssistantMessageError`] | `name` | five error payloads |
//! | [`SessionStatus`] | `type` | idle, busy, retry |
//! | [`Auth`] | `type` | oauth, api, wellknown |
//! | [`ConfigMcp`] | `type` | local, remote |
//! | [`PermissionPattern`] | JSON shape | string, array |
//! | [`BashPermission`] | JSON shape | string, object |

pub mod app;
pub mod auth;
pub mod config;
pub mod errors;
pub mod event;
pub mod file;
pub mod message;
pub mod part;
pub mod permission;
pub mod session;

pub use app::{Agent, AgentModel, Command, Path, Project, ProjectTime, ToolListItem};
pub use auth::{ApiAuth, Auth, AuthType, OAuth, WellKnownAuth};
pub use config::{
    BashPermission, Config, ConfigMcp, ConfigMcpType, ConfigPermission, ConfigProviders,
    McpLocalConfig, McpRemoteConfig, Model, ModelCost, ModelLimit, Provider,
};
pub use errors::{
    AssistantMessageError, AssistantMessageErrorName, ErrorMessage, MessageAbortedError,
    MessageOutputLengthError, ProviderApiError, ProviderApiErrorData, ProviderAuthError,
    ProviderAuthErrorData, SessionError, SessionErrorName, UnknownError,
};
pub use event::*;
pub use file::{
    File, FileContent, FileNode, FileNodeType, FileStatus, FindMatch, Position, Range, Symbol,
    Submatch, SymbolLocation, TextSpan,
};
pub use message::{
    AssistantMessage, CacheTokens, Message, MessagePath, MessageRole, MessageTime,
    MessageWithParts, ModelRef, TokenUsage, UserMessage,
};
pub use part::{
    AgentPart, AgentPartInput, AgentSource, FilePart, FilePartInput, FilePartSource,
    FilePartSourceText, FilePartSourceType, FileSource, Part, PartInput, PartInputType,
    PartTime, PartType, PatchPart, ReasoningPart, RetryPart, RetryTime, SnapshotPart, StepFinishPart,
    StepStartPart, SymbolSource, TextPart, TextPartInput, ToolPart, ToolPartState,
    ToolStateCompleted, ToolStateError, ToolStatePending, ToolStateRunning, ToolStateTime,
    ToolStatus,
};
pub use permission::{Permission, PermissionPattern, PermissionResponse, PermissionTime};
pub use session::{
    Session, SessionBusy, SessionIdle, SessionRetry, SessionRevert, SessionShare,
    SessionStatus, SessionStatusType, SessionTime, Todo,
};
