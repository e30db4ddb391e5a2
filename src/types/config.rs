//! Server configuration and the provider catalogue.

use crate::union::{json_union, shape_union};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An MCP server started as a local process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpLocalConfig {
    /// Program and arguments.
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Milliseconds to wait for the server to list its tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// An MCP server reached over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpRemoteConfig {
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

json_union! {
    /// How to connect to one MCP server.
    pub struct ConfigMcp;
    pub enum ConfigMcpType;
    tag = "type";
    variants {
        Local("local") => as_local: McpLocalConfig,
        Remote("remote") => as_remote: McpRemoteConfig,
    }
}

shape_union! {
    /// Bash permission: one level (`ask`, `allow`, `deny`) or a level per command pattern.
    pub struct BashPermission;
    variants {
        String => as_string: String,
        Object => as_object: BTreeMap<String, String>,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigPermission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bash: Option<BashPermission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webfetch: Option<String>,
}

/// The merged configuration the server is running with.
///
/// Only the commonly used keys are modelled; the rest are ignored on decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// `provider/model`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// `manual`, `auto` or `disabled`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mcp: BTreeMap<String, ConfigMcp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<ConfigPermission>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelCost {
    pub input: f64,
    pub output: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_write: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelLimit {
    pub context: u64,
    pub output: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub attachment: bool,
    #[serde(default)]
    pub reasoning: bool,
    #[serde(default)]
    pub temperature: bool,
    #[serde(default)]
    pub tool_call: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<ModelCost>,
    #[serde(default)]
    pub limit: ModelLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub env: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm: Option<String>,
    #[serde(default)]
    pub models: BTreeMap<String, Model>,
}

/// Providers and the default model per provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigProviders {
    pub providers: Vec<Provider>,
    #[serde(default)]
    pub default: BTreeMap<String, String>,
}
