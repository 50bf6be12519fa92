//! Configuration schema definitions.

use std::time::Duration;

use pagelens_core::dispatch::DEFAULT_LIMIT_CHARS;
use pagelens_core::render::{DEFAULT_MAX_CHARS_TOTAL, DEFAULT_MAX_DEPTH, DEFAULT_RENDER_MAX_NODES};
use pagelens_core::snapshot::{DEFAULT_MAX_ATTR_VALUE_LEN, DEFAULT_MAX_NODES, DEFAULT_MAX_TEXT_PER_NODE};
use pagelens_core::{QueryPayload, RenderOptions, SnapshotOptions};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

/// Snapshot walk budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_snapshot_max_nodes")]
    pub max_nodes: usize,

    #[serde(default = "default_max_text_per_node")]
    pub max_text_per_node: usize,

    #[serde(default = "default_max_attr_value_len")]
    pub max_attr_value_len: usize,

    #[serde(default = "default_true")]
    pub interactive_only: bool,

    #[serde(default)]
    pub cursor_interactive: bool,

    /// Selector for the snapshot root. Unset means the document body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

fn default_snapshot_max_nodes() -> usize {
    DEFAULT_MAX_NODES
}

fn default_max_text_per_node() -> usize {
    DEFAULT_MAX_TEXT_PER_NODE
}

fn default_max_attr_value_len() -> usize {
    DEFAULT_MAX_ATTR_VALUE_LEN
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            max_nodes: default_snapshot_max_nodes(),
            max_text_per_node: default_max_text_per_node(),
            max_attr_value_len: default_max_attr_value_len(),
            interactive_only: true,
            cursor_interactive: false,
            scope: None,
        }
    }
}

impl SnapshotConfig {
    pub fn to_options(&self) -> SnapshotOptions {
        SnapshotOptions {
            max_nodes: self.max_nodes,
            max_text_per_node: self.max_text_per_node,
            max_attr_value_len: self.max_attr_value_len,
            interactive_only: self.interactive_only,
            cursor_interactive: self.cursor_interactive,
            scope: self.scope.clone(),
        }
    }
}

/// Text renderer budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_max_chars_total")]
    pub max_chars_total: usize,

    #[serde(default = "default_render_max_nodes")]
    pub max_nodes: usize,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_true")]
    pub compact: bool,
}

fn default_max_chars_total() -> usize {
    DEFAULT_MAX_CHARS_TOTAL
}

fn default_render_max_nodes() -> usize {
    DEFAULT_RENDER_MAX_NODES
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_chars_total: default_max_chars_total(),
            max_nodes: default_render_max_nodes(),
            max_depth: default_max_depth(),
            compact: true,
        }
    }
}

impl RenderConfig {
    pub fn to_options(&self) -> RenderOptions {
        RenderOptions {
            max_chars_total: self.max_chars_total,
            max_nodes: self.max_nodes,
            max_depth: self.max_depth,
            compact: self.compact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_limit_chars")]
    pub limit_chars: usize,
}

fn default_limit_chars() -> usize {
    DEFAULT_LIMIT_CHARS
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            limit_chars: default_limit_chars(),
        }
    }
}

impl QueryConfig {
    pub fn to_payload(&self) -> QueryPayload {
        QueryPayload::with_limit(self.limit_chars)
    }
}

/// Session layer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Call-site timeout for a single snapshot or command.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
