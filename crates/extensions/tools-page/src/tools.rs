//! Page tools.

use async_trait::async_trait;
use pagelens_core::{ActionPayload, Envelope, PagePayload, QueryPayload};
use pagelens_protocols::{HostDocument, Tool, ToolDefinition, ToolError, ToolResult};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::session::PageSession;

fn parse_params<T: DeserializeOwned>(params: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(params).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}

fn schema_of<T: JsonSchema>() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| {
        serde_json::json!({ "type": "object" })
    })
}

/// Map an envelope onto a tool result. A failed envelope becomes an error
/// result whose message starts with the error code.
fn envelope_result<T: Serialize>(envelope: &Envelope<T>, content: impl Into<String>) -> ToolResult {
    let value = envelope.to_value();
    match &envelope.error {
        Some(err) => ToolResult::error(format!("{}: {}", err.code, err.message))
            .with_structured_output(value),
        None => ToolResult::success_json(content, value),
    }
}

fn body_json<T: Serialize>(envelope: &Envelope<T>) -> String {
    serde_json::to_string(&envelope.body).unwrap_or_default()
}

// ============================================================================
// Snapshot Tool
// ============================================================================

/// Budgets left unset fall back to the session settings.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SnapshotParams {
    /// Only interactive nodes and named content (default true).
    #[serde(default)]
    pub interactive_only: Option<bool>,
    /// Treat `cursor: pointer` elements as interactive.
    #[serde(default)]
    pub cursor_interactive: Option<bool>,
    /// CSS selector for the snapshot root.
    #[serde(default)]
    pub scope: Option<String>,
    /// Maximum DOM nodes visited.
    #[serde(default)]
    pub max_nodes: Option<usize>,
    /// Maximum characters of text kept per node.
    #[serde(default)]
    pub max_text_per_node: Option<usize>,
    /// Maximum length of each attribute value.
    #[serde(default)]
    pub max_attr_value_len: Option<usize>,
    /// Maximum nodes printed in the outline.
    #[serde(default)]
    pub max_rendered_nodes: Option<usize>,
    /// Maximum characters in the rendered outline.
    #[serde(default)]
    pub max_chars: Option<usize>,
    /// Maximum outline depth.
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Drop structural nodes with nothing to show (default true).
    #[serde(default)]
    pub compact: Option<bool>,
}

pub struct PageSnapshotTool<D> {
    definition: ToolDefinition,
    session: PageSession<D>,
}

impl<D: HostDocument + Send + 'static> PageSnapshotTool<D> {
    pub fn new(session: PageSession<D>) -> Self {
        let definition = ToolDefinition::new(
            "page_snapshot",
            "Page Snapshot",
            "Capture the page as a compact outline. Interactive elements carry refs like e12 \
             for use with page_act and page_query. Refs from older snapshots stop working.",
        )
        .with_parameters_schema(schema_of::<SnapshotParams>());
        Self {
            definition,
            session,
        }
    }
}

#[async_trait]
impl<D: HostDocument + Send + 'static> Tool for PageSnapshotTool<D> {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let params: SnapshotParams = parse_params(params)?;
        let settings = self.session.settings();

        let mut options = settings.snapshot.clone();
        if let Some(v) = params.interactive_only {
            options.interactive_only = v;
        }
        if let Some(v) = params.cursor_interactive {
            options.cursor_interactive = v;
        }
        if let Some(scope) = params.scope {
            options.scope = Some(scope);
        }
        if let Some(v) = params.max_nodes {
            options.max_nodes = v;
        }
        if let Some(v) = params.max_text_per_node {
            options.max_text_per_node = v;
        }
        if let Some(v) = params.max_attr_value_len {
            options.max_attr_value_len = v;
        }
        let mut render_options = settings.render.clone();
        if let Some(v) = params.max_rendered_nodes {
            render_options.max_nodes = v;
        }
        if let Some(v) = params.max_chars {
            render_options.max_chars_total = v;
        }
        if let Some(v) = params.max_depth {
            render_options.max_depth = v;
        }
        if let Some(v) = params.compact {
            render_options.compact = v;
        }

        let (envelope, rendered) = self.session.snapshot(options, render_options).await?;
        let text = rendered.map(|r| r.text).unwrap_or_default();
        debug!(refs = envelope.body.refs.len(), chars = text.len(), "page_snapshot");
        Ok(envelope_result(&envelope, text)
            .with_metadata("refs", serde_json::json!(envelope.body.refs.len())))
    }
}

// ============================================================================
// Act Tool
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ActParams {
    /// Ref from the latest snapshot, e.g. "e12".
    #[serde(rename = "ref")]
    pub node_ref: String,
    /// click, dblclick, fill, type, select, clear, focus, hover, scroll_into_view,
    /// check or uncheck.
    pub action: String,
    /// Text for fill, or the option for select.
    #[serde(default)]
    pub value: Option<String>,
    /// Options for a multi-select.
    #[serde(default)]
    pub values: Option<Vec<String>>,
    /// Text typed character by character by type.
    #[serde(default)]
    pub text: Option<String>,
}

pub struct PageActTool<D> {
    definition: ToolDefinition,
    session: PageSession<D>,
}

impl<D: HostDocument + Send + 'static> PageActTool<D> {
    pub fn new(session: PageSession<D>) -> Self {
        let definition = ToolDefinition::new(
            "page_act",
            "Page Act",
            "Perform an action on an element by ref. On ref_not_found take a new snapshot; \
             on element_blocked dismiss the covering element first.",
        )
        .with_parameters_schema(schema_of::<ActParams>());
        Self {
            definition,
            session,
        }
    }
}

#[async_trait]
impl<D: HostDocument + Send + 'static> Tool for PageActTool<D> {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let params: ActParams = parse_params(params)?;
        let payload = ActionPayload {
            value: params.value,
            values: params.values,
            text: params.text,
        };
        let envelope = self
            .session
            .act_raw(params.node_ref, params.action, payload)
            .await?;
        Ok(envelope_result(&envelope, body_json(&envelope)))
    }
}

// ============================================================================
// Query Tool
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryParams {
    /// Ref from the latest snapshot.
    #[serde(rename = "ref")]
    pub node_ref: String,
    /// text, attrs, value, html, outerHTML, computed_styles, isvisible, isenabled or ischecked.
    pub kind: String,
    /// Maximum characters returned.
    #[serde(default)]
    pub limit_chars: Option<usize>,
}

pub struct PageQueryTool<D> {
    definition: ToolDefinition,
    session: PageSession<D>,
}

impl<D: HostDocument + Send + 'static> PageQueryTool<D> {
    pub fn new(session: PageSession<D>) -> Self {
        let definition = ToolDefinition::new(
            "page_query",
            "Page Query",
            "Read text, attributes, value, markup, styles or state of an element by ref.",
        )
        .with_parameters_schema(schema_of::<QueryParams>());
        Self {
            definition,
            session,
        }
    }
}

#[async_trait]
impl<D: HostDocument + Send + 'static> Tool for PageQueryTool<D> {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let params: QueryParams = parse_params(params)?;
        let payload = params
            .limit_chars
            .map(QueryPayload::with_limit)
            .unwrap_or_else(|| self.session.settings().query.clone());
        let envelope = self
            .session
            .query_raw(params.node_ref, params.kind, payload)
            .await?;
        let content = envelope.body.value.clone().unwrap_or_default();
        Ok(envelope_result(&envelope, content))
    }
}

// ============================================================================
// Control Tool
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ControlParams {
    /// info, scroll, pressKey, keyDown, keyUp, char, wait, open, back, forward or reload.
    pub kind: String,
    /// Absolute scroll target.
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    /// Relative scroll, used when x and y are unset.
    #[serde(default)]
    pub delta_x: Option<f64>,
    #[serde(default)]
    pub delta_y: Option<f64>,
    /// Key name for pressKey, keyDown and keyUp.
    #[serde(default)]
    pub key: Option<String>,
    /// Text typed by char; page text awaited by wait.
    #[serde(default)]
    pub text: Option<String>,
    /// Target of open; URL substring awaited by wait.
    #[serde(default)]
    pub url: Option<String>,
    /// CSS selector awaited by wait.
    #[serde(default)]
    pub selector: Option<String>,
    /// Fixed wait in milliseconds; overrides every condition.
    #[serde(default)]
    pub ms: Option<u64>,
    /// How long wait polls before giving up (default 5000).
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Interval between wait checks (default 100).
    #[serde(default)]
    pub poll_ms: Option<u64>,
}

impl ControlParams {
    fn payload(&self) -> PagePayload {
        PagePayload {
            x: self.x,
            y: self.y,
            delta_x: self.delta_x,
            delta_y: self.delta_y,
            behavior: None,
            key: self.key.clone(),
            text: self.text.clone(),
            url: self.url.clone(),
            selector: self.selector.clone(),
            ms: self.ms,
            timeout_ms: self.timeout_ms,
            poll_ms: self.poll_ms,
        }
    }
}

pub struct PageControlTool<D> {
    definition: ToolDefinition,
    session: PageSession<D>,
}

impl<D: HostDocument + Send + 'static> PageControlTool<D> {
    pub fn new(session: PageSession<D>) -> Self {
        let definition = ToolDefinition::new(
            "page_control",
            "Page Control",
            "Document-level operations that need no ref: info, scroll, pressKey, keyDown, keyUp, \
             char, wait, open, back, forward, reload. Navigation invalidates every ref.",
        )
        .with_parameters_schema(schema_of::<ControlParams>());
        Self {
            definition,
            session,
        }
    }
}

#[async_trait]
impl<D: HostDocument + Send + 'static> Tool for PageControlTool<D> {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, ToolError> {
        let params: ControlParams = parse_params(params)?;
        if params.kind == "open" && params.url.as_deref().is_none_or(|u| u.trim().is_empty()) {
            return Err(ToolError::InvalidParameters("open requires url".to_string()));
        }
        let payload = params.payload();
        let envelope = self.session.page_raw(params.kind, payload).await?;
        Ok(envelope_result(&envelope, body_json(&envelope)))
    }
}

#[cfg(test)]
#[path = "tools_tests.rs"]
mod tests;
