//! Text outline renderer.
//!
//! Rendering runs in two passes: a bottom-up pass marks which subtrees carry
//! visible content (a ref or a label), then a top-down pass emits lines under
//! the character, depth and node budgets. The header line depends on the
//! final truncation state, so it is rebuilt after the body and spliced in as
//! the first line.

use serde::{Deserialize, Serialize};

use crate::snapshot::{Snapshot, SnapshotNode, SnapshotStats, TruncateReason, TruncateReasons};
use crate::text::{char_len, clamp, take_chars};

pub const DEFAULT_MAX_CHARS_TOTAL: usize = 12_000;
pub const DEFAULT_RENDER_MAX_NODES: usize = 200;
pub const DEFAULT_MAX_DEPTH: usize = 12;

const URL_LEN: usize = 32;
const TITLE_LEN: usize = 24;
const ATTR_LEN: usize = 24;

/// Attributes shown on leaf lines, in display order.
const LEAF_ATTRS: &[&str] = &["href", "type", "placeholder", "value", "name", "aria-label"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub max_chars_total: usize,
    pub max_nodes: usize,
    pub max_depth: usize,
    pub compact: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_chars_total: DEFAULT_MAX_CHARS_TOTAL,
            max_nodes: DEFAULT_RENDER_MAX_NODES,
            max_depth: DEFAULT_MAX_DEPTH,
            compact: true,
        }
    }
}

impl RenderOptions {
    /// Replace zero budgets with their defaults.
    pub fn sanitized(&self) -> Self {
        let or_default = |value: usize, default: usize| if value == 0 { default } else { value };
        Self {
            max_chars_total: or_default(self.max_chars_total, DEFAULT_MAX_CHARS_TOTAL),
            max_nodes: or_default(self.max_nodes, DEFAULT_RENDER_MAX_NODES),
            max_depth: or_default(self.max_depth, DEFAULT_MAX_DEPTH),
            compact: self.compact,
        }
    }

    pub fn with_max_chars_total(mut self, max_chars_total: usize) -> Self {
        self.max_chars_total = max_chars_total;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    pub text: String,
    pub truncated: bool,
    pub truncate_reasons: TruncateReasons,
    pub nodes_rendered: usize,
}

/// Render a built snapshot.
pub fn render(snapshot: &Snapshot, options: &RenderOptions) -> RenderResult {
    render_parts(
        Some(&snapshot.url),
        Some(&snapshot.title),
        &snapshot.stats.truncate_reasons,
        Some(&snapshot.tree),
        options,
    )
}

#[derive(Deserialize)]
struct MetaInput {
    url: Option<String>,
    title: Option<String>,
}

/// The parts of a serialized snapshot envelope the renderer needs.
#[derive(Deserialize)]
struct SnapshotInput {
    meta: Option<MetaInput>,
    url: Option<String>,
    title: Option<String>,
    stats: Option<SnapshotStats>,
    tree: Option<SnapshotNode>,
}

/// Render a snapshot transported as JSON (a snapshot envelope or a bare
/// snapshot).
pub fn render_json(json: &str, options: &RenderOptions) -> Result<RenderResult, serde_json::Error> {
    let input: SnapshotInput = serde_json::from_str(json)?;
    let url = input
        .url
        .or_else(|| input.meta.as_ref().and_then(|m| m.url.clone()));
    let title = input
        .title
        .or_else(|| input.meta.as_ref().and_then(|m| m.title.clone()));
    let reasons = input.stats.map(|s| s.truncate_reasons).unwrap_or_default();
    Ok(render_parts(
        url.as_deref(),
        title.as_deref(),
        &reasons,
        input.tree.as_ref(),
        options,
    ))
}

fn render_parts(
    url: Option<&str>,
    title: Option<&str>,
    build_reasons: &TruncateReasons,
    tree: Option<&SnapshotNode>,
    options: &RenderOptions,
) -> RenderResult {
    let options = options.sanitized();
    let mut emitter = Emitter::new(&options, build_reasons.clone());

    // Reserve the first line; it is replaced once the body is final.
    let placeholder = header(url, title, 0, &emitter.reasons);
    emitter.push_line(&placeholder);
    if let Some(tree) = tree {
        let annotated = Annotated::new(tree);
        emitter.emit(&annotated, 0);
    }

    let max = options.max_chars_total;
    let body = emitter
        .out
        .split_once('\n')
        .map(|(_, rest)| rest.to_string())
        .unwrap_or_default();
    let mut text = splice(&header(url, title, emitter.nodes_rendered, &emitter.reasons), &body);
    if char_len(&text) > max {
        emitter.reasons.insert(TruncateReason::MaxCharsTotal);
        text = splice(&header(url, title, emitter.nodes_rendered, &emitter.reasons), &body);
        text = take_chars(&text, max);
    }

    RenderResult {
        text,
        truncated: !emitter.reasons.is_empty(),
        truncate_reasons: emitter.reasons,
        nodes_rendered: emitter.nodes_rendered,
    }
}

fn splice(header: &str, body: &str) -> String {
    if body.is_empty() {
        header.to_string()
    } else {
        format!("{}\n{}", header, body)
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('"', "\\\"")
}

fn header(
    url: Option<&str>,
    title: Option<&str>,
    nodes: usize,
    reasons: &TruncateReasons,
) -> String {
    let mut line = String::from("[snapshot]");
    if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
        line.push_str(&format!(" url={}", clamp(url, URL_LEN)));
    }
    if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
        line.push_str(&format!(" title=\"{}\"", escape_quotes(&clamp(title, TITLE_LEN))));
    }
    let joined = reasons
        .iter()
        .map(|r| format!("\"{}\"", r.as_str()))
        .collect::<Vec<_>>()
        .join(",");
    line.push_str(&format!(
        " nodes={} truncated={} truncateReasons=[{}]",
        nodes,
        !reasons.is_empty(),
        joined
    ));
    line
}

/// Snapshot node plus its "has visible content" mark.
struct Annotated<'a> {
    node: &'a SnapshotNode,
    has_content: bool,
    children: Vec<Annotated<'a>>,
}

impl<'a> Annotated<'a> {
    fn new(node: &'a SnapshotNode) -> Self {
        let children: Vec<Annotated<'a>> = node.children.iter().map(Annotated::new).collect();
        let own = node.node_ref.is_some() || node.label().is_some();
        Self {
            node,
            has_content: own || children.iter().any(|c| c.has_content),
            children,
        }
    }
}

struct Emitter<'a> {
    options: &'a RenderOptions,
    out: String,
    out_chars: usize,
    reasons: TruncateReasons,
    nodes_rendered: usize,
    stopped: bool,
}

impl<'a> Emitter<'a> {
    fn new(options: &'a RenderOptions, reasons: TruncateReasons) -> Self {
        Self {
            options,
            out: String::new(),
            out_chars: 0,
            reasons,
            nodes_rendered: 0,
            stopped: false,
        }
    }

    fn stop(&mut self, reason: TruncateReason) {
        self.reasons.insert(reason);
        self.stopped = true;
    }

    fn emit(&mut self, annotated: &Annotated<'_>, depth: usize) {
        if self.stopped {
            return;
        }
        if self.options.compact && !annotated.has_content {
            return;
        }
        let node = annotated.node;
        let indent = "  ".repeat(depth);
        let line = if node.children.is_empty() {
            if node.node_ref.is_none() && node.label().is_none() {
                return;
            }
            leaf_line(&indent, node)
        } else {
            structural_line(&indent, node)
        };

        if depth > self.options.max_depth {
            self.stop(TruncateReason::MaxDepth);
            return;
        }
        if self.nodes_rendered >= self.options.max_nodes {
            self.stop(TruncateReason::MaxNodes);
            return;
        }
        if !self.push_line(&line) {
            return;
        }
        self.nodes_rendered += 1;

        for child in &annotated.children {
            self.emit(child, depth + 1);
            if self.stopped {
                break;
            }
        }
    }

    /// Append one line within the character budget. An overflowing line is
    /// appended partially and stops emission.
    fn push_line(&mut self, line: &str) -> bool {
        if self.stopped {
            return false;
        }
        let max = self.options.max_chars_total;
        if !self.out.is_empty() {
            if self.out_chars + 1 >= max {
                self.stop(TruncateReason::MaxCharsTotal);
                return false;
            }
            self.out.push('\n');
            self.out_chars += 1;
        }
        let remaining = max - self.out_chars;
        let len = char_len(line);
        if len <= remaining {
            self.out.push_str(line);
            self.out_chars += len;
            true
        } else {
            self.out.push_str(&take_chars(line, remaining));
            self.out_chars += remaining;
            self.stop(TruncateReason::MaxCharsTotal);
            false
        }
    }
}

fn label_part(node: &SnapshotNode) -> String {
    let mut part = String::new();
    if let Some(label) = node.label() {
        part.push_str(&format!(" \"{}\"", escape_quotes(label.trim())));
    }
    if let Some(level) = node.level {
        part.push_str(&format!(" [level={}]", level));
    }
    part
}

fn ref_part(node: &SnapshotNode) -> String {
    node.node_ref
        .map(|r| format!(" [ref={}]", r))
        .unwrap_or_default()
}

fn structural_line(indent: &str, node: &SnapshotNode) -> String {
    format!(
        "{}- {}{}{}:",
        indent,
        node.role,
        label_part(node),
        ref_part(node)
    )
}

fn leaf_line(indent: &str, node: &SnapshotNode) -> String {
    let attrs: Vec<String> = LEAF_ATTRS
        .iter()
        .filter_map(|key| {
            let value = node.attrs.get(*key)?.trim();
            (!value.is_empty())
                .then(|| format!("{}=\"{}\"", key, escape_quotes(&clamp(value, ATTR_LEN))))
        })
        .collect();
    let attrs = if attrs.is_empty() {
        String::new()
    } else {
        format!(" ({})", attrs.join(" "))
    };
    format!(
        "{}- {}{}{}{}",
        indent,
        node.role,
        label_part(node),
        attrs,
        ref_part(node)
    )
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
