//! Bounded snapshot walk.
//!
//! [`SnapshotBuilder::build`] walks the host tree depth-first in pre-order,
//! classifies every visible node, splices uninteresting nodes out of the
//! labeled tree and assigns refs to the addressable ones. The builder owns
//! the [`RefAllocator`], so each build replaces the previous generation.

mod stats;
mod types;

pub use stats::{SnapshotStats, TruncateReason, TruncateReasons};
pub use types::{RefEntry, Snapshot, SnapshotNode};

use std::collections::BTreeMap;
use std::time::Instant;

use pagelens_protocols::{HostDocument, NodeId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::{ClassificationResult, Classifier, Role};
use crate::error::{CommandError, ErrorCode};
use crate::refs::{Ref, RefAllocator};
use crate::text::clamp;

/// Attributes copied onto ref'd nodes.
pub const ATTR_WHITELIST: &[&str] = &[
    "href",
    "name",
    "type",
    "value",
    "placeholder",
    "aria-label",
    "role",
    "alt",
    "src",
    "action",
    "method",
    "title",
];

pub const DEFAULT_MAX_NODES: usize = 500;
pub const DEFAULT_MAX_TEXT_PER_NODE: usize = 200;
pub const DEFAULT_MAX_ATTR_VALUE_LEN: usize = 150;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotOptions {
    pub max_nodes: usize,
    pub max_text_per_node: usize,
    pub max_attr_value_len: usize,
    pub interactive_only: bool,
    pub cursor_interactive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            max_text_per_node: DEFAULT_MAX_TEXT_PER_NODE,
            max_attr_value_len: DEFAULT_MAX_ATTR_VALUE_LEN,
            interactive_only: true,
            cursor_interactive: false,
            scope: None,
        }
    }
}

impl SnapshotOptions {
    /// Replace zero budgets with their defaults and drop a blank scope.
    pub fn sanitized(&self) -> Self {
        let or_default = |value: usize, default: usize| if value == 0 { default } else { value };
        Self {
            max_nodes: or_default(self.max_nodes, DEFAULT_MAX_NODES),
            max_text_per_node: or_default(self.max_text_per_node, DEFAULT_MAX_TEXT_PER_NODE),
            max_attr_value_len: or_default(self.max_attr_value_len, DEFAULT_MAX_ATTR_VALUE_LEN),
            interactive_only: self.interactive_only,
            cursor_interactive: self.cursor_interactive,
            scope: self
                .scope
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_interactive_only(mut self, interactive_only: bool) -> Self {
        self.interactive_only = interactive_only;
        self
    }

    pub fn with_cursor_interactive(mut self, cursor_interactive: bool) -> Self {
        self.cursor_interactive = cursor_interactive;
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

/// Builds snapshots and owns the current ref generation.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    refs: RefAllocator,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a new generation. Fails only when the root cannot be resolved.
    pub fn build<D: HostDocument + ?Sized>(
        &mut self,
        doc: &D,
        options: &SnapshotOptions,
    ) -> Result<Snapshot, CommandError> {
        let started = Instant::now();
        let options = options.sanitized();
        self.refs.reset(doc);

        let root = resolve_root(doc, options.scope.as_deref())?;
        let mut walk = Walk {
            doc,
            classifier: Classifier::new(options.max_text_per_node, options.cursor_interactive),
            options: &options,
            refs: &mut self.refs,
            table: BTreeMap::new(),
            stats: SnapshotStats {
                dom_nodes: count_elements(doc, root),
                ..Default::default()
            },
            stopped: false,
        };
        let tree = walk.root(root);
        let Walk {
            table, mut stats, ..
        } = walk;
        stats.elapsed_ms = started.elapsed().as_millis() as u64;

        info!(
            generation = self.refs.generation(),
            visited = stats.visited,
            emitted = stats.emitted,
            refs = table.len(),
            skipped_hidden = stats.skipped_hidden,
            truncated = stats.truncated(),
            elapsed_ms = stats.elapsed_ms,
            "Snapshot built"
        );

        Ok(Snapshot {
            url: doc.url(),
            title: doc.title(),
            stats,
            refs: table,
            tree,
        })
    }

    /// Resolve a ref of the current generation to a live node.
    pub fn resolve<D: HostDocument + ?Sized>(&self, r: Ref, doc: &D) -> Result<NodeId, CommandError> {
        self.refs.resolve(r, doc)
    }

    pub fn resolve_str<D: HostDocument + ?Sized>(
        &self,
        token: &str,
        doc: &D,
    ) -> Result<NodeId, CommandError> {
        self.refs.resolve_str(token, doc)
    }

    pub fn refs(&self) -> &RefAllocator {
        &self.refs
    }
}

fn resolve_root<D: HostDocument + ?Sized>(
    doc: &D,
    scope: Option<&str>,
) -> Result<NodeId, CommandError> {
    match scope {
        Some(selector) => match doc.query_selector(selector) {
            Ok(Some(node)) => Ok(node),
            Ok(None) => Err(CommandError::new(
                ErrorCode::NoRoot,
                format!("scope {} matched nothing", selector),
            )),
            Err(e) => Err(CommandError::new(ErrorCode::NoRoot, e.to_string())),
        },
        None => doc
            .document_root()
            .ok_or_else(|| CommandError::new(ErrorCode::NoRoot, "document has no root")),
    }
}

fn count_elements<D: HostDocument + ?Sized>(doc: &D, root: NodeId) -> usize {
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if doc.is_element(node) {
            count += 1;
        }
        stack.extend(doc.children(node));
    }
    count
}

struct Walk<'a, D: HostDocument + ?Sized> {
    doc: &'a D,
    classifier: Classifier,
    options: &'a SnapshotOptions,
    refs: &'a mut RefAllocator,
    table: BTreeMap<Ref, RefEntry>,
    stats: SnapshotStats,
    stopped: bool,
}

impl<D: HostDocument + ?Sized> Walk<'_, D> {
    /// The root is always present, even when hidden or excluded.
    fn root(&mut self, node: NodeId) -> SnapshotNode {
        let tag = self.doc.tag_name(node);
        if !self.classifier.is_visible(self.doc, node) {
            self.stats.skipped_hidden += 1;
            return SnapshotNode::new(tag, Role::Generic);
        }
        self.stats.visited += 1;
        let class = self.classifier.classify(self.doc, node);
        if self.is_included(&class) {
            return self.emit(node, tag, class);
        }
        let mut bare = SnapshotNode::new(tag, class.role);
        bare.children = self.children(node);
        bare
    }

    fn visit(&mut self, node: NodeId) -> Vec<SnapshotNode> {
        if self.stopped {
            return Vec::new();
        }
        if !self.classifier.is_visible(self.doc, node) {
            self.stats.skipped_hidden += 1;
            return Vec::new();
        }
        if self.stats.visited >= self.options.max_nodes {
            debug!(visited = self.stats.visited, "Node budget reached");
            self.stats.truncate_reasons.insert(TruncateReason::MaxNodes);
            self.stopped = true;
            return Vec::new();
        }
        self.stats.visited += 1;

        let class = self.classifier.classify(self.doc, node);
        if self.is_included(&class) {
            let tag = self.doc.tag_name(node);
            vec![self.emit(node, tag, class)]
        } else {
            self.children(node)
        }
    }

    fn children(&mut self, node: NodeId) -> Vec<SnapshotNode> {
        let mut out = Vec::new();
        for child in self.doc.children(node) {
            if self.stopped {
                break;
            }
            out.extend(self.visit(child));
        }
        out
    }

    fn is_included(&self, class: &ClassificationResult) -> bool {
        if class.interactive {
            return true;
        }
        if self.options.interactive_only {
            class.content_bearing && class.has_name()
        } else {
            class.content_bearing || class.is_landmark()
        }
    }

    /// Emit an included node; the ref is allocated before its children are
    /// walked so numbering follows pre-order.
    fn emit(&mut self, node: NodeId, tag: String, class: ClassificationResult) -> SnapshotNode {
        self.stats.emitted += 1;
        let mut out = SnapshotNode::new(tag.clone(), class.role);
        out.name = class.name.clone();
        out.level = class.level;
        if class.content_bearing && !self.options.interactive_only {
            out.text = class.name.clone();
        }

        if class.interactive || class.content_bearing {
            let r = self.refs.allocate(node);
            let attrs = self.whitelisted_attrs(node);
            out.node_ref = Some(r);
            out.attrs = attrs.clone();
            self.table.insert(
                r,
                RefEntry {
                    node_ref: r,
                    tag,
                    role: class.role,
                    name: class.name,
                    attrs,
                    interactive: class.interactive,
                    cursor_interactive: class.cursor_interactive,
                    level: class.level,
                },
            );
        }

        out.children = self.children(node);
        out
    }

    fn whitelisted_attrs(&self, node: NodeId) -> BTreeMap<String, String> {
        ATTR_WHITELIST
            .iter()
            .filter_map(|name| {
                self.doc
                    .attribute(node, name)
                    .map(|value| (name.to_string(), clamp(&value, self.options.max_attr_value_len)))
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
