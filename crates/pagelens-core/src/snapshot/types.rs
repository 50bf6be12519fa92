//! Snapshot output types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::stats::SnapshotStats;
use crate::classify::Role;
use crate::refs::Ref;

/// One node of the labeled tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub tag: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub node_ref: Option<Ref>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    pub fn new(tag: impl Into<String>, role: Role) -> Self {
        Self {
            tag: tag.into(),
            role,
            name: None,
            text: None,
            level: None,
            node_ref: None,
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Name or text to display, whichever is present.
    pub fn label(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.text.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Number of nodes in this subtree, including self.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SnapshotNode::count).sum::<usize>()
    }

    /// Refs of this subtree in pre-order.
    pub fn refs(&self) -> Vec<Ref> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(r) = node.node_ref {
                out.push(r);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

/// Ref table entry for one addressed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefEntry {
    #[serde(rename = "ref")]
    pub node_ref: Ref,
    pub tag: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    pub interactive: bool,
    #[serde(default)]
    pub cursor_interactive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

/// One snapshot generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub url: String,
    pub title: String,
    pub stats: SnapshotStats,
    pub refs: BTreeMap<Ref, RefEntry>,
    pub tree: SnapshotNode,
}

impl Snapshot {
    pub fn entry(&self, r: Ref) -> Option<&RefEntry> {
        self.refs.get(&r)
    }

    /// Entries whose name equals `name`, in ref order.
    pub fn find_by_name(&self, name: &str) -> Vec<&RefEntry> {
        self.refs
            .values()
            .filter(|e| e.name.as_deref() == Some(name))
            .collect()
    }
}
