//! Per-node classification: visibility, role, accessible name,
//! interactivity and content-bearing flags.

mod name;
mod role;

pub use role::Role;

use pagelens_protocols::{HostDocument, NodeId};
use serde::{Deserialize, Serialize};

use name::accessible_name;
use role::{explicit_role, heading_level, implicit_role};

/// Verdict for one node. Pure data, no identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    pub interactive: bool,
    pub cursor_interactive: bool,
    pub content_bearing: bool,
}

impl ClassificationResult {
    pub fn is_landmark(&self) -> bool {
        self.role.is_landmark()
    }

    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
    }
}

/// Stateless classifier parameterized by name length and the
/// cursor-interactive pass.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    max_text_per_node: usize,
    cursor_interactive: bool,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(200, false)
    }
}

const NATIVE_CONTROLS: &[&str] = &["input", "select", "textarea", "button"];

impl Classifier {
    pub fn new(max_text_per_node: usize, cursor_interactive: bool) -> Self {
        Self {
            max_text_per_node,
            cursor_interactive,
        }
    }

    /// Visibility gate applied before classification. A node failing it is
    /// excluded together with its subtree.
    pub fn is_visible<D: HostDocument + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        if !doc.is_element(node) {
            return false;
        }
        if doc.has_attribute(node, "hidden") {
            return false;
        }
        if doc
            .attribute(node, "aria-hidden")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
        {
            return false;
        }
        let style = doc.computed_style(node);
        if style.display == "none" || style.visibility == "hidden" || style.opacity == 0.0 {
            return false;
        }
        let tag = doc.tag_name(node);
        if tag == "body" || tag == "html" {
            return true;
        }
        doc.has_layout_box(node) || style.position == "fixed"
    }

    pub fn classify<D: HostDocument + ?Sized>(&self, doc: &D, node: NodeId) -> ClassificationResult {
        let tag = doc.tag_name(node);
        let has_href = doc.has_attribute(node, "href");
        let input_type = doc.attribute(node, "type");

        let explicit = doc.attribute(node, "role").as_deref().and_then(explicit_role);
        let mut role = explicit.unwrap_or_else(|| implicit_role(&tag, has_href, input_type.as_deref()));

        let tabindex = doc
            .attribute(node, "tabindex")
            .and_then(|t| t.trim().parse::<i32>().ok());
        let has_onclick = doc.has_attribute(node, "onclick");

        let mut interactive = role.is_interactive()
            || NATIVE_CONTROLS.contains(&tag.as_str())
            || (tag == "a" && has_href)
            || tabindex.is_some_and(|t| t >= 0)
            || has_onclick;

        let mut cursor_interactive = false;
        if self.cursor_interactive && !interactive {
            if has_onclick || self.has_own_pointer_cursor(doc, node) {
                role = Role::Clickable;
                cursor_interactive = true;
            } else if tabindex.is_some() {
                role = Role::Focusable;
                cursor_interactive = true;
            }
            interactive = cursor_interactive;
        }

        let level = match role {
            Role::Heading if explicit == Some(Role::Heading) => doc
                .attribute(node, "aria-level")
                .and_then(|l| l.trim().parse::<u8>().ok())
                .or_else(|| heading_level(&tag)),
            Role::Heading => heading_level(&tag),
            _ => None,
        };

        let content_bearing = role.is_content();
        let name = if interactive || content_bearing {
            accessible_name(doc, node, role, self.max_text_per_node)
        } else {
            None
        };

        ClassificationResult {
            role,
            name,
            level,
            interactive,
            cursor_interactive,
            content_bearing,
        }
    }

    /// Pointer cursor declared on this node rather than inherited from a
    /// pointer-cursor parent.
    fn has_own_pointer_cursor<D: HostDocument + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        if doc.computed_style(node).cursor != "pointer" {
            return false;
        }
        match doc.parent(node) {
            Some(parent) => doc.computed_style(parent).cursor != "pointer",
            None => true,
        }
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
