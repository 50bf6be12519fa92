//! Accessible name resolution.

use pagelens_protocols::{HostDocument, NodeId};

use super::role::{is_button_input, Role};
use crate::text::{clamp, collapse_whitespace};

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| collapse_whitespace(&v))
        .filter(|v| !v.is_empty())
}

fn labelled_by<D: HostDocument + ?Sized>(doc: &D, node: NodeId) -> Option<String> {
    let ids = doc.attribute(node, "aria-labelledby")?;
    let parts: Vec<String> = ids
        .split_whitespace()
        .filter_map(|id| doc.element_by_id(id))
        .map(|target| doc.text_content(target))
        .filter(|text| !text.trim().is_empty())
        .collect();
    Some(parts.join(" "))
}

fn role_fallback<D: HostDocument + ?Sized>(doc: &D, node: NodeId, role: Role) -> Option<String> {
    match role {
        Role::Img => doc.attribute(node, "alt"),
        Role::Textbox | Role::Searchbox => doc.attribute(node, "placeholder"),
        _ => {
            let input_type = doc.attribute(node, "type").unwrap_or_default();
            (doc.tag_name(node) == "input" && is_button_input(&input_type))
                .then(|| doc.attribute(node, "value"))
                .flatten()
        }
    }
}

/// Resolve the accessible name of `node`, clamped to `max_len` characters.
pub(crate) fn accessible_name<D: HostDocument + ?Sized>(
    doc: &D,
    node: NodeId,
    role: Role,
    max_len: usize,
) -> Option<String> {
    non_empty(doc.attribute(node, "aria-label"))
        .or_else(|| non_empty(labelled_by(doc, node)))
        .or_else(|| non_empty(role_fallback(doc, node, role)))
        .or_else(|| non_empty(doc.attribute(node, "title")))
        .or_else(|| non_empty(Some(doc.text_content(node))))
        .map(|name| clamp(&name, max_len))
}
