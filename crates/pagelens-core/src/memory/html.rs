//! HTML serialization for [`MemoryDocument`].

use pagelens_protocols::{HostDocument, NodeId};

use super::MemoryDocument;

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

pub(super) fn inner_html(doc: &MemoryDocument, node: NodeId) -> String {
    let Some(el) = doc.element(node) else {
        return String::new();
    };
    let mut out = escape_text(&el.text);
    for child in &el.children {
        out.push_str(&outer_html(doc, *child));
    }
    out
}

pub(super) fn outer_html(doc: &MemoryDocument, node: NodeId) -> String {
    if !doc.is_element(node) {
        return String::new();
    }
    let tag = doc.tag_name(node);
    let mut out = format!("<{}", tag);
    for (name, value) in doc.attributes(node) {
        out.push_str(&format!(" {}=\"{}\"", name, escape_attr(&value)));
    }
    out.push('>');
    if VOID_TAGS.contains(&tag.as_str()) {
        return out;
    }
    out.push_str(&inner_html(doc, node));
    out.push_str(&format!("</{}>", tag));
    out
}
