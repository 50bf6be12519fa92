//! Hit-test based occlusion detection for clicks.

use once_cell::sync::Lazy;
use pagelens_protocols::{is_ancestor, HostDocument, NodeId};
use regex::Regex;

use crate::error::{CommandError, ErrorCode};
use crate::text::take_chars;

static OVERLAY_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)cookie|consent|gdpr|overlay|modal|backdrop|popup|banner|dialog")
        .expect("overlay pattern is valid")
});

/// How much of an occluder's text is scanned for overlay hints.
const HINT_TEXT_LEN: usize = 200;

/// Short `tag#id.class1.class2` description of a node.
pub(crate) fn describe<D: HostDocument + ?Sized>(doc: &D, node: NodeId) -> String {
    let mut out = doc.tag_name(node);
    if let Some(id) = doc.attribute(node, "id").filter(|id| !id.is_empty()) {
        out.push('#');
        out.push_str(&id);
    }
    if let Some(class) = doc.attribute(node, "class") {
        for c in class.split_whitespace() {
            out.push('.');
            out.push_str(c);
        }
    }
    out
}

/// Whether the node's id, class or text suggests a consent banner or modal.
pub(crate) fn looks_like_overlay<D: HostDocument + ?Sized>(doc: &D, node: NodeId) -> bool {
    let id = doc.attribute(node, "id").unwrap_or_default();
    let class = doc.attribute(node, "class").unwrap_or_default();
    let text = take_chars(&doc.text_content(node), HINT_TEXT_LEN);
    [id, class, text].iter().any(|s| OVERLAY_HINT.is_match(s))
}

/// Topmost element at the target's center, if it is unrelated to the target.
/// A target without a layout rect has no center to test and is never
/// reported as covered.
pub(crate) fn occluder<D: HostDocument + ?Sized>(doc: &D, target: NodeId) -> Option<NodeId> {
    let rect = doc.bounding_rect(target);
    if rect.is_empty() {
        return None;
    }
    let (x, y) = rect.center();
    let hit = doc.element_from_point(x, y)?;
    if hit == target || is_ancestor(doc, hit, target) || is_ancestor(doc, target, hit) {
        None
    } else {
        Some(hit)
    }
}

/// `element_blocked` error naming the occluder.
pub(crate) fn blocked_error<D: HostDocument + ?Sized>(
    doc: &D,
    token: &str,
    occluder: NodeId,
) -> CommandError {
    let mut message = format!(
        "ref {} is covered by {} at its center point",
        token,
        describe(doc, occluder)
    );
    if looks_like_overlay(doc, occluder) {
        message.push_str("; this looks like an overlay or consent banner, dismiss it first");
    }
    CommandError::new(ErrorCode::ElementBlocked, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ElementSpec, MemoryDocument};

    #[test]
    fn test_describe() {
        let mut doc = MemoryDocument::new("about:blank", "");
        let body = doc.body();
        let node = doc.append(
            body,
            ElementSpec::new("div").id("cc").attr("class", "modal  open"),
        );
        assert_eq!(describe(&doc, node), "div#cc.modal.open");
        let bare = doc.append(body, ElementSpec::new("span"));
        assert_eq!(describe(&doc, bare), "span");
    }

    #[test]
    fn test_overlay_hint_matches_id_class_or_text() {
        let mut doc = MemoryDocument::new("about:blank", "");
        let body = doc.body();
        let by_class = doc.append(body, ElementSpec::new("div").attr("class", "Cookie-Wall"));
        let by_text = doc.append(body, ElementSpec::new("div").text("We value your consent"));
        let plain = doc.append(body, ElementSpec::new("div").id("sidebar").text("Links"));
        assert!(looks_like_overlay(&doc, by_class));
        assert!(looks_like_overlay(&doc, by_text));
        assert!(!looks_like_overlay(&doc, plain));
    }

    #[test]
    fn test_occluder_ignores_ancestors_and_descendants() {
        let mut doc = MemoryDocument::new("about:blank", "");
        let body = doc.body();
        let button = doc.append(body, ElementSpec::new("button").rect(0.0, 0.0, 100.0, 40.0));
        doc.append(button, ElementSpec::new("span").rect(10.0, 10.0, 80.0, 20.0));
        assert_eq!(occluder(&doc, button), None);

        let cover = doc.append(
            body,
            ElementSpec::new("div")
                .id("overlay")
                .style("position", "fixed")
                .style("z-index", "100")
                .rect(0.0, 0.0, 1280.0, 720.0),
        );
        assert_eq!(occluder(&doc, button), Some(cover));
        let err = blocked_error(&doc, "e1", cover);
        assert_eq!(err.code, ErrorCode::ElementBlocked);
        assert!(err.message.contains("div#overlay"));
        assert!(err.message.contains("dismiss"));
    }

    #[test]
    fn test_target_without_rect_is_not_occluded() {
        let mut doc = MemoryDocument::new("about:blank", "");
        let body = doc.body();
        let button = doc.append(body, ElementSpec::new("button").text("No layout"));
        doc.append(
            body,
            ElementSpec::new("div")
                .id("corner")
                .style("z-index", "10")
                .rect(0.0, 0.0, 50.0, 50.0),
        );
        assert!(doc.bounding_rect(button).is_empty());
        assert!(doc.element_from_point(0.0, 0.0).is_some_and(|hit| hit != button));
        assert_eq!(occluder(&doc, button), None);
    }
}
