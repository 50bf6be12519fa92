//! Tree Adapter protocol.
//!
//! A [`HostDocument`] is the live document the snapshot and command layers
//! read from and act upon. Hosts expose their nodes as opaque [`NodeId`]
//! handles; how those map onto the real tree is up to the host.

mod event;
mod types;

pub use event::*;
pub use types::*;

use crate::error::HostError;

/// Read/write access to a hosted document.
///
/// All calls are synchronous and run inside the host's single execution
/// context. Read accessors are infallible and return empty values for
/// unknown nodes; mutating primitives report failures as [`HostError`].
pub trait HostDocument {
    // Document-level state.

    /// Current document URL.
    fn url(&self) -> String;

    /// Current document title.
    fn title(&self) -> String;

    /// Counter bumped on every navigation. Refs captured under an older
    /// epoch are stale.
    fn navigation_epoch(&self) -> u64;

    /// Default snapshot root (the document body).
    fn document_root(&self) -> Option<NodeId>;

    /// First element in document order matching `selector`.
    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, HostError>;

    /// Element whose `id` attribute equals `id`.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Whether `node` is still attached to the current document.
    fn is_connected(&self, node: NodeId) -> bool;

    // Node introspection.

    fn is_element(&self, node: NodeId) -> bool;

    /// Lowercase tag name.
    fn tag_name(&self, node: NodeId) -> String;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// All attributes in source order.
    fn attributes(&self, node: NodeId) -> Vec<(String, String)>;

    fn computed_style(&self, node: NodeId) -> ComputedStyle;

    /// Whether the node participates in layout (the DOM `offsetParent`
    /// signal).
    fn has_layout_box(&self, node: NodeId) -> bool;

    /// Bounding rectangle in viewport coordinates.
    fn bounding_rect(&self, node: NodeId) -> Rect;

    /// Topmost element painted at the viewport point `(x, y)`.
    fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId>;

    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Rendered text of the node and its visible descendants.
    fn text_content(&self, node: NodeId) -> String;

    fn inner_html(&self, node: NodeId) -> String;

    fn outer_html(&self, node: NodeId) -> String;

    /// Live value of a form control.
    fn value(&self, node: NodeId) -> Option<String>;

    fn is_checked(&self, node: NodeId) -> bool;

    fn is_disabled(&self, node: NodeId) -> bool;

    /// Options of a `select` element, in order.
    fn select_options(&self, node: NodeId) -> Vec<SelectOption>;

    fn active_element(&self) -> Option<NodeId>;

    /// Current scroll offset `(x, y)`.
    fn scroll_position(&self) -> (f64, f64);

    fn viewport(&self) -> Viewport;

    // Mutating primitives.

    /// Set the value through the underlying setter, bypassing any wrapper
    /// accessors installed by page scripts.
    fn set_value(&mut self, node: NodeId, value: &str) -> Result<(), HostError>;

    fn set_option_selected(
        &mut self,
        node: NodeId,
        index: usize,
        selected: bool,
    ) -> Result<(), HostError>;

    /// Dispatch a synthetic event at `node`. Hosts that cannot construct the
    /// event kind return [`HostError::UnsupportedEvent`].
    fn dispatch_event(&mut self, node: NodeId, event: &DomEvent) -> Result<(), HostError>;

    /// Native activation (the DOM `click()` method).
    fn activate(&mut self, node: NodeId) -> Result<(), HostError>;

    fn scroll_into_view(&mut self, node: NodeId) -> Result<(), HostError>;

    fn focus(&mut self, node: NodeId) -> Result<(), HostError>;

    fn scroll_by(&mut self, dx: f64, dy: f64) -> Result<(), HostError>;

    fn scroll_to(&mut self, x: f64, y: f64) -> Result<(), HostError>;

    // Navigation. Every successful call bumps the navigation epoch.

    /// Load `url` as a new history entry, dropping any forward entries.
    fn open(&mut self, url: &str) -> Result<(), HostError>;

    /// Step back in session history. Returns false, without navigating,
    /// when already at the first entry.
    fn go_back(&mut self) -> Result<bool, HostError>;

    /// Step forward in session history. Returns false at the last entry.
    fn go_forward(&mut self) -> Result<bool, HostError>;

    /// Reload the current entry.
    fn reload(&mut self) -> Result<(), HostError>;
}

/// Returns true if `ancestor` is a strict ancestor of `node`.
pub fn is_ancestor<D: HostDocument + ?Sized>(doc: &D, ancestor: NodeId, node: NodeId) -> bool {
    let mut current = doc.parent(node);
    while let Some(parent) = current {
        if parent == ancestor {
            return true;
        }
        current = doc.parent(parent);
    }
    false
}
