//! In-memory host document.
//!
//! [`MemoryDocument`] is an arena-backed implementation of [`HostDocument`]
//! with just enough layout, style and event behaviour to exercise the
//! snapshot and command layers without a browser:
//!
//! - rects in document coordinates, shifted by the scroll offset
//!   (`position: fixed` rects are viewport-relative);
//! - hit-testing by effective `z-index`, then paint (pre-)order;
//! - inherited `cursor`, `visibility`, `color` and `font-size`;
//! - checkbox/radio default actions on click;
//! - bubbling event handlers registered as closures;
//! - session history over registered routes, with a navigation epoch
//!   bumped on every load.

mod html;
mod selector;
mod spec;

pub use spec::{DocumentSpec, ElementSpec};

use std::collections::{BTreeMap, HashMap, HashSet};

use pagelens_protocols::{
    ComputedStyle, DomEvent, EventKind, HostDocument, HostError, NodeId, Rect, SelectOption,
    Viewport,
};

use selector::Selector;

/// Event handler: receives the document and the event target.
pub type Handler = Box<dyn FnMut(&mut MemoryDocument, NodeId) + Send>;

/// One event as observed by the document.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub node: NodeId,
    pub kind: EventKind,
    pub key: Option<String>,
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    style: BTreeMap<String, String>,
    rect: Option<Rect>,
    text: String,
    value: Option<String>,
    checked: bool,
    selected: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attached: bool,
}

/// Tags the user-agent stylesheet never renders.
const NEVER_RENDERED: &[&str] = &["head", "script", "style", "template", "meta", "link", "title"];

const INLINE_TAGS: &[&str] = &[
    "a", "span", "b", "i", "em", "strong", "label", "img", "input", "select", "textarea",
    "button", "code", "small",
];

pub struct MemoryDocument {
    url: String,
    title: String,
    epoch: u64,
    nodes: Vec<Element>,
    root: NodeId,
    viewport: Viewport,
    scroll: (f64, f64),
    focused: Option<NodeId>,
    handlers: HashMap<(NodeId, EventKind), Vec<Handler>>,
    events: Vec<RecordedEvent>,
    unsupported: HashSet<EventKind>,
    routes: HashMap<String, Route>,
    history: Vec<String>,
    history_index: usize,
}

/// Content served for a URL.
#[derive(Debug, Clone)]
struct Route {
    title: String,
    body: ElementSpec,
}

impl std::fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("url", &self.url)
            .field("title", &self.title)
            .field("epoch", &self.epoch)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

impl MemoryDocument {
    /// Empty document with a bare `<body>`.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        let mut doc = Self::empty(url.into(), title.into());
        doc.root = doc.insert(None, &ElementSpec::new("body"));
        let (url, title) = (doc.url.clone(), doc.title.clone());
        doc.add_route(url, title, ElementSpec::new("body"));
        doc
    }

    /// Build a document from a fixture description. Extra `pages` become
    /// routes reachable through [`HostDocument::open`].
    pub fn from_spec(spec: &DocumentSpec) -> Self {
        let mut doc = Self::empty(spec.url.clone(), spec.title.clone());
        doc.viewport = spec.viewport;
        doc.replace_body(&spec.body);
        doc.add_route(spec.url.clone(), spec.title.clone(), spec.body.clone());
        for page in &spec.pages {
            doc.add_route(page.url.clone(), page.title.clone(), page.body.clone());
        }
        doc
    }

    fn empty(url: String, title: String) -> Self {
        Self {
            history: vec![url.clone()],
            url,
            title,
            epoch: 0,
            nodes: Vec::new(),
            root: NodeId(0),
            viewport: Viewport::default(),
            scroll: (0.0, 0.0),
            focused: None,
            handlers: HashMap::new(),
            events: Vec::new(),
            unsupported: HashSet::new(),
            routes: HashMap::new(),
            history_index: 0,
        }
    }

    /// Serve `body` for `url`. Replaces any earlier route for the same URL.
    pub fn add_route(&mut self, url: impl Into<String>, title: impl Into<String>, body: ElementSpec) {
        self.routes.insert(
            url.into(),
            Route {
                title: title.into(),
                body,
            },
        );
    }

    /// History entries and the index of the current one.
    pub fn history(&self) -> (&[String], usize) {
        (&self.history, self.history_index)
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport { width, height };
        self
    }

    pub fn body(&self) -> NodeId {
        self.root
    }

    /// Append `spec` (and its subtree) as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        self.insert(Some(parent), &spec)
    }

    fn insert(&mut self, parent: Option<NodeId>, spec: &ElementSpec) -> NodeId {
        let id = NodeId(self.nodes.len() as u64);
        let attached = parent.map(|p| self.is_connected(p)).unwrap_or(true);
        self.nodes.push(Element {
            tag: spec.tag.to_ascii_lowercase(),
            attrs: spec.attrs.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            style: spec.style.clone(),
            rect: spec.rect,
            text: spec.text.clone().unwrap_or_default(),
            value: spec.value.clone().or_else(|| spec.attrs.get("value").cloned()),
            checked: spec.checked || spec.attrs.contains_key("checked"),
            selected: spec.selected || spec.attrs.contains_key("selected"),
            parent,
            children: Vec::new(),
            attached,
        });
        if let Some(p) = parent {
            if let Some(el) = self.element_mut(p) {
                el.children.push(id);
            }
        }
        for child in &spec.children {
            self.insert(Some(id), child);
        }
        id
    }

    fn replace_body(&mut self, body: &ElementSpec) {
        let fresh = self.insert(None, &ElementSpec::new("body"));
        if let Some(el) = self.element_mut(fresh) {
            el.attrs = body.attrs.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            el.style = body.style.clone();
            el.rect = body.rect;
            el.text = body.text.clone().unwrap_or_default();
        }
        for child in &body.children {
            self.insert(Some(fresh), child);
        }
        self.root = fresh;
    }

    /// Register `body` under `url` and open it as a new history entry.
    pub fn navigate(&mut self, url: impl Into<String>, title: impl Into<String>, body: ElementSpec) {
        let url = url.into();
        self.add_route(url.clone(), title, body);
        self.push_history(url.clone());
        self.load(&url);
    }

    fn push_history(&mut self, url: String) {
        self.history.truncate(self.history_index + 1);
        self.history.push(url);
        self.history_index = self.history.len() - 1;
    }

    /// Replace the document with the route for `url`: every existing node is
    /// detached, the body is rebuilt and the navigation epoch advances. An
    /// unknown URL loads an empty body.
    fn load(&mut self, url: &str) {
        for el in &mut self.nodes {
            el.attached = false;
        }
        let route = self.routes.get(url).cloned().unwrap_or_else(|| Route {
            title: String::new(),
            body: ElementSpec::new("body"),
        });
        self.url = url.to_string();
        self.title = route.title;
        self.epoch += 1;
        self.scroll = (0.0, 0.0);
        self.focused = None;
        self.handlers.clear();
        self.replace_body(&route.body);
    }

    /// Detach `node` and its subtree from the document.
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.element(node).and_then(|el| el.parent) else {
            return;
        };
        if let Some(el) = self.element_mut(parent) {
            el.children.retain(|c| *c != node);
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(el) = self.element_mut(current) {
                el.attached = false;
                stack.extend(el.children.iter().copied());
            }
        }
        if self.focused.is_some_and(|f| !self.is_connected(f)) {
            self.focused = None;
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(el) = self.element_mut(node) {
            match el.attrs.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value,
                None => el.attrs.push((name.to_string(), value)),
            }
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attrs.retain(|(k, _)| k != name);
        }
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: impl Into<String>) {
        if let Some(el) = self.element_mut(node) {
            el.style.insert(property.to_string(), value.into());
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        if let Some(el) = self.element_mut(node) {
            el.text = text.into();
        }
    }

    /// Register a handler for `kind` events reaching `node` (directly or by
    /// bubbling).
    pub fn on(
        &mut self,
        node: NodeId,
        kind: EventKind,
        handler: impl FnMut(&mut MemoryDocument, NodeId) + Send + 'static,
    ) {
        self.handlers.entry((node, kind)).or_default().push(Box::new(handler));
    }

    /// Make `dispatch_event` reject the given kinds, as a host lacking those
    /// event constructors would.
    pub fn set_unsupported_events(&mut self, kinds: impl IntoIterator<Item = EventKind>) {
        self.unsupported = kinds.into_iter().collect();
    }

    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Kinds of events delivered to `node`, in order.
    pub fn events_for(&self, node: NodeId) -> Vec<EventKind> {
        self.events.iter().filter(|e| e.node == node).map(|e| e.kind).collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Attached elements in document pre-order, starting at the body.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            let Some(el) = self.element(node) else {
                continue;
            };
            out.push(node);
            stack.extend(el.children.iter().rev().copied());
        }
        out
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0 as usize)
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0 as usize)
    }

    fn attr_of(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn declared(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)?.style.get(property).map(String::as_str)
    }

    fn inherited(&self, node: NodeId, property: &str) -> Option<String> {
        let mut current = Some(node);
        while let Some(n) = current {
            if let Some(v) = self.declared(n, property) {
                if v != "inherit" {
                    return Some(v.to_string());
                }
            }
            current = self.element(n).and_then(|el| el.parent);
        }
        None
    }

    fn own_display(&self, node: NodeId) -> String {
        let Some(el) = self.element(node) else {
            return "none".to_string();
        };
        if let Some(display) = self.declared(node, "display") {
            return display.to_string();
        }
        let hidden_input =
            el.tag == "input" && self.attr_of(node, "type").is_some_and(|t| t.eq_ignore_ascii_case("hidden"));
        if hidden_input || NEVER_RENDERED.contains(&el.tag.as_str()) {
            "none".to_string()
        } else if INLINE_TAGS.contains(&el.tag.as_str()) {
            "inline".to_string()
        } else {
            "block".to_string()
        }
    }

    /// False when the node or an ancestor has `display: none`.
    fn is_rendered(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if self.own_display(n) == "none" {
                return false;
            }
            current = self.element(n).and_then(|el| el.parent);
        }
        true
    }

    fn is_fixed(&self, node: NodeId) -> bool {
        self.declared(node, "position") == Some("fixed")
    }

    fn z_index(&self, node: NodeId) -> i32 {
        let mut current = Some(node);
        while let Some(n) = current {
            if let Some(z) = self.declared(n, "z-index").and_then(|z| z.trim().parse().ok()) {
                return z;
            }
            current = self.element(n).and_then(|el| el.parent);
        }
        0
    }

    /// Document width/height covered by content, for scroll clamping.
    fn content_extent(&self) -> (f64, f64) {
        self.nodes
            .iter()
            .filter(|el| el.attached)
            .filter_map(|el| el.rect)
            .fold((0.0_f64, 0.0_f64), |(w, h), r| (w.max(r.x + r.width), h.max(r.y + r.height)))
    }

    fn clamp_scroll(&self, x: f64, y: f64) -> (f64, f64) {
        let (width, height) = self.content_extent();
        let max_x = (width - self.viewport.width as f64).max(0.0);
        let max_y = (height - self.viewport.height as f64).max(0.0);
        (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
    }

    fn is_text_control(&self, node: NodeId) -> bool {
        matches!(self.tag_name(node).as_str(), "input" | "textarea" | "select")
    }

    fn run_default_action(&mut self, node: NodeId) {
        if self.tag_name(node) != "input" {
            return;
        }
        let input_type = self.attr_of(node, "type").unwrap_or("text").to_ascii_lowercase();
        match input_type.as_str() {
            "checkbox" => {
                if let Some(el) = self.element_mut(node) {
                    el.checked = !el.checked;
                }
            }
            "radio" => {
                let group = self.attr_of(node, "name").map(str::to_string);
                if let Some(group) = group {
                    for other in self.preorder() {
                        if other != node
                            && self.tag_name(other) == "input"
                            && self.attr_of(other, "type") == Some("radio")
                            && self.attr_of(other, "name") == Some(group.as_str())
                        {
                            if let Some(el) = self.element_mut(other) {
                                el.checked = false;
                            }
                        }
                    }
                }
                if let Some(el) = self.element_mut(node) {
                    el.checked = true;
                }
            }
            _ => {}
        }
    }

    fn deliver(&mut self, target: NodeId, kind: EventKind, bubbles: bool) {
        let mut path = vec![target];
        if bubbles {
            let mut current = self.parent(target);
            while let Some(p) = current {
                path.push(p);
                current = self.parent(p);
            }
        }
        for node in path {
            let key = (node, kind);
            let Some(mut handlers) = self.handlers.remove(&key) else {
                continue;
            };
            for handler in handlers.iter_mut() {
                handler(self, target);
            }
            // Keep handlers registered while running, after the existing ones.
            let added = self.handlers.remove(&key).unwrap_or_default();
            handlers.extend(added);
            self.handlers.insert(key, handlers);
        }
    }

    fn click(&mut self, node: NodeId, bubbles: bool) {
        if self.is_disabled(node) {
            return;
        }
        self.run_default_action(node);
        self.deliver(node, EventKind::Click, bubbles);
    }

    fn ensure_attached(&self, node: NodeId) -> Result<(), HostError> {
        if self.is_connected(node) {
            Ok(())
        } else {
            Err(HostError::Detached(node))
        }
    }
}

impl HostDocument for MemoryDocument {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn navigation_epoch(&self) -> u64 {
        self.epoch
    }

    fn document_root(&self) -> Option<NodeId> {
        Some(self.root)
    }

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, HostError> {
        let selector = Selector::parse(selector)?;
        Ok(self.preorder().into_iter().find(|n| selector.matches(self, *n)))
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.preorder().into_iter().find(|n| self.attr_of(*n, "id") == Some(id))
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|el| el.attached)
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.element(node).map(|el| el.tag.clone()).unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.attr_of(node, name).map(str::to_string)
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.element(node).map(|el| el.attrs.clone()).unwrap_or_default()
    }

    fn computed_style(&self, node: NodeId) -> ComputedStyle {
        let defaults = ComputedStyle::default();
        let link_cursor = self.tag_name(node) == "a" && self.attr_of(node, "href").is_some();
        ComputedStyle {
            display: self.own_display(node),
            visibility: self.inherited(node, "visibility").unwrap_or(defaults.visibility),
            opacity: self
                .declared(node, "opacity")
                .and_then(|o| o.trim().parse().ok())
                .unwrap_or(defaults.opacity),
            cursor: self
                .declared(node, "cursor")
                .map(str::to_string)
                .or_else(|| link_cursor.then(|| "pointer".to_string()))
                .or_else(|| self.inherited(node, "cursor"))
                .unwrap_or(defaults.cursor),
            position: self
                .declared(node, "position")
                .map(str::to_string)
                .unwrap_or(defaults.position),
            color: self.inherited(node, "color").unwrap_or(defaults.color),
            font_size: self.inherited(node, "font-size").unwrap_or(defaults.font_size),
            background_color: self
                .declared(node, "background-color")
                .map(str::to_string)
                .unwrap_or(defaults.background_color),
        }
    }

    fn has_layout_box(&self, node: NodeId) -> bool {
        self.is_connected(node) && self.is_rendered(node) && !self.is_fixed(node)
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        let Some(rect) = self.element(node).and_then(|el| el.rect) else {
            return Rect::default();
        };
        if self.is_fixed(node) {
            rect
        } else {
            rect.translate(-self.scroll.0, -self.scroll.1)
        }
    }

    fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId> {
        let hit = self
            .preorder()
            .into_iter()
            .enumerate()
            .filter(|(_, n)| self.element(*n).is_some_and(|el| el.rect.is_some()))
            .filter(|(_, n)| self.is_rendered(*n))
            .filter(|(_, n)| self.computed_style(*n).visibility != "hidden")
            .filter(|(_, n)| self.declared(*n, "pointer-events") != Some("none"))
            .filter(|(_, n)| self.bounding_rect(*n).contains(x, y))
            .max_by_key(|(order, n)| (self.z_index(*n), *order))
            .map(|(_, n)| n);
        let inside_viewport =
            x >= 0.0 && y >= 0.0 && x <= self.viewport.width as f64 && y <= self.viewport.height as f64;
        hit.or_else(|| inside_viewport.then_some(self.root))
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.element(node).map(|el| el.children.clone()).unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).and_then(|el| el.parent)
    }

    fn text_content(&self, node: NodeId) -> String {
        let Some(el) = self.element(node) else {
            return String::new();
        };
        let mut parts = Vec::new();
        if !el.text.trim().is_empty() {
            parts.push(el.text.trim().to_string());
        }
        for child in &el.children {
            if !self.is_rendered(*child) || self.computed_style(*child).visibility == "hidden" {
                continue;
            }
            let text = self.text_content(*child);
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join(" ")
    }

    fn inner_html(&self, node: NodeId) -> String {
        html::inner_html(self, node)
    }

    fn outer_html(&self, node: NodeId) -> String {
        html::outer_html(self, node)
    }

    fn value(&self, node: NodeId) -> Option<String> {
        if !self.is_text_control(node) {
            return self.element(node).and_then(|el| el.value.clone());
        }
        if self.tag_name(node) == "select" {
            let options = self.select_options(node);
            return options
                .iter()
                .find(|o| o.selected)
                .or_else(|| options.first())
                .map(|o| o.value.clone())
                .or(Some(String::new()));
        }
        Some(self.element(node).and_then(|el| el.value.clone()).unwrap_or_default())
    }

    fn is_checked(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|el| el.checked)
    }

    fn is_disabled(&self, node: NodeId) -> bool {
        self.attr_of(node, "disabled").is_some()
    }

    fn select_options(&self, node: NodeId) -> Vec<SelectOption> {
        option_nodes(self, node)
            .into_iter()
            .filter_map(|opt| {
                let el = self.element(opt)?;
                let text = el.text.trim().to_string();
                Some(SelectOption {
                    value: el.value.clone().unwrap_or_else(|| text.clone()),
                    text,
                    selected: el.selected,
                })
            })
            .collect()
    }

    fn active_element(&self) -> Option<NodeId> {
        self.focused.filter(|f| self.is_connected(*f)).or(Some(self.root))
    }

    fn scroll_position(&self) -> (f64, f64) {
        self.scroll
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_value(&mut self, node: NodeId, value: &str) -> Result<(), HostError> {
        self.ensure_attached(node)?;
        let el = self.element_mut(node).ok_or(HostError::NotAnElement(node))?;
        el.value = Some(value.to_string());
        Ok(())
    }

    fn set_option_selected(
        &mut self,
        node: NodeId,
        index: usize,
        selected: bool,
    ) -> Result<(), HostError> {
        self.ensure_attached(node)?;
        let option = option_nodes(self, node)
            .get(index)
            .copied()
            .ok_or(HostError::OptionOutOfRange { node, index })?;
        if let Some(el) = self.element_mut(option) {
            el.selected = selected;
        }
        Ok(())
    }

    fn dispatch_event(&mut self, node: NodeId, event: &DomEvent) -> Result<(), HostError> {
        self.ensure_attached(node)?;
        if self.unsupported.contains(&event.kind) {
            return Err(HostError::UnsupportedEvent(event.kind));
        }
        self.events.push(RecordedEvent {
            node,
            kind: event.kind,
            key: event.key.clone(),
        });
        if event.kind == EventKind::Click {
            self.click(node, event.bubbles);
        } else {
            self.deliver(node, event.kind, event.bubbles);
        }
        Ok(())
    }

    fn activate(&mut self, node: NodeId) -> Result<(), HostError> {
        self.ensure_attached(node)?;
        self.events.push(RecordedEvent {
            node,
            kind: EventKind::Click,
            key: None,
        });
        self.click(node, true);
        Ok(())
    }

    fn scroll_into_view(&mut self, node: NodeId) -> Result<(), HostError> {
        self.ensure_attached(node)?;
        if self.is_fixed(node) {
            return Ok(());
        }
        let Some(rect) = self.element(node).and_then(|el| el.rect) else {
            return Ok(());
        };
        let (cx, cy) = rect.center();
        self.scroll = self.clamp_scroll(
            cx - self.viewport.width as f64 / 2.0,
            cy - self.viewport.height as f64 / 2.0,
        );
        Ok(())
    }

    fn focus(&mut self, node: NodeId) -> Result<(), HostError> {
        self.ensure_attached(node)?;
        self.focused = Some(node);
        Ok(())
    }

    fn scroll_by(&mut self, dx: f64, dy: f64) -> Result<(), HostError> {
        self.scroll = self.clamp_scroll(self.scroll.0 + dx, self.scroll.1 + dy);
        Ok(())
    }

    fn scroll_to(&mut self, x: f64, y: f64) -> Result<(), HostError> {
        self.scroll = self.clamp_scroll(x, y);
        Ok(())
    }

    fn open(&mut self, url: &str) -> Result<(), HostError> {
        if url.trim().is_empty() {
            return Err(HostError::Failed("empty url".to_string()));
        }
        self.push_history(url.to_string());
        self.load(url);
        Ok(())
    }

    fn go_back(&mut self) -> Result<bool, HostError> {
        if self.history_index == 0 {
            return Ok(false);
        }
        self.history_index -= 1;
        let url = self.history[self.history_index].clone();
        self.load(&url);
        Ok(true)
    }

    fn go_forward(&mut self) -> Result<bool, HostError> {
        if self.history_index + 1 >= self.history.len() {
            return Ok(false);
        }
        self.history_index += 1;
        let url = self.history[self.history_index].clone();
        self.load(&url);
        Ok(true)
    }

    fn reload(&mut self) -> Result<(), HostError> {
        let url = self.url.clone();
        self.load(&url);
        Ok(())
    }
}

/// `option` descendants of a select, looking through `optgroup`.
fn option_nodes(doc: &MemoryDocument, select: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    for child in doc.children(select) {
        match doc.tag_name(child).as_str() {
            "option" => out.push(child),
            "optgroup" => out.extend(
                doc.children(child)
                    .into_iter()
                    .filter(|c| doc.tag_name(*c) == "option"),
            ),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
