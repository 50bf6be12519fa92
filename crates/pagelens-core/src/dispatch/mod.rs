//! Ref resolution and command execution.
//!
//! A [`Dispatcher`] borrows the live document and the current ref
//! generation for the duration of one command. Host failures on best-effort
//! steps (scrolling, focusing, firing follow-up events) are logged and do
//! not fail the command; only the closed [`ErrorCode`] taxonomy is surfaced.

mod kinds;
mod occlusion;

pub use kinds::{
    ActionKind, ActionPayload, PageKind, PagePayload, QueryKind, QueryPayload, DEFAULT_LIMIT_CHARS,
    DEFAULT_WAIT_POLL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};

use pagelens_protocols::{DomEvent, EventKind, HostDocument, HostError, NodeId};
use tracing::{debug, warn};

use crate::classify::Classifier;
use crate::envelope::{ActionOutcome, PageOutcome, QueryOutcome};
use crate::error::{CommandError, ErrorCode};
use crate::refs::{Ref, RefAllocator};
use crate::text::{clamp, limit_chars};

/// Attribute values in `attrs` query results are clamped to this length.
const QUERY_ATTR_VALUE_LEN: usize = 150;

const CLICK_SEQUENCE: [EventKind; 5] = [
    EventKind::PointerDown,
    EventKind::PointerUp,
    EventKind::MouseDown,
    EventKind::MouseUp,
    EventKind::Click,
];

fn best_effort(result: Result<(), HostError>, step: &str) {
    if let Err(e) = result {
        debug!(step, error = %e, "Best-effort step failed");
    }
}

pub struct Dispatcher<'a, D: HostDocument + ?Sized> {
    doc: &'a mut D,
    refs: &'a RefAllocator,
}

impl<'a, D: HostDocument + ?Sized> Dispatcher<'a, D> {
    pub fn new(doc: &'a mut D, refs: &'a RefAllocator) -> Self {
        Self { doc, refs }
    }

    fn resolve(&self, r: Ref) -> Result<NodeId, CommandError> {
        self.refs.resolve(r, &*self.doc).inspect_err(|_| {
            warn!(%r, "Stale or unknown ref");
        })
    }

    pub fn act(
        &mut self,
        r: Ref,
        kind: ActionKind,
        payload: &ActionPayload,
    ) -> Result<ActionOutcome, CommandError> {
        let node = self.resolve(r)?;
        let token = r.to_string();
        debug!(%r, action = %kind, "Dispatching action");
        let mut outcome = ActionOutcome::new(&token, kind.as_str());

        match kind {
            ActionKind::Click => {
                self.ensure_clickable(r, node)?;
                self.click_sequence(node);
            }
            ActionKind::DblClick => {
                self.ensure_clickable(r, node)?;
                self.click_sequence(node);
                self.click_sequence(node);
                let (x, y) = self.doc.bounding_rect(node).center();
                best_effort(
                    self.doc
                        .dispatch_event(node, &DomEvent::at(EventKind::DblClick, x, y)),
                    "dblclick",
                );
            }
            ActionKind::Fill => {
                let value = payload.value.clone().unwrap_or_default();
                self.fill(node, &value);
            }
            ActionKind::Clear => self.fill(node, ""),
            ActionKind::Type => {
                let text = payload
                    .text
                    .clone()
                    .or_else(|| payload.value.clone())
                    .unwrap_or_default();
                best_effort(self.doc.scroll_into_view(node), "scroll_into_view");
                best_effort(self.doc.focus(node), "focus");
                self.type_text(node, &text);
                best_effort(
                    self.doc.dispatch_event(node, &DomEvent::new(EventKind::Change)),
                    "change",
                );
            }
            ActionKind::Select => {
                best_effort(self.doc.scroll_into_view(node), "scroll_into_view");
                if self.doc.tag_name(node) != "select" {
                    return Err(CommandError::new(
                        ErrorCode::NotASelect,
                        format!("ref {} is not a <select>", token),
                    ));
                }
                let values = payload
                    .values
                    .clone()
                    .unwrap_or_else(|| vec![payload.value.clone().unwrap_or_default()]);
                for (index, option) in self.doc.select_options(node).iter().enumerate() {
                    let selected =
                        values.contains(&option.value) || values.iter().any(|v| v == option.text.trim());
                    best_effort(
                        self.doc.set_option_selected(node, index, selected),
                        "set_option_selected",
                    );
                }
                best_effort(
                    self.doc.dispatch_event(node, &DomEvent::new(EventKind::Change)),
                    "change",
                );
                outcome.values = Some(values);
            }
            ActionKind::Check | ActionKind::Uncheck => {
                let input_type = self
                    .doc
                    .attribute(node, "type")
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                let is_input = self.doc.tag_name(node) == "input";
                let is_checkbox = is_input && input_type == "checkbox";
                let is_radio = is_input && input_type == "radio";
                if !is_checkbox && !is_radio {
                    return Err(CommandError::new(
                        ErrorCode::NotCheckable,
                        format!("ref {} is not checkable", token),
                    ));
                }
                let want = kind == ActionKind::Check;
                if !want && is_radio {
                    return Err(CommandError::new(
                        ErrorCode::NotUncheckable,
                        format!("ref {} is not uncheckable", token),
                    ));
                }
                if self.doc.is_checked(node) != want {
                    best_effort(self.doc.scroll_into_view(node), "scroll_into_view");
                    self.click_sequence(node);
                }
                outcome.checked = Some(self.doc.is_checked(node));
            }
            ActionKind::Focus => best_effort(self.doc.focus(node), "focus"),
            ActionKind::Hover => {
                best_effort(self.doc.scroll_into_view(node), "scroll_into_view");
                best_effort(
                    self.doc
                        .dispatch_event(node, &DomEvent::non_bubbling(EventKind::MouseEnter)),
                    "mouseenter",
                );
                best_effort(
                    self.doc.dispatch_event(node, &DomEvent::new(EventKind::MouseOver)),
                    "mouseover",
                );
            }
            ActionKind::ScrollIntoView => {
                best_effort(self.doc.scroll_into_view(node), "scroll_into_view")
            }
        }
        Ok(outcome)
    }

    /// Scroll the target into view and fail with `element_blocked` if another
    /// element is painted over its center.
    fn ensure_clickable(&mut self, r: Ref, node: NodeId) -> Result<(), CommandError> {
        best_effort(self.doc.scroll_into_view(node), "scroll_into_view");
        if let Some(occluder) = occlusion::occluder(&*self.doc, node) {
            let err = occlusion::blocked_error(&*self.doc, &r.to_string(), occluder);
            warn!(%r, message = %err.message, "Click blocked");
            return Err(err);
        }
        Ok(())
    }

    /// Focus, then fire the pointer/mouse sequence at the element's center.
    /// Pointer events the host cannot construct are skipped; if a mouse
    /// event cannot be constructed the host's native activation is used.
    fn click_sequence(&mut self, node: NodeId) {
        best_effort(self.doc.focus(node), "focus");
        let (x, y) = self.doc.bounding_rect(node).center();
        for kind in CLICK_SEQUENCE {
            match self.doc.dispatch_event(node, &DomEvent::at(kind, x, y)) {
                Ok(()) => {}
                Err(HostError::UnsupportedEvent(_)) if kind.is_pointer() => {
                    debug!(event = kind.as_str(), "Pointer event unsupported, skipping");
                }
                Err(HostError::UnsupportedEvent(_)) => {
                    debug!(event = kind.as_str(), "Mouse event unsupported, activating");
                    best_effort(self.doc.activate(node), "activate");
                    return;
                }
                Err(e) => {
                    warn!(event = kind.as_str(), error = %e, "Click sequence aborted");
                    return;
                }
            }
        }
    }

    fn fill(&mut self, node: NodeId, value: &str) {
        best_effort(self.doc.scroll_into_view(node), "scroll_into_view");
        best_effort(self.doc.focus(node), "focus");
        best_effort(self.doc.set_value(node, value), "set_value");
        best_effort(
            self.doc.dispatch_event(node, &DomEvent::new(EventKind::Input)),
            "input",
        );
        best_effort(
            self.doc.dispatch_event(node, &DomEvent::new(EventKind::Change)),
            "change",
        );
    }

    pub fn query(
        &self,
        r: Ref,
        kind: QueryKind,
        payload: &QueryPayload,
    ) -> Result<QueryOutcome, CommandError> {
        let node = self.resolve(r)?;
        debug!(%r, query = %kind, "Running query");
        let doc = &*self.doc;
        let raw = match kind {
            QueryKind::Text => doc.text_content(node),
            QueryKind::Attrs => {
                let attrs: serde_json::Map<String, serde_json::Value> = doc
                    .attributes(node)
                    .into_iter()
                    .map(|(name, value)| {
                        (name, serde_json::Value::String(clamp(&value, QUERY_ATTR_VALUE_LEN)))
                    })
                    .collect();
                serde_json::Value::Object(attrs).to_string()
            }
            QueryKind::Value => doc.value(node).unwrap_or_default(),
            QueryKind::Html => doc.inner_html(node),
            QueryKind::OuterHtml => doc.outer_html(node),
            QueryKind::ComputedStyles => {
                let style = doc.computed_style(node);
                serde_json::json!({
                    "display": style.display,
                    "visibility": style.visibility,
                    "color": style.color,
                    "fontSize": style.font_size,
                    "backgroundColor": style.background_color,
                    "opacity": style.opacity,
                    "cursor": style.cursor,
                })
                .to_string()
            }
            QueryKind::IsVisible => is_visible_in_tree(doc, node).to_string(),
            QueryKind::IsEnabled => (!doc.is_disabled(node)).to_string(),
            QueryKind::IsChecked => doc.is_checked(node).to_string(),
        };
        let (value, truncated) = limit_chars(&raw, payload.effective_limit());
        Ok(QueryOutcome {
            node_ref: r.to_string(),
            kind: kind.as_str().to_string(),
            value: Some(value),
            truncated: Some(truncated),
        })
    }

    pub fn page(&mut self, kind: PageKind, payload: &PagePayload) -> Result<PageOutcome, CommandError> {
        debug!(page = %kind, "Running page operation");
        let mut outcome = PageOutcome::new(kind.as_str());
        match kind {
            PageKind::Info => {
                let (sx, sy) = self.doc.scroll_position();
                outcome.url = Some(self.doc.url());
                outcome.title = Some(self.doc.title());
                outcome.scroll_x = Some(sx);
                outcome.scroll_y = Some(sy);
                outcome.viewport = Some(self.doc.viewport());
            }
            PageKind::Scroll => {
                let result = if payload.x.is_some() || payload.y.is_some() {
                    self.doc
                        .scroll_to(payload.x.unwrap_or(0.0), payload.y.unwrap_or(0.0))
                } else {
                    self.doc.scroll_by(
                        payload.delta_x.unwrap_or(0.0),
                        payload.delta_y.unwrap_or(0.0),
                    )
                };
                best_effort(result, "scroll");
                let (sx, sy) = self.doc.scroll_position();
                outcome.scroll_x = Some(sx);
                outcome.scroll_y = Some(sy);
            }
            PageKind::PressKey | PageKind::KeyDown | PageKind::KeyUp => {
                let key = payload.key.clone().unwrap_or_default();
                if let Some(target) = self.key_target() {
                    if kind != PageKind::KeyUp {
                        self.key_event(target, EventKind::KeyDown, &key);
                    }
                    if kind != PageKind::KeyDown {
                        self.key_event(target, EventKind::KeyUp, &key);
                    }
                }
                outcome.key = Some(key);
            }
            PageKind::Char => {
                let text = payload
                    .text
                    .clone()
                    .or_else(|| payload.key.clone())
                    .unwrap_or_default();
                if let Some(target) = self.key_target() {
                    self.type_text(target, &text);
                }
                outcome.text = Some(text);
            }
            PageKind::Wait => {
                outcome.matched = Some(self.wait_condition_holds(payload));
            }
            PageKind::Open => {
                let url = payload.url.clone().unwrap_or_default();
                best_effort(self.doc.open(&url), "open");
                self.fill_location(&mut outcome);
            }
            PageKind::Back | PageKind::Forward => {
                let moved = if kind == PageKind::Back {
                    self.doc.go_back()
                } else {
                    self.doc.go_forward()
                };
                let moved = moved.unwrap_or_else(|e| {
                    debug!(page = %kind, error = %e, "History step failed");
                    false
                });
                outcome.navigated = Some(moved);
                self.fill_location(&mut outcome);
            }
            PageKind::Reload => {
                best_effort(self.doc.reload(), "reload");
                self.fill_location(&mut outcome);
            }
        }
        Ok(outcome)
    }

    fn fill_location(&self, outcome: &mut PageOutcome) {
        outcome.url = Some(self.doc.url());
        outcome.title = Some(self.doc.title());
    }

    /// One evaluation of a `wait` condition. Every given condition must hold;
    /// with none given the wait is satisfied immediately. An invalid selector
    /// never matches.
    fn wait_condition_holds(&self, payload: &PagePayload) -> bool {
        if let Some(selector) = &payload.selector {
            match self.doc.query_selector(selector) {
                Ok(Some(_)) => {}
                Ok(None) => return false,
                Err(e) => {
                    debug!(selector = %selector, error = %e, "Wait selector rejected");
                    return false;
                }
            }
        }
        if let Some(text) = &payload.text {
            let body = self
                .doc
                .document_root()
                .map(|root| self.doc.text_content(root))
                .unwrap_or_default();
            if !body.contains(text.as_str()) {
                return false;
            }
        }
        if let Some(url) = &payload.url {
            if !self.doc.url().contains(url.as_str()) {
                return false;
            }
        }
        true
    }

    fn key_target(&self) -> Option<NodeId> {
        self.doc.active_element().or_else(|| self.doc.document_root())
    }

    fn key_event(&mut self, target: NodeId, kind: EventKind, key: &str) {
        best_effort(
            self.doc.dispatch_event(target, &DomEvent::key(kind, key)),
            kind.as_str(),
        );
    }

    /// Type each character: keydown, keypress, append to a text control,
    /// input, keyup.
    fn type_text(&mut self, target: NodeId, text: &str) {
        let editable = matches!(self.doc.tag_name(target).as_str(), "input" | "textarea");
        for c in text.chars() {
            let key = c.to_string();
            self.key_event(target, EventKind::KeyDown, &key);
            self.key_event(target, EventKind::KeyPress, &key);
            if editable {
                let mut value = self.doc.value(target).unwrap_or_default();
                value.push(c);
                best_effort(self.doc.set_value(target, &value), "set_value");
                best_effort(
                    self.doc.dispatch_event(target, &DomEvent::new(EventKind::Input)),
                    "input",
                );
            }
            self.key_event(target, EventKind::KeyUp, &key);
        }
    }
}

/// Visibility gate applied to the node and every ancestor.
fn is_visible_in_tree<D: HostDocument + ?Sized>(doc: &D, node: NodeId) -> bool {
    let classifier = Classifier::default();
    let mut current = Some(node);
    while let Some(n) = current {
        if !classifier.is_visible(doc, n) {
            return false;
        }
        current = doc.parent(n);
    }
    true
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
