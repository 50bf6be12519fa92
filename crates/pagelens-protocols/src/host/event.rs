//! Synthetic events dispatched into the host document.

use serde::{Deserialize, Serialize};

/// Closed set of events the dispatcher fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    PointerDown,
    PointerUp,
    MouseDown,
    MouseUp,
    Click,
    DblClick,
    MouseEnter,
    MouseOver,
    Input,
    Change,
    KeyDown,
    KeyPress,
    KeyUp,
}

impl EventKind {
    /// DOM event type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PointerDown => "pointerdown",
            EventKind::PointerUp => "pointerup",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseUp => "mouseup",
            EventKind::Click => "click",
            EventKind::DblClick => "dblclick",
            EventKind::MouseEnter => "mouseenter",
            EventKind::MouseOver => "mouseover",
            EventKind::Input => "input",
            EventKind::Change => "change",
            EventKind::KeyDown => "keydown",
            EventKind::KeyPress => "keypress",
            EventKind::KeyUp => "keyup",
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, EventKind::PointerDown | EventKind::PointerUp)
    }
}

/// A synthetic event with optional pointer coordinates or key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomEvent {
    pub kind: EventKind,
    pub bubbles: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl DomEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            bubbles: true,
            client_x: None,
            client_y: None,
            key: None,
        }
    }

    /// Pointer/mouse event at viewport coordinates.
    pub fn at(kind: EventKind, x: f64, y: f64) -> Self {
        Self {
            client_x: Some(x),
            client_y: Some(y),
            ..Self::new(kind)
        }
    }

    pub fn key(kind: EventKind, key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new(kind)
        }
    }

    /// Event that does not bubble (mouseenter).
    pub fn non_bubbling(kind: EventKind) -> Self {
        Self {
            bubbles: false,
            ..Self::new(kind)
        }
    }
}
