//! Result envelopes.
//!
//! Every agent-facing operation returns an [`Envelope`]: a common header
//! (`ok`, `type`, `meta`, optional `error`) with the operation's own fields
//! flattened alongside it. On failure the body still carries the request
//! context (`ref`, `action`, ...) so a caller can correlate the error.

use std::collections::BTreeMap;

use chrono::Utc;
use pagelens_protocols::{HostDocument, Viewport};
use serde::{Deserialize, Serialize};

use crate::error::{CommandError, ErrorCode};
use crate::refs::Ref;
use crate::snapshot::{RefEntry, Snapshot, SnapshotNode, SnapshotStats};

/// Snapshot wire format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeType {
    Snapshot,
    Action,
    Query,
    Page,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Meta {
    pub fn now() -> Self {
        Self {
            ts: Utc::now().timestamp_millis(),
            url: None,
            title: None,
        }
    }

    /// Timestamp plus the document's current url and title.
    pub fn for_document<D: HostDocument + ?Sized>(doc: &D) -> Self {
        Self {
            url: Some(doc.url()),
            title: Some(doc.title()),
            ..Self::now()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl From<CommandError> for ErrorBody {
    fn from(err: CommandError) -> Self {
        Self {
            code: err.code,
            message: err.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    #[serde(rename = "type")]
    pub kind: EnvelopeType,
    pub meta: Meta,
    #[serde(flatten)]
    pub body: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T> Envelope<T> {
    pub fn ok(kind: EnvelopeType, meta: Meta, body: T) -> Self {
        Self {
            ok: true,
            kind,
            meta,
            body,
            error: None,
        }
    }

    pub fn err(kind: EnvelopeType, meta: Meta, body: T, error: CommandError) -> Self {
        Self {
            ok: false,
            kind,
            meta,
            body,
            error: Some(error.into()),
        }
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|e| e.code)
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotOutcome {
    pub version: u32,
    pub url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SnapshotStats>,
    #[serde(default)]
    pub refs: BTreeMap<Ref, RefEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<SnapshotNode>,
}

impl From<Snapshot> for SnapshotOutcome {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            url: snapshot.url,
            title: snapshot.title,
            stats: Some(snapshot.stats),
            refs: snapshot.refs,
            tree: Some(snapshot.tree),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    #[serde(rename = "ref")]
    pub node_ref: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl ActionOutcome {
    pub fn new(node_ref: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            node_ref: node_ref.into(),
            action: action.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    #[serde(rename = "ref")]
    pub node_ref: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
}

impl QueryOutcome {
    pub fn new(node_ref: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            node_ref: node_ref.into(),
            kind: kind.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOutcome {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Whether a history step moved (`back`/`forward`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigated: Option<bool>,
    /// Whether the `wait` condition held before the timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waited_ms: Option<u64>,
}

impl PageOutcome {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }
}

pub type SnapshotEnvelope = Envelope<SnapshotOutcome>;
pub type ActionEnvelope = Envelope<ActionOutcome>;
pub type QueryEnvelope = Envelope<QueryOutcome>;
pub type PageEnvelope = Envelope<PageOutcome>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_flattens_body() {
        let mut body = ActionOutcome::new("e3", "check");
        body.checked = Some(true);
        let env = Envelope::ok(EnvelopeType::Action, Meta::now(), body);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["type"], "action");
        assert_eq!(json["ref"], "e3");
        assert_eq!(json["action"], "check");
        assert_eq!(json["checked"], true);
        assert!(json.get("error").is_none());
        assert!(json.get("values").is_none());
        assert!(json["meta"]["ts"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_err_envelope_keeps_context() {
        let env = Envelope::err(
            EnvelopeType::Query,
            Meta::now(),
            QueryOutcome::new("e9", "text"),
            CommandError::ref_not_found("e9"),
        );
        assert_eq!(env.error_code(), Some(ErrorCode::RefNotFound));
        let json = env.to_value();
        assert_eq!(json["ok"], false);
        assert_eq!(json["ref"], "e9");
        assert_eq!(json["error"]["code"], "ref_not_found");
        assert_eq!(json["error"]["message"], "ref e9 not found");
        assert!(json.get("value").is_none());
    }

    #[test]
    fn test_page_outcome_camel_case() {
        let mut body = PageOutcome::new("info");
        body.scroll_x = Some(0.0);
        body.scroll_y = Some(120.0);
        body.viewport = Some(Viewport::default());
        let json = serde_json::to_value(Envelope::ok(EnvelopeType::Page, Meta::now(), body)).unwrap();
        assert_eq!(json["type"], "page");
        assert_eq!(json["scrollY"], 120.0);
        assert_eq!(json["viewport"]["width"], 1280);
        assert!(json.get("key").is_none());
        assert!(json.get("matched").is_none());

        let mut body = PageOutcome::new("wait");
        body.matched = Some(false);
        body.waited_ms = Some(250);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["matched"], false);
        assert_eq!(json["waitedMs"], 250);
    }

    #[test]
    fn test_envelope_deserializes() {
        let json = serde_json::json!({
            "ok": false,
            "type": "action",
            "meta": { "ts": 5 },
            "ref": "e1",
            "action": "click",
            "error": { "code": "element_blocked", "message": "covered" }
        });
        let env: ActionEnvelope = serde_json::from_value(json).unwrap();
        assert!(!env.ok);
        assert_eq!(env.body.node_ref, "e1");
        assert_eq!(env.error_code(), Some(ErrorCode::ElementBlocked));
    }
}
