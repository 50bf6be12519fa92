//! # pagelens core
//!
//! Turns a live [`HostDocument`] into a compact, budget-bounded outline an
//! automated agent can read, and executes ref-qualified commands back into
//! that document.
//!
//! ## Pipeline
//!
//! ```text
//! HostDocument ──► Classifier ──► SnapshotBuilder ──► Snapshot ──► Renderer ──► text
//!                                   │ (RefAllocator)
//!                                   ▼
//!                  Dispatcher ◄── ref table ◄── agent picks "e12"
//! ```
//!
//! - [`classify`] derives role / name / interactivity per node.
//! - [`snapshot`] walks the tree under a node budget and assigns refs.
//! - [`render`] serializes a snapshot under character, depth and node budgets.
//! - [`dispatch`] resolves refs and runs actions, queries and page operations.
//! - [`PageAgent`] ties the above to one document and wraps every result in
//!   an [`envelope`].
//!
//! [`MemoryDocument`] is an in-memory host used by tests and fixtures.

pub mod agent;
pub mod classify;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod memory;
pub mod refs;
pub mod render;
pub mod snapshot;
mod text;

pub use agent::PageAgent;
pub use classify::{ClassificationResult, Classifier, Role};
pub use dispatch::{
    ActionKind, ActionPayload, Dispatcher, PageKind, PagePayload, QueryKind, QueryPayload,
};
pub use envelope::{
    ActionEnvelope, ActionOutcome, Envelope, EnvelopeType, ErrorBody, Meta, PageEnvelope,
    PageOutcome, QueryEnvelope, QueryOutcome, SnapshotEnvelope, SnapshotOutcome,
};
pub use error::{CommandError, ErrorCode};
pub use memory::{DocumentSpec, ElementSpec, MemoryDocument};
pub use refs::{Ref, RefAllocator};
pub use render::{render, render_json, RenderOptions, RenderResult};
pub use snapshot::{
    RefEntry, Snapshot, SnapshotBuilder, SnapshotNode, SnapshotOptions, SnapshotStats,
    TruncateReason, TruncateReasons,
};

pub use pagelens_protocols::{EventKind, HostDocument, NodeId};
