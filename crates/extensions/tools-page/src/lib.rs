//! # pagelens page tools
//!
//! Serializes access to one [`PageAgent`](pagelens_core::PageAgent) behind a
//! [`PageSession`] and exposes it to an agent loop as four tools:
//!
//! - `page_snapshot` - build and render a snapshot
//! - `page_act` - run an action on a ref
//! - `page_query` - read from a ref
//! - `page_control` - document-level operations (info, scroll, keys)

mod error;
mod session;
mod tools;

use std::sync::Arc;

use pagelens_protocols::{HostDocument, Tool};

pub use error::SessionError;
pub use session::{PageSession, SessionSettings};
pub use tools::{
    ActParams, ControlParams, PageActTool, PageControlTool, PageQueryTool, PageSnapshotTool,
    QueryParams, SnapshotParams,
};

/// All page tools bound to one session.
pub fn page_tools<D>(session: PageSession<D>) -> Vec<Arc<dyn Tool>>
where
    D: HostDocument + Send + 'static,
{
    vec![
        Arc::new(PageSnapshotTool::new(session.clone())),
        Arc::new(PageActTool::new(session.clone())),
        Arc::new(PageQueryTool::new(session.clone())),
        Arc::new(PageControlTool::new(session)),
    ]
}
