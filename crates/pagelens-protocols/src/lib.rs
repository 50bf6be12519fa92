//! # pagelens protocols
//!
//! Interface definitions shared by the pagelens crates. Contains no
//! implementations.
//!
//! ## Core Traits
//!
//! - [`HostDocument`] - read/write access to the hosted document tree
//! - [`Tool`] - agent-callable operation with a JSON parameter schema

pub mod error;
pub mod host;
pub mod tool;

pub use error::{HostError, ToolError};
pub use host::{
    is_ancestor, ComputedStyle, DomEvent, EventKind, HostDocument, NodeId, Rect, SelectOption,
    Viewport,
};
pub use tool::{Tool, ToolDefinition, ToolResult};
