//! Errors raised by a host document adapter.

use thiserror::Error;

use crate::host::{EventKind, NodeId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("Node {0} is not attached to the document")]
    Detached(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Event '{}' is not supported by this host", .0.as_str())]
    UnsupportedEvent(EventKind),

    #[error("Option index {index} out of range for node {node}")]
    OptionOutOfRange { node: NodeId, index: usize },

    #[error("Host operation failed: {0}")]
    Failed(String),
}
