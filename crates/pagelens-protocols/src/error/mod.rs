//! Error types for the protocol layer.

mod host;
mod tool;

pub use host::*;
pub use tool::*;
