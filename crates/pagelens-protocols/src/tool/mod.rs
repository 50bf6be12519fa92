//! Tool protocol definitions.
//!
//! Tools are how an agent loop drives a page: each one takes JSON parameters
//! and returns a [`ToolResult`].

mod definition;
mod result;
mod traits;

pub use definition::*;
pub use result::*;
pub use traits::*;
