//! Session errors.

use pagelens_protocols::ToolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The caller stopped waiting; the work itself still runs to completion.
    #[error("Page call timed out after {0} ms")]
    Timeout(u64),

    #[error("Page worker failed: {0}")]
    Worker(String),
}

impl From<SessionError> for ToolError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Timeout(ms) => ToolError::Timeout(ms),
            SessionError::Worker(msg) => ToolError::ExecutionFailed(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = SessionError::Timeout(250);
        assert!(err.to_string().contains("250 ms"));
    }

    #[test]
    fn test_into_tool_error() {
        assert!(matches!(
            ToolError::from(SessionError::Timeout(5)),
            ToolError::Timeout(5)
        ));
        assert!(matches!(
            ToolError::from(SessionError::Worker("panicked".to_string())),
            ToolError::ExecutionFailed(msg) if msg == "panicked"
        ));
    }
}
