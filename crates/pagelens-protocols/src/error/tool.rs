//! Tool execution errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Parameter validation failed: {0}")]
    ValidationFailed(String),

    #[error("Tool execution timed out after {0} ms")]
    Timeout(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_execution_failed() {
        let err = ToolError::ExecutionFailed("worker panicked".to_string());
        assert!(err.to_string().contains("execution failed"));
    }

    #[test]
    fn test_tool_error_invalid_parameters() {
        let err = ToolError::InvalidParameters("missing field `ref`".to_string());
        assert!(err.to_string().contains("Invalid parameters"));
        assert!(err.to_string().contains("ref"));
    }

    #[test]
    fn test_tool_error_timeout() {
        let err = ToolError::Timeout(2500);
        assert!(err.to_string().contains("2500 ms"));
    }
}
