//! Tool execution result types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Output content shown to the model.
    pub content: String,

    /// Structured output (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_output: Option<serde_json::Value>,

    /// Error message if execution failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Additional metadata about the execution.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ToolResult {
    /// Create a successful result with text content.
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            structured_output: None,
            error: None,
            metadata: HashMap::new(),
        }
    }

    /// Create a successful result with structured output.
    pub fn success_json(content: impl Into<String>, output: serde_json::Value) -> Self {
        Self {
            structured_output: Some(output),
            ..Self::success(content)
        }
    }

    /// Create an error result.
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            structured_output: None,
            error: Some(error.into()),
            metadata: HashMap::new(),
        }
    }

    /// Attach structured output to any result.
    pub fn with_structured_output(mut self, output: serde_json::Value) -> Self {
        self.structured_output = Some(output);
        self
    }

    /// Add metadata to the result.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_result() {
        let result = ToolResult::success("done");
        assert!(result.success);
        assert_eq!(result.content, "done");
        assert!(result.error.is_none());
    }

    #[test]
    fn test_error_result_keeps_structured_output() {
        let result = ToolResult::error("element_blocked: covered")
            .with_structured_output(serde_json::json!({"ok": false}));
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("element_blocked: covered"));
        assert_eq!(result.structured_output.unwrap()["ok"], false);
    }

    #[test]
    fn test_metadata() {
        let result = ToolResult::success("x").with_metadata("refs", serde_json::json!(3));
        assert_eq!(result.metadata["refs"], 3);
    }
}
