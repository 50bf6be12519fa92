//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Below this, most accessible names are cut to a few characters.
const MIN_USEFUL_TEXT_PER_NODE: usize = 8;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// First error as a [`ConfigError`], if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();
        Self::validate_snapshot(config, &mut result);
        Self::validate_render(config, &mut result);
        Self::validate_query(config, &mut result);
        Self::validate_session(config, &mut result);
        result
    }

    fn require_positive(result: &mut ValidationResult, path: &str, value: u64) {
        if value == 0 {
            result.add_error(ValidationError::new(path, "must be greater than 0"));
        }
    }

    fn validate_snapshot(config: &Config, result: &mut ValidationResult) {
        let snapshot = &config.snapshot;
        Self::require_positive(result, "snapshot.max_nodes", snapshot.max_nodes as u64);
        Self::require_positive(
            result,
            "snapshot.max_text_per_node",
            snapshot.max_text_per_node as u64,
        );
        Self::require_positive(
            result,
            "snapshot.max_attr_value_len",
            snapshot.max_attr_value_len as u64,
        );

        if snapshot.max_text_per_node > 0 && snapshot.max_text_per_node < MIN_USEFUL_TEXT_PER_NODE {
            result.add_warning(ValidationWarning::new(
                "snapshot.max_text_per_node",
                format!(
                    "max_text_per_node is very low (<{}), names will be mostly ellipsis",
                    MIN_USEFUL_TEXT_PER_NODE
                ),
            ));
        }

        if snapshot.scope.as_deref().is_some_and(|s| s.trim().is_empty()) {
            result.add_warning(ValidationWarning::new(
                "snapshot.scope",
                "scope is blank and will be ignored",
            ));
        }
    }

    fn validate_render(config: &Config, result: &mut ValidationResult) {
        let render = &config.render;
        Self::require_positive(result, "render.max_chars_total", render.max_chars_total as u64);
        Self::require_positive(result, "render.max_nodes", render.max_nodes as u64);
        Self::require_positive(result, "render.max_depth", render.max_depth as u64);
    }

    fn validate_query(config: &Config, result: &mut ValidationResult) {
        Self::require_positive(result, "query.limit_chars", config.query.limit_chars as u64);
    }

    fn validate_session(config: &Config, result: &mut ValidationResult) {
        Self::require_positive(result, "session.timeout_ms", config.session.timeout_ms);
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
