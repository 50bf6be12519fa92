//! Command error taxonomy.
//!
//! Codes fall into three groups:
//!
//! - structural resolution (`no_root`, `ref_not_found`): take a new snapshot
//!   before retrying;
//! - interaction preconditions (`element_blocked`, `not_checkable`,
//!   `not_uncheckable`, `not_a_select`): fix the precondition and retry;
//! - unsupported operations: caller error, not retryable.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable error code. Serializes to the exact wire token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NoRoot,
    RefNotFound,
    ElementBlocked,
    NotCheckable,
    NotUncheckable,
    NotASelect,
    UnsupportedAction,
    UnsupportedQuery,
    UnsupportedPage,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoRoot => "no_root",
            ErrorCode::RefNotFound => "ref_not_found",
            ErrorCode::ElementBlocked => "element_blocked",
            ErrorCode::NotCheckable => "not_checkable",
            ErrorCode::NotUncheckable => "not_uncheckable",
            ErrorCode::NotASelect => "not_a_select",
            ErrorCode::UnsupportedAction => "unsupported_action",
            ErrorCode::UnsupportedQuery => "unsupported_query",
            ErrorCode::UnsupportedPage => "unsupported_page",
        }
    }

    /// Whether the caller must re-acquire context with a fresh snapshot.
    pub fn needs_new_snapshot(&self) -> bool {
        matches!(self, ErrorCode::NoRoot | ErrorCode::RefNotFound)
    }

    /// Whether retrying the same logical step can succeed once the page state
    /// changes.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            ErrorCode::UnsupportedAction | ErrorCode::UnsupportedQuery | ErrorCode::UnsupportedPage
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed command, carried inside an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct CommandError {
    pub code: ErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn ref_not_found(r: &str) -> Self {
        Self::new(ErrorCode::RefNotFound, format!("ref {} not found", r))
    }
}
