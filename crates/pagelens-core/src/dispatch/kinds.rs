//! Command vocabularies and payloads.
//!
//! The wire tokens are fixed; parsing an unknown token yields the matching
//! `unsupported_*` error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CommandError, ErrorCode};

macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $code:expr, $what:literal {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CommandError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    other => Err(CommandError::new($code, format!(concat!("unsupported ", $what, ": {}"), other))),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let token = String::deserialize(deserializer)?;
                token.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

token_enum! {
    /// Ref-qualified actions.
    ActionKind, ErrorCode::UnsupportedAction, "action" {
        Click => "click",
        DblClick => "dblclick",
        Fill => "fill",
        Type => "type",
        Select => "select",
        Clear => "clear",
        Focus => "focus",
        Hover => "hover",
        ScrollIntoView => "scroll_into_view",
        Check => "check",
        Uncheck => "uncheck",
    }
}

token_enum! {
    /// Ref-qualified read-only queries.
    QueryKind, ErrorCode::UnsupportedQuery, "query" {
        Text => "text",
        Attrs => "attrs",
        Value => "value",
        Html => "html",
        OuterHtml => "outerHTML",
        ComputedStyles => "computed_styles",
        IsVisible => "isvisible",
        IsEnabled => "isenabled",
        IsChecked => "ischecked",
    }
}

token_enum! {
    /// Document-scoped operations.
    PageKind, ErrorCode::UnsupportedPage, "page" {
        Info => "info",
        Scroll => "scroll",
        PressKey => "pressKey",
        KeyDown => "keyDown",
        KeyUp => "keyUp",
        Char => "char",
        Wait => "wait",
        Open => "open",
        Back => "back",
        Forward => "forward",
        Reload => "reload",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    /// Text for `type`; falls back to `value`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ActionPayload {
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: Some(values.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

pub const DEFAULT_LIMIT_CHARS: usize = 4000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryPayload {
    pub limit_chars: usize,
}

impl Default for QueryPayload {
    fn default() -> Self {
        Self {
            limit_chars: DEFAULT_LIMIT_CHARS,
        }
    }
}

impl QueryPayload {
    pub fn with_limit(limit_chars: usize) -> Self {
        Self { limit_chars }
    }

    /// Limit to apply; zero means the default.
    pub fn effective_limit(&self) -> usize {
        if self.limit_chars == 0 {
            DEFAULT_LIMIT_CHARS
        } else {
            self.limit_chars
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Target of `open`; the URL substring awaited by `wait`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Fixed `wait` delay. Takes priority over every condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_ms: Option<u64>,
}

pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_WAIT_POLL_MS: u64 = 100;

impl PagePayload {
    pub fn scroll_by(dx: f64, dy: f64) -> Self {
        Self {
            delta_x: Some(dx),
            delta_y: Some(dy),
            ..Default::default()
        }
    }

    pub fn scroll_to(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn open(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn wait_for_selector(selector: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            ..Default::default()
        }
    }

    pub fn sleep(ms: u64) -> Self {
        Self {
            ms: Some(ms),
            ..Default::default()
        }
    }

    /// Fixed delay requested by `wait`, if any.
    pub fn fixed_delay_ms(&self) -> Option<u64> {
        self.ms.filter(|ms| *ms > 0)
    }

    pub fn wait_timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_WAIT_TIMEOUT_MS)
    }

    /// Poll interval for `wait`, never below one millisecond.
    pub fn wait_poll_ms(&self) -> u64 {
        self.poll_ms.unwrap_or(DEFAULT_WAIT_POLL_MS).max(1)
    }

    /// Whether `wait` names a condition to poll for.
    pub fn has_wait_condition(&self) -> bool {
        self.selector.is_some() || self.text.is_some() || self.url.is_some()
    }
}
