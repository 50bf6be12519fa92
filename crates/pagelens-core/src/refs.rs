//! Short-lived reference tokens.
//!
//! A [`RefAllocator`] owns the per-generation arena mapping `e<N>` tokens to
//! host nodes. [`RefAllocator::reset`] discards the arena wholesale; the
//! counter itself keeps increasing so a token from an older generation can
//! never be re-bound to a different node.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use pagelens_protocols::{HostDocument, NodeId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CommandError;

/// Reference token, rendered as `e<N>`. Orders numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ref(u64);

impl Ref {
    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn index(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl FromStr for Ref {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .strip_prefix('e')
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
            .map(Ref)
            .ok_or_else(|| CommandError::ref_not_found(s))
    }
}

impl Serialize for Ref {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ref {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid ref token: {}", token)))
    }
}

/// Per-session ref arena.
#[derive(Debug, Default)]
pub struct RefAllocator {
    generation: u64,
    epoch: u64,
    next: u64,
    bindings: HashMap<Ref, NodeId>,
}

impl RefAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation: drop every binding and capture the document's
    /// navigation epoch.
    pub fn reset<D: HostDocument + ?Sized>(&mut self, doc: &D) {
        self.bindings.clear();
        self.generation += 1;
        self.epoch = doc.navigation_epoch();
    }

    /// Bind the next token to `node`.
    pub fn allocate(&mut self, node: NodeId) -> Ref {
        self.next += 1;
        let r = Ref(self.next);
        self.bindings.insert(r, node);
        r
    }

    /// Resolve a token to a live node of the current generation.
    pub fn resolve<D: HostDocument + ?Sized>(&self, r: Ref, doc: &D) -> Result<NodeId, CommandError> {
        let node = self
            .bindings
            .get(&r)
            .copied()
            .ok_or_else(|| CommandError::ref_not_found(&r.to_string()))?;
        if doc.navigation_epoch() != self.epoch || !doc.is_connected(node) {
            return Err(CommandError::ref_not_found(&r.to_string()));
        }
        Ok(node)
    }

    /// Parse and resolve a raw token.
    pub fn resolve_str<D: HostDocument + ?Sized>(
        &self,
        token: &str,
        doc: &D,
    ) -> Result<NodeId, CommandError> {
        let r: Ref = token.parse()?;
        self.resolve(r, doc)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of live bindings in the current generation.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
