//! Build statistics and truncation reasons.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which budget cut the output short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TruncateReason {
    MaxNodes,
    MaxCharsTotal,
    MaxDepth,
}

impl TruncateReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TruncateReason::MaxNodes => "maxNodes",
            TruncateReason::MaxCharsTotal => "maxCharsTotal",
            TruncateReason::MaxDepth => "maxDepth",
        }
    }
}

/// Insertion-ordered set of reasons. Reasons only accumulate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TruncateReasons(Vec<TruncateReason>);

impl TruncateReasons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reason: TruncateReason) {
        if !self.0.contains(&reason) {
            self.0.push(reason);
        }
    }

    pub fn union(&mut self, other: &TruncateReasons) {
        for reason in &other.0 {
            self.insert(*reason);
        }
    }

    pub fn contains(&self, reason: TruncateReason) -> bool {
        self.0.contains(&reason)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = TruncateReason> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<TruncateReason> for TruncateReasons {
    fn from_iter<I: IntoIterator<Item = TruncateReason>>(iter: I) -> Self {
        let mut reasons = Self::new();
        for reason in iter {
            reasons.insert(reason);
        }
        reasons
    }
}

/// Counters collected during one build.
///
/// Each counter exists once; the legacy field names (`visitedNodes`,
/// `emittedNodes`) are produced from the same value at serialization time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotStats {
    pub dom_nodes: usize,
    pub visited: usize,
    pub emitted: usize,
    pub skipped_hidden: usize,
    pub elapsed_ms: u64,
    pub truncate_reasons: TruncateReasons,
}

impl SnapshotStats {
    pub fn truncated(&self) -> bool {
        !self.truncate_reasons.is_empty()
    }
}

impl Serialize for SnapshotStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SnapshotStats", 9)?;
        state.serialize_field("domNodes", &self.dom_nodes)?;
        state.serialize_field("nodesVisited", &self.visited)?;
        state.serialize_field("visitedNodes", &self.visited)?;
        state.serialize_field("nodesEmitted", &self.emitted)?;
        state.serialize_field("emittedNodes", &self.emitted)?;
        state.serialize_field("skippedHidden", &self.skipped_hidden)?;
        state.serialize_field("elapsedMs", &self.elapsed_ms)?;
        state.serialize_field("truncated", &self.truncated())?;
        state.serialize_field("truncateReasons", &self.truncate_reasons)?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsWire {
    #[serde(default)]
    dom_nodes: usize,
    nodes_visited: Option<usize>,
    visited_nodes: Option<usize>,
    nodes_emitted: Option<usize>,
    emitted_nodes: Option<usize>,
    #[serde(default)]
    skipped_hidden: usize,
    #[serde(default)]
    elapsed_ms: u64,
    #[serde(default)]
    truncate_reasons: TruncateReasons,
}

impl<'de> Deserialize<'de> for SnapshotStats {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = StatsWire::deserialize(deserializer)?;
        Ok(SnapshotStats {
            dom_nodes: wire.dom_nodes,
            visited: wire.nodes_visited.or(wire.visited_nodes).unwrap_or_default(),
            emitted: wire.nodes_emitted.or(wire.emitted_nodes).unwrap_or_default(),
            skipped_hidden: wire.skipped_hidden,
            elapsed_ms: wire.elapsed_ms,
            truncate_reasons: wire.truncate_reasons,
        })
    }
}
