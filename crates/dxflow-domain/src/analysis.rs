//! Analysis module - the aggregate produced by one analysis run

use crate::graph::{GraphEdge, GraphNode, NodeKind, RelationshipKind};
use crate::layout::LayoutPlan;
use crate::problem::ProblemListItem;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Unique identifier for an analysis run based on UUIDv7
///
/// UUIDv7 sorts chronologically, so later submissions compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(uuid::Uuid);

impl AnalysisId {
    /// Generate a new UUIDv7-based AnalysisId
    ///
    /// # Examples
    ///
    /// ```
    /// use dxflow_domain::AnalysisId;
    ///
    /// let first = AnalysisId::new();
    /// let second = AnalysisId::new();
    /// assert_ne!(first, second);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }
}

/// The nil id; a real id is assigned when an analysis run completes
impl Default for AnalysisId {
    fn default() -> Self {
        Self(uuid::Uuid::nil())
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which path produced an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// Remote inference reply
    Inference,
    /// Rule-based text-to-graph pipeline
    #[default]
    Deterministic,
    /// Minimal two-node "assessment required" graph
    StaticFallback,
}

impl AnalysisSource {
    /// Get the source name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisSource::Inference => "inference",
            AnalysisSource::Deterministic => "deterministic",
            AnalysisSource::StaticFallback => "static_fallback",
        }
    }
}

/// Metadata about an analysis run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    /// Run identifier
    pub analysis_id: AnalysisId,

    /// Path that produced the graph
    pub source: AnalysisSource,

    /// Unix timestamp (seconds) when the run finished
    pub generated_at: u64,

    /// Name of the inference model consulted, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Length of the submitted note in characters
    pub note_length: usize,

    /// Number of inference calls made
    pub inference_attempts: u32,

    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: u64,

    /// Layout chosen for the graph
    pub layout: LayoutPlan,

    /// Human-readable notes (fallback reasons)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// The top-level result of one analysis run
///
/// Owned by the caller. A new submission replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Diagnosis and next-action nodes
    pub nodes: Vec<GraphNode>,

    /// Relationships between nodes
    pub edges: Vec<GraphEdge>,

    /// Coded problem list
    pub problem_list: Vec<ProblemListItem>,

    /// Run metadata
    #[serde(default)]
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Diagnosis nodes, in order
    pub fn diagnoses(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.kind() == NodeKind::Diagnosis)
    }

    /// Next-action nodes, in order
    pub fn actions(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.kind() == NodeKind::NextAction)
    }

    /// Set of node ids
    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Distinct relationship kinds present in the edge set
    pub fn edge_kinds(&self) -> HashSet<RelationshipKind> {
        self.edges.iter().map(|e| e.kind).collect()
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
