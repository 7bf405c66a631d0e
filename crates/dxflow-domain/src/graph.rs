//! Graph module - renderable workflow nodes and edges

use serde::{Deserialize, Serialize};

/// Kind of workflow node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Candidate diagnosis
    Diagnosis,
    /// Recommended next action
    NextAction,
}

impl NodeKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Diagnosis => "diagnosis",
            NodeKind::NextAction => "next_action",
        }
    }
}

/// Urgency of a next action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Do now
    Urgent,
    /// Do soon
    High,
    /// Do within the hour
    Medium,
    /// Do within the day
    Low,
}

impl Priority {
    /// Get the priority name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// Node coordinates in renderer space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Kind-specific node attributes
///
/// Serialized inline with the node, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeDetail {
    /// Attributes of a diagnosis node
    Diagnosis {
        /// How plausible the diagnosis is [0.0, 1.0]
        likelihood: f64,
        /// Certainty about the likelihood [0.0, 1.0]
        confidence: f64,
    },
    /// Attributes of a next-action node
    NextAction {
        /// How urgently the action should happen
        priority: Priority,
        /// Human-readable time frame ("within 1 hour")
        timing: String,
        /// Diagnosis node this action serves
        #[serde(rename = "diagnosisId")]
        diagnosis_id: String,
    },
}

/// A node in the workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Identifier, unique within one analysis
    pub id: String,

    /// Display label
    pub label: String,

    /// Free-form category used for styling (clinical system or action type)
    pub category: String,

    /// Ordered supporting statements
    #[serde(default)]
    pub evidence: Vec<String>,

    /// Coordinates, overwritten by layout
    #[serde(default)]
    pub position: Position,

    /// Kind and kind-specific attributes
    #[serde(flatten)]
    pub detail: NodeDetail,
}

impl GraphNode {
    /// Create a diagnosis node
    pub fn diagnosis(
        id: impl Into<String>,
        label: impl Into<String>,
        category: impl Into<String>,
        likelihood: f64,
        confidence: f64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category: category.into(),
            evidence: Vec::new(),
            position: Position::default(),
            detail: NodeDetail::Diagnosis {
                likelihood,
                confidence,
            },
        }
    }

    /// Create a next-action node attached to a diagnosis
    pub fn next_action(
        id: impl Into<String>,
        label: impl Into<String>,
        category: impl Into<String>,
        priority: Priority,
        timing: impl Into<String>,
        diagnosis_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category: category.into(),
            evidence: Vec::new(),
            position: Position::default(),
            detail: NodeDetail::NextAction {
                priority,
                timing: timing.into(),
                diagnosis_id: diagnosis_id.into(),
            },
        }
    }

    /// Attach evidence statements
    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }

    /// Kind of this node
    pub fn kind(&self) -> NodeKind {
        match self.detail {
            NodeDetail::Diagnosis { .. } => NodeKind::Diagnosis,
            NodeDetail::NextAction { .. } => NodeKind::NextAction,
        }
    }

    /// Diagnosis likelihood, if this is a diagnosis node
    pub fn likelihood(&self) -> Option<f64> {
        match self.detail {
            NodeDetail::Diagnosis { likelihood, .. } => Some(likelihood),
            NodeDetail::NextAction { .. } => None,
        }
    }

    /// Referenced diagnosis id, if this is a next-action node
    pub fn diagnosis_id(&self) -> Option<&str> {
        match &self.detail {
            NodeDetail::NextAction { diagnosis_id, .. } => Some(diagnosis_id),
            NodeDetail::Diagnosis { .. } => None,
        }
    }
}

/// Type of relationship between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Target supports the source diagnosis
    Confirms,
    /// Target argues against the source diagnosis
    #[serde(rename = "rules-out")]
    RulesOut,
    /// Target observes the source over time
    Monitors,
    /// Target treats the source
    Treats,
    /// Target works up the source
    Investigates,
}

impl RelationshipKind {
    /// All relationship kinds, in declaration order
    pub const ALL: [RelationshipKind; 5] = [
        RelationshipKind::Confirms,
        RelationshipKind::RulesOut,
        RelationshipKind::Monitors,
        RelationshipKind::Treats,
        RelationshipKind::Investigates,
    ];

    /// Get the kind name as a string (also the default edge label)
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::Confirms => "confirms",
            RelationshipKind::RulesOut => "rules-out",
            RelationshipKind::Monitors => "monitors",
            RelationshipKind::Treats => "treats",
            RelationshipKind::Investigates => "investigates",
        }
    }

    /// Whether the edge leads from a diagnosis to its next step
    ///
    /// Graphs containing sequential edges read naturally as layers.
    pub fn is_sequential(&self) -> bool {
        matches!(
            self,
            RelationshipKind::Monitors | RelationshipKind::Treats | RelationshipKind::Investigates
        )
    }
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength of a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStrength {
    /// Tentative link
    Weak,
    /// Default link strength
    Moderate,
    /// Well-established link
    Strong,
}

impl EdgeStrength {
    /// Get the strength name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeStrength::Weak => "weak",
            EdgeStrength::Moderate => "moderate",
            EdgeStrength::Strong => "strong",
        }
    }
}

/// A directed edge between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Identifier, unique within one analysis
    pub id: String,

    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Type of relationship
    pub kind: RelationshipKind,

    /// Display label
    pub label: String,

    /// Strength of relationship
    pub strength: EdgeStrength,
}

impl GraphEdge {
    /// Create a new edge labelled with its kind name
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        kind: RelationshipKind,
        strength: EdgeStrength,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind,
            label: kind.as_str().to_string(),
            strength,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_kind() {
        let dx = GraphNode::diagnosis("dx_0", "pneumonia", "pulmonary", 0.7, 0.8);
        assert_eq!(dx.kind(), NodeKind::Diagnosis);
        assert_eq!(dx.likelihood(), Some(0.7));
        assert_eq!(dx.diagnosis_id(), None);

        let action = GraphNode::next_action(
            "action_0",
            "chest x-ray",
            "diagnostic",
            Priority::Urgent,
            "immediately",
            "dx_0",
        );
        assert_eq!(action.kind(), NodeKind::NextAction);
        assert_eq!(action.diagnosis_id(), Some("dx_0"));
    }

    #[test]
    fn test_node_serializes_flat() {
        let action = GraphNode::next_action(
            "action_1",
            "ECG",
            "diagnostic",
            Priority::High,
            "within 30 minutes",
            "dx_1",
        );
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["kind"], "next_action");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["diagnosisId"], "dx_1");
        assert_eq!(value["position"]["x"], 0.0);
    }

    #[test]
    fn test_node_deserializes_without_position() {
        let value = json!({
            "id": "dx_0",
            "label": "sepsis",
            "kind": "diagnosis",
            "category": "infectious",
            "likelihood": 0.7,
            "confidence": 0.85
        });
        let node: GraphNode = serde_json::from_value(value).unwrap();
        assert_eq!(node.kind(), NodeKind::Diagnosis);
        assert!(node.evidence.is_empty());
        assert_eq!(node.position, Position::default());
    }

    #[test]
    fn test_relationship_names() {
        assert_eq!(
            serde_json::to_string(&RelationshipKind::RulesOut).unwrap(),
            "\"rules-out\""
        );
        for kind in RelationshipKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_sequential_kinds() {
        assert!(RelationshipKind::Investigates.is_sequential());
        assert!(RelationshipKind::Treats.is_sequential());
        assert!(!RelationshipKind::Confirms.is_sequential());
        assert!(!RelationshipKind::RulesOut.is_sequential());
    }

    #[test]
    fn test_edge_label_follows_kind() {
        let edge = GraphEdge::new("edge_0", "dx_0", "action_0", RelationshipKind::Treats, EdgeStrength::Moderate);
        assert_eq!(edge.label, "treats");
    }
}
