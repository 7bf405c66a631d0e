//! Layout plan module - how the renderer should draw a graph

use serde::{Deserialize, Serialize};

/// Graph drawing algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithm {
    /// Physics simulation seeded with initial coordinates (default)
    #[default]
    ForceDirected,
    /// Layered top-to-bottom drawing
    Hierarchical,
    /// Nodes on a ring
    Circular,
    /// Nodes on a square grid
    Grid,
}

impl LayoutAlgorithm {
    /// Get the algorithm name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutAlgorithm::ForceDirected => "force_directed",
            LayoutAlgorithm::Hierarchical => "hierarchical",
            LayoutAlgorithm::Circular => "circular",
            LayoutAlgorithm::Grid => "grid",
        }
    }
}

impl std::fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Center of one node cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterCenter {
    /// Group name (the node kind)
    pub group: String,
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

/// Chosen layout algorithm plus its parameters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    /// Drawing algorithm
    pub algorithm: LayoutAlgorithm,

    /// Whether nodes are pulled toward per-group cluster centers
    pub clustering: bool,

    /// Cluster centers, empty unless clustering is enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_centers: Vec<ClusterCenter>,
}

impl LayoutPlan {
    /// Create a plan without clustering
    pub fn new(algorithm: LayoutAlgorithm) -> Self {
        Self {
            algorithm,
            clustering: false,
            cluster_centers: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan() {
        let plan = LayoutPlan::default();
        assert_eq!(plan.algorithm, LayoutAlgorithm::ForceDirected);
        assert!(!plan.clustering);
        assert!(plan.cluster_centers.is_empty());
    }
}
