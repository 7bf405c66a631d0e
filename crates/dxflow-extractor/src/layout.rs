//! Layout selection and initial coordinates

use dxflow_domain::{
    ClusterCenter, GraphEdge, GraphNode, LayoutAlgorithm, LayoutPlan, NodeKind, Position,
    RelationshipKind,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::f64::consts::PI;

/// Largest graph drawn with plain force-directed layout
pub const SMALL_GRAPH_MAX: usize = 5;
/// Largest graph eligible for hierarchical layout
pub const MEDIUM_GRAPH_MAX: usize = 15;

const NODE_SPACING: f64 = 120.0;
const LAYER_SPACING: f64 = 150.0;
const CLUSTER_SPACING: f64 = 400.0;
const MIN_RADIUS: f64 = 150.0;
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Choose a layout from graph size and the relationship kinds present
///
/// Pure: the same input always yields the same plan.
pub fn select_layout(node_count: usize, edge_kinds: &HashSet<RelationshipKind>) -> LayoutPlan {
    if node_count <= SMALL_GRAPH_MAX {
        LayoutPlan::new(LayoutAlgorithm::ForceDirected)
    } else if node_count <= MEDIUM_GRAPH_MAX && edge_kinds.iter().any(RelationshipKind::is_sequential) {
        LayoutPlan::new(LayoutAlgorithm::Hierarchical)
    } else if node_count > MEDIUM_GRAPH_MAX {
        LayoutPlan {
            clustering: true,
            ..LayoutPlan::new(LayoutAlgorithm::ForceDirected)
        }
    } else {
        LayoutPlan::new(LayoutAlgorithm::ForceDirected)
    }
}

/// Plan for a configured algorithm override
///
/// Large force-directed graphs still get clustering.
pub fn forced(algorithm: LayoutAlgorithm, node_count: usize) -> LayoutPlan {
    LayoutPlan {
        clustering: algorithm == LayoutAlgorithm::ForceDirected && node_count > MEDIUM_GRAPH_MAX,
        ..LayoutPlan::new(algorithm)
    }
}

/// Compute deterministic initial coordinates for every node
///
/// Fills in `plan.cluster_centers` when clustering is enabled.
pub fn arrange(plan: &mut LayoutPlan, nodes: &mut [GraphNode], edges: &[GraphEdge]) {
    plan.cluster_centers.clear();
    match plan.algorithm {
        LayoutAlgorithm::ForceDirected if plan.clustering => {
            plan.cluster_centers = clustered(nodes);
        }
        LayoutAlgorithm::ForceDirected => spiral(nodes.iter_mut(), Position::default(), NODE_SPACING),
        LayoutAlgorithm::Hierarchical => layered(nodes, edges),
        LayoutAlgorithm::Circular => circular(nodes),
        LayoutAlgorithm::Grid => grid(nodes),
    }
}

fn spiral<'a>(nodes: impl Iterator<Item = &'a mut GraphNode>, center: Position, spacing: f64) {
    for (i, node) in nodes.enumerate() {
        let radius = spacing * (i as f64 + 0.5).sqrt();
        let angle = i as f64 * GOLDEN_ANGLE;
        node.position = Position::new(center.x + radius * angle.cos(), center.y + radius * angle.sin());
    }
}

fn clustered(nodes: &mut [GraphNode]) -> Vec<ClusterCenter> {
    let groups: Vec<NodeKind> = {
        let mut kinds: Vec<NodeKind> = nodes.iter().map(GraphNode::kind).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    };
    let offset = (groups.len() as f64 - 1.0) / 2.0;

    groups
        .iter()
        .enumerate()
        .map(|(g, kind)| {
            let center = Position::new((g as f64 - offset) * CLUSTER_SPACING, 0.0);
            spiral(
                nodes.iter_mut().filter(|n| n.kind() == *kind),
                center,
                NODE_SPACING / 2.0,
            );
            ClusterCenter {
                group: kind.as_str().to_string(),
                x: center.x,
                y: center.y,
            }
        })
        .collect()
}

/// Depth of each node along edges, bounded by the node count so cycles terminate
fn depths(nodes: &[GraphNode], edges: &[GraphEdge]) -> HashMap<String, usize> {
    let mut depth: HashMap<String, usize> = nodes.iter().map(|n| (n.id.clone(), 0)).collect();
    let limit = nodes.len();

    for _ in 0..limit {
        let mut changed = false;
        for edge in edges {
            let (Some(&from), Some(&to)) = (depth.get(&edge.source), depth.get(&edge.target)) else {
                continue;
            };
            if to < from + 1 && from < limit {
                depth.insert(edge.target.clone(), from + 1);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    depth
}

fn layered(nodes: &mut [GraphNode], edges: &[GraphEdge]) {
    let depth = depths(nodes, edges);
    let mut layers: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, node) in nodes.iter().enumerate() {
        layers.entry(depth[&node.id]).or_default().push(i);
    }

    for (level, members) in layers {
        let offset = (members.len() as f64 - 1.0) / 2.0;
        for (slot, i) in members.into_iter().enumerate() {
            nodes[i].position = Position::new(
                (slot as f64 - offset) * NODE_SPACING,
                level as f64 * LAYER_SPACING,
            );
        }
    }
}

fn circular(nodes: &mut [GraphNode]) {
    let n = nodes.len();
    if n == 1 {
        nodes[0].position = Position::default();
        return;
    }
    let radius = (n as f64 * NODE_SPACING / (2.0 * PI)).max(MIN_RADIUS);
    for (i, node) in nodes.iter_mut().enumerate() {
        let angle = 2.0 * PI * i as f64 / n as f64;
        node.position = Position::new(radius * angle.cos(), radius * angle.sin());
    }
}

fn grid(nodes: &mut [GraphNode]) {
    let n = nodes.len();
    if n == 0 {
        return;
    }
    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    let x_offset = (cols as f64 - 1.0) / 2.0;
    let y_offset = (rows as f64 - 1.0) / 2.0;
    for (i, node) in nodes.iter_mut().enumerate() {
        let (row, col) = (i / cols, i % cols);
        node.position = Position::new(
            (col as f64 - x_offset) * NODE_SPACING,
            (row as f64 - y_offset) * NODE_SPACING,
        );
    }
}
