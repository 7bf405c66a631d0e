//! Structural validation of analysis results
//!
//! The same checks gate inference replies and deterministic output. A
//! result either passes whole or is rejected whole.

use crate::assembler::{MAX_ACTIONS, MAX_DIAGNOSES, MAX_PROBLEMS, MIN_DIAGNOSES};
use crate::error::AnalyzerError;
use dxflow_domain::{AnalysisResult, NodeDetail};
use std::collections::HashSet;

/// Check counts, ranges and referential integrity
pub fn validate_result(result: &AnalysisResult) -> Result<(), AnalyzerError> {
    let reasons = violations(result);
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(AnalyzerError::InvalidResult(reasons.join("; ")))
    }
}

/// Every rule the result breaks, in check order
pub fn violations(result: &AnalysisResult) -> Vec<String> {
    let mut reasons = Vec::new();

    let diagnosis_count = result.diagnoses().count();
    if !(MIN_DIAGNOSES..=MAX_DIAGNOSES).contains(&diagnosis_count) {
        reasons.push(format!(
            "expected {}..={} diagnoses, found {}",
            MIN_DIAGNOSES, MAX_DIAGNOSES, diagnosis_count
        ));
    }
    let action_count = result.actions().count();
    if !(1..=MAX_ACTIONS).contains(&action_count) {
        reasons.push(format!("expected 1..={} next actions, found {}", MAX_ACTIONS, action_count));
    }
    if !(1..=MAX_PROBLEMS).contains(&result.problem_list.len()) {
        reasons.push(format!(
            "expected 1..={} problem list items, found {}",
            MAX_PROBLEMS,
            result.problem_list.len()
        ));
    }

    let mut ids = HashSet::new();
    for node in &result.nodes {
        if node.id.trim().is_empty() {
            reasons.push("node with empty id".to_string());
        } else if !ids.insert(node.id.as_str()) {
            reasons.push(format!("duplicate node id {}", node.id));
        }
        if node.label.trim().is_empty() {
            reasons.push(format!("node {} has an empty label", node.id));
        }
        if let NodeDetail::Diagnosis { likelihood, confidence } = node.detail {
            if !unit_interval(likelihood) || !unit_interval(confidence) {
                reasons.push(format!("node {} has likelihood or confidence outside [0, 1]", node.id));
            }
        }
    }

    let diagnosis_ids: HashSet<&str> = result.diagnoses().map(|n| n.id.as_str()).collect();
    for action in result.actions() {
        if let Some(dx) = action.diagnosis_id() {
            if !diagnosis_ids.contains(dx) {
                reasons.push(format!("action {} references unknown diagnosis {}", action.id, dx));
            }
        }
    }

    let mut edge_ids = HashSet::new();
    for edge in &result.edges {
        if !edge_ids.insert(edge.id.as_str()) {
            reasons.push(format!("duplicate edge id {}", edge.id));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !ids.contains(endpoint.as_str()) {
                reasons.push(format!("edge {} references unknown node {}", edge.id, endpoint));
            }
        }
    }

    let mut problem_ids = HashSet::new();
    for item in &result.problem_list {
        if !problem_ids.insert(item.id.as_str()) {
            reasons.push(format!("duplicate problem id {}", item.id));
        }
        if item.diagnosis.trim().is_empty() || item.code.trim().is_empty() {
            reasons.push(format!("problem {} lacks a diagnosis or code", item.id));
        }
        if !unit_interval(item.likelihood) {
            reasons.push(format!("problem {} has likelihood outside [0, 1]", item.id));
        }
    }

    reasons
}

fn unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::static_fallback;
    use dxflow_domain::{EdgeStrength, GraphEdge, GraphNode, Priority, RelationshipKind};

    #[test]
    fn test_static_fallback_is_valid() {
        assert!(validate_result(&static_fallback()).is_ok());
    }

    #[test]
    fn test_empty_result_is_invalid() {
        let reasons = violations(&AnalysisResult::default());
        assert_eq!(reasons.len(), 3);
    }

    #[test]
    fn test_dangling_references() {
        let mut result = static_fallback();
        result.nodes.push(GraphNode::next_action(
            "action_9",
            "orphan",
            "diagnostic",
            Priority::Low,
            "within 24 hours",
            "dx_9",
        ));
        result.edges.push(GraphEdge::new(
            "edge_9",
            "dx_9",
            "action_9",
            RelationshipKind::Investigates,
            EdgeStrength::Weak,
        ));

        let reasons = violations(&result);
        assert!(reasons.iter().any(|r| r.contains("unknown diagnosis dx_9")));
        assert!(reasons.iter().any(|r| r.contains("unknown node dx_9")));
        assert!(matches!(validate_result(&result), Err(AnalyzerError::InvalidResult(_))));
    }

    #[test]
    fn test_duplicate_ids_and_ranges() {
        let mut result = static_fallback();
        let mut copy = result.nodes[0].clone();
        copy.detail = NodeDetail::Diagnosis {
            likelihood: 1.5,
            confidence: 0.5,
        };
        result.nodes.push(copy);

        let reasons = violations(&result);
        assert!(reasons.iter().any(|r| r.starts_with("duplicate node id")));
        assert!(reasons.iter().any(|r| r.contains("outside [0, 1]")));
    }

    #[test]
    fn test_duplicate_problem_id() {
        let mut result = static_fallback();
        let mut copy = result.problem_list[0].clone();
        copy.diagnosis = "second problem".to_string();
        result.problem_list.push(copy);

        let reasons = violations(&result);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].starts_with("duplicate problem id"));
    }

    #[test]
    fn test_action_pointing_at_action_is_invalid() {
        let mut result = static_fallback();
        result.nodes.push(GraphNode::next_action(
            "action_1",
            "follow-up",
            "consultation",
            Priority::Urgent,
            "immediately",
            "action_0",
        ));
        assert!(validate_result(&result).is_err());
    }

    #[test]
    fn test_too_many_actions() {
        let mut result = static_fallback();
        for i in 1..=MAX_ACTIONS {
            result.nodes.push(GraphNode::next_action(
                format!("action_{}", i),
                "extra",
                "diagnostic",
                Priority::Low,
                "within 24 hours",
                "dx_0",
            ));
        }
        let reasons = violations(&result);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("next actions"));
    }
}
