//! Last-resort result when no other path yields a valid graph

use crate::assembler::timing_for;
use crate::lexicon::UNSPECIFIED_CODE;
use dxflow_domain::{
    AnalysisMetadata, AnalysisResult, AnalysisSource, EdgeStrength, GraphEdge, GraphNode,
    Priority, ProblemListItem, ProblemStatus, RelationshipKind,
};

const ASSESSMENT_LABEL: &str = "clinical assessment required";

/// Minimal two-node graph asking for clinician review
pub fn static_fallback() -> AnalysisResult {
    let evidence = vec!["Automated analysis unavailable".to_string()];

    AnalysisResult {
        nodes: vec![
            GraphNode::diagnosis("dx_0", ASSESSMENT_LABEL, "emergency", 1.0, 0.5)
                .with_evidence(evidence.clone()),
            GraphNode::next_action(
                "action_0",
                "emergency clinical evaluation",
                "consultation",
                Priority::Urgent,
                timing_for(Priority::Urgent),
                "dx_0",
            )
            .with_evidence(evidence.clone()),
        ],
        edges: vec![GraphEdge::new(
            "edge_0",
            "dx_0",
            "action_0",
            RelationshipKind::Investigates,
            EdgeStrength::Moderate,
        )],
        problem_list: vec![ProblemListItem {
            id: "problem_0".to_string(),
            diagnosis: ASSESSMENT_LABEL.to_string(),
            code: UNSPECIFIED_CODE.to_string(),
            likelihood: 1.0,
            category: "acute".to_string(),
            evidence,
            status: ProblemStatus::Active,
        }],
        metadata: AnalysisMetadata {
            source: AnalysisSource::StaticFallback,
            ..AnalysisMetadata::default()
        },
    }
}
