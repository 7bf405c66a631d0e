//! Workflow assembly: concepts to nodes, edges and a problem list
//!
//! The assembler is total. Whatever the extraction produced, it emits at
//! least `MIN_DIAGNOSES` diagnoses, at most `MAX_ACTIONS` actions (exactly
//! that many on this path) and a non-empty problem list.

use crate::differential::Synthesis;
use crate::lexicon;
use dxflow_domain::{
    AnalysisResult, Concept, ConceptCategory, EdgeStrength, GraphEdge, GraphNode, Priority,
    ProblemListItem, ProblemStatus, RelationshipKind,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Minimum number of diagnosis nodes
pub const MIN_DIAGNOSES: usize = 1;
/// Maximum number of diagnosis nodes
pub const MAX_DIAGNOSES: usize = 8;
/// Maximum extracted diagnoses taken before differentials
pub const MAX_EXTRACTED_DIAGNOSES: usize = 4;
/// Maximum number of next-action nodes
pub const MAX_ACTIONS: usize = 8;
/// Maximum number of problem-list items
pub const MAX_PROBLEMS: usize = 8;
/// Maximum diagnoses carried into the problem list
pub const MAX_PROBLEM_DIAGNOSES: usize = 4;

/// Per-category quotas for extracted action concepts, in emission order
const ACTION_QUOTAS: [(ConceptCategory, usize); 4] = [
    (ConceptCategory::Test, 3),
    (ConceptCategory::Treatment, 2),
    (ConceptCategory::Monitoring, 2),
    (ConceptCategory::Assessment, 1),
];

/// Baseline workup appended after extracted actions
const EVIDENCE_BASED_ACTIONS: [(&str, ConceptCategory); 8] = [
    ("metabolic panel", ConceptCategory::Test),
    ("cbc", ConceptCategory::Test),
    ("chest x-ray", ConceptCategory::Test),
    ("ecg", ConceptCategory::Test),
    ("vital signs monitoring", ConceptCategory::Monitoring),
    ("pain assessment", ConceptCategory::Assessment),
    ("iv access", ConceptCategory::Treatment),
    ("oxygen therapy", ConceptCategory::Treatment),
];

/// Diagnosis used when nothing else qualifies
const FALLBACK_DIAGNOSES: [(&str, f64); 1] = [("undifferentiated presentation", 0.5)];

/// Kind of work a next action represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionCategory {
    /// Tests and studies
    Diagnostic,
    /// Treatments
    Therapeutic,
    /// Ongoing observation
    Monitoring,
    /// Assessments, triage and anything else
    Consultation,
}

impl ActionCategory {
    /// Map a concept category to an action category
    pub fn from_concept(category: ConceptCategory) -> Self {
        match category {
            ConceptCategory::Test => ActionCategory::Diagnostic,
            ConceptCategory::Treatment => ActionCategory::Therapeutic,
            ConceptCategory::Monitoring => ActionCategory::Monitoring,
            _ => ActionCategory::Consultation,
        }
    }

    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionCategory::Diagnostic => "diagnostic",
            ActionCategory::Therapeutic => "therapeutic",
            ActionCategory::Monitoring => "monitoring",
            ActionCategory::Consultation => "consultation",
        }
    }

    /// Relationship from a diagnosis to an action of this category
    pub fn relationship(&self) -> RelationshipKind {
        match self {
            ActionCategory::Diagnostic => RelationshipKind::Investigates,
            ActionCategory::Therapeutic => RelationshipKind::Treats,
            ActionCategory::Monitoring => RelationshipKind::Monitors,
            ActionCategory::Consultation => RelationshipKind::Investigates,
        }
    }
}

/// Priority of the action at `index` in the action list
pub fn priority_for(category: ActionCategory, index: usize) -> Priority {
    match category {
        ActionCategory::Consultation => Priority::Urgent,
        _ if index == 0 => Priority::Urgent,
        ActionCategory::Diagnostic if index < 3 => Priority::High,
        ActionCategory::Therapeutic => Priority::Medium,
        _ => Priority::Low,
    }
}

/// Human-readable time frame for a priority
pub fn timing_for(priority: Priority) -> &'static str {
    match priority {
        Priority::Urgent => "immediately",
        Priority::High => "within 30 minutes",
        Priority::Medium => "within 1 hour",
        Priority::Low => "within 24 hours",
    }
}

/// Source of diagnosis confidence values
///
/// Never draws from unseeded randomness, so identical input always yields
/// an identical graph.
#[derive(Debug, Clone)]
pub enum ConfidenceScorer {
    /// Linear decay from 0.9 for the first diagnosis to 0.7 for the last slot
    Ranked,
    /// `0.7 + U(0, 0.2)` from a seeded generator
    Seeded(StdRng),
}

impl ConfidenceScorer {
    /// Ranked decay scorer
    pub fn ranked() -> Self {
        ConfidenceScorer::Ranked
    }

    /// Seeded jitter scorer
    pub fn seeded(seed: u64) -> Self {
        ConfidenceScorer::Seeded(StdRng::seed_from_u64(seed))
    }

    /// Confidence for the diagnosis at `rank` (0-based)
    pub fn score(&mut self, rank: usize) -> f64 {
        let raw = match self {
            ConfidenceScorer::Ranked => {
                let rank = rank.min(MAX_DIAGNOSES - 1) as f64;
                0.9 - 0.2 * rank / (MAX_DIAGNOSES - 1) as f64
            }
            ConfidenceScorer::Seeded(rng) => 0.7 + rng.gen_range(0.0..0.2),
        };
        (raw * 1000.0).round() / 1000.0
    }
}

struct Candidate {
    concept: Concept,
    evidence: String,
}

/// Assemble a workflow graph from extracted and synthesized concepts
///
/// Positions are left at the origin and metadata at its defaults; the
/// caller applies a layout and fills in run metadata.
pub fn assemble(
    extracted: &[Concept],
    synthesis: &Synthesis,
    scorer: &mut ConfidenceScorer,
) -> AnalysisResult {
    let diagnoses = diagnosis_candidates(extracted, synthesis);
    let actions = action_candidates(extracted);

    let mut nodes: Vec<GraphNode> = diagnoses
        .iter()
        .enumerate()
        .map(|(rank, candidate)| {
            let label = candidate.concept.label();
            GraphNode::diagnosis(
                format!("dx_{}", rank),
                label,
                lexicon::system_for(label).unwrap_or("general"),
                candidate.concept.weight(),
                scorer.score(rank),
            )
            .with_evidence(vec![candidate.evidence.clone()])
        })
        .collect();

    let mut edges = Vec::with_capacity(actions.len());
    for (index, candidate) in actions.iter().enumerate() {
        let target = &nodes[index % diagnoses.len()];
        let dx_id = target.id.clone();
        let dx_label = target.label.clone();

        let category = ActionCategory::from_concept(candidate.concept.category());
        let priority = priority_for(category, index);
        let action_id = format!("action_{}", index);

        edges.push(GraphEdge::new(
            format!("edge_{}", index),
            dx_id.clone(),
            action_id.clone(),
            category.relationship(),
            EdgeStrength::Moderate,
        ));
        nodes.push(
            GraphNode::next_action(
                action_id,
                candidate.concept.label(),
                category.as_str(),
                priority,
                timing_for(priority),
                dx_id,
            )
            .with_evidence(vec![
                candidate.evidence.clone(),
                format!("Supports evaluation of {}", dx_label),
            ]),
        );
    }

    let problem_list = problem_list(&nodes, synthesis);

    AnalysisResult {
        nodes,
        edges,
        problem_list,
        metadata: Default::default(),
    }
}

fn diagnosis_candidates(extracted: &[Concept], synthesis: &Synthesis) -> Vec<Candidate> {
    let stated = extracted
        .iter()
        .filter(|c| c.category() == ConceptCategory::Diagnosis)
        .take(MAX_EXTRACTED_DIAGNOSES)
        .map(|c| Candidate {
            concept: c.clone(),
            evidence: format!("Stated in note: {}", c.label()),
        });
    let differentials = synthesis.differentials.iter().map(|d| Candidate {
        concept: d.concept.clone(),
        evidence: format!("Differential for {}", d.trigger),
    });

    let mut candidates = unique_candidates(stated.chain(differentials), MAX_DIAGNOSES);
    if candidates.len() < MIN_DIAGNOSES {
        let pool = FALLBACK_DIAGNOSES.iter().map(|(label, likelihood)| Candidate {
            concept: Concept::new(*label, ConceptCategory::Diagnosis, *likelihood),
            evidence: "No specific diagnosis identified in note".to_string(),
        });
        candidates.extend(pool.take(MIN_DIAGNOSES - candidates.len()));
    }
    candidates
}

fn action_candidates(extracted: &[Concept]) -> Vec<Candidate> {
    let from_note = ACTION_QUOTAS.iter().flat_map(|(category, quota)| {
        extracted
            .iter()
            .filter(move |c| c.category() == *category)
            .take(*quota)
            .map(|c| Candidate {
                concept: c.clone(),
                evidence: "Mentioned in note".to_string(),
            })
    });
    let baseline = EVIDENCE_BASED_ACTIONS.iter().map(|(label, category)| Candidate {
        concept: Concept::new(*label, *category, 0.5),
        evidence: "Evidence-based baseline workup".to_string(),
    });

    unique_candidates(from_note.chain(baseline), MAX_ACTIONS)
}

fn unique_candidates(candidates: impl Iterator<Item = Candidate>, limit: usize) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .filter(|c| seen.insert(c.concept.key()))
        .take(limit)
        .collect()
}

fn problem_list(nodes: &[GraphNode], synthesis: &Synthesis) -> Vec<ProblemListItem> {
    let acute = nodes
        .iter()
        .filter_map(|n| n.likelihood().map(|likelihood| (n, likelihood)))
        .take(MAX_PROBLEM_DIAGNOSES)
        .map(|(n, likelihood)| (n.label.clone(), likelihood, "acute", n.evidence.clone()));
    let chronic = synthesis.chronic.iter().map(|c| {
        (
            c.label().to_string(),
            c.weight(),
            "chronic",
            vec!["Age-associated chronic condition, age 65 or older".to_string()],
        )
    });
    let comorbid = synthesis.comorbidities.iter().map(|c| {
        (
            c.label().to_string(),
            c.weight(),
            "comorbidity",
            vec!["Routine comorbidity screen".to_string()],
        )
    });

    let mut seen = HashSet::new();
    acute
        .chain(chronic)
        .chain(comorbid)
        .filter(|(label, ..)| seen.insert(label.to_lowercase()))
        .take(MAX_PROBLEMS)
        .enumerate()
        .map(|(index, (diagnosis, likelihood, category, evidence))| ProblemListItem {
            id: format!("problem_{}", index),
            code: lexicon::classification_code(&diagnosis).to_string(),
            diagnosis,
            likelihood,
            category: category.to_string(),
            evidence,
            status: ProblemStatus::Active,
        })
        .collect()
}
