//! LLM prompt engineering for workflow graph generation

use crate::assembler::{MAX_ACTIONS, MAX_DIAGNOSES, MAX_PROBLEMS};
use dxflow_domain::Concept;

/// Builds prompts asking the LLM for a workflow graph
pub struct PromptBuilder {
    note: String,
    hints: Vec<Concept>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(note: impl Into<String>) -> Self {
        Self {
            note: note.into(),
            hints: Vec::new(),
        }
    }

    /// Add rule-based concepts as hints for the model
    pub fn with_concept_hints(mut self, concepts: Vec<Concept>) -> Self {
        self.hints = concepts;
        self
    }

    /// Build the complete analysis prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(ANALYSIS_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!(
            "Limits: at most {} diagnoses, at most {} next actions, at most {} problem list items.\n\n",
            MAX_DIAGNOSES, MAX_ACTIONS, MAX_PROBLEMS
        ));

        if !self.hints.is_empty() {
            prompt.push_str("Terms already recognized in the note (category, weight):\n");
            for concept in &self.hints {
                prompt.push_str(&format!(
                    "- {} ({}, {:.2})\n",
                    concept.label(),
                    concept.category(),
                    concept.weight()
                ));
            }
            prompt.push('\n');
        }

        prompt.push_str("Clinical note:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.note);
        prompt.push_str("\n---\n\n");

        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const ANALYSIS_INSTRUCTIONS: &str = r#"You are assisting a clinician. Read the clinical note below and produce a diagnostic workflow graph.

The graph has two kinds of nodes:
- "diagnosis" nodes: candidate diagnoses with a likelihood and a confidence, both between 0.0 and 1.0
- "next_action" nodes: recommended tests, treatments, monitoring or consultations, each attached to one diagnosis

Rules:
- Give every node a unique id ("dx_0", "dx_1", ... and "action_0", "action_1", ...)
- Every next_action must name an existing diagnosis node in "diagnosisId"
- Priority is one of "urgent", "high", "medium", "low"; timing is a short phrase such as "within 1 hour"
- Node category is the clinical system for diagnoses ("cardiac", "pulmonary", ...) and one of "diagnostic", "therapeutic", "monitoring", "consultation" for actions
- Edge kind is one of "confirms", "rules-out", "monitors", "treats", "investigates"; strength is one of "weak", "moderate", "strong"
- Every edge source and target must be an existing node id
- The problem list uses ICD-10 codes, category "acute", "chronic" or "comorbidity", and status "active", "resolved" or "ruled-out"
- Include at least one diagnosis, one next action and one problem list item"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (a single JSON object only, no additional text):
{
  "nodes": [
    {"id": "dx_0", "kind": "diagnosis", "label": "...", "category": "cardiac",
     "likelihood": 0.7, "confidence": 0.8, "evidence": ["..."]},
    {"id": "action_0", "kind": "next_action", "label": "...", "category": "diagnostic",
     "priority": "urgent", "timing": "immediately", "diagnosisId": "dx_0", "evidence": ["..."]}
  ],
  "edges": [
    {"id": "edge_0", "source": "dx_0", "target": "action_0", "kind": "investigates",
     "label": "investigates", "strength": "moderate"}
  ],
  "problemList": [
    {"id": "problem_0", "diagnosis": "...", "code": "I24.9", "likelihood": 0.7,
     "category": "acute", "evidence": ["..."], "status": "active"}
  ]
}"#;
