//! Problem list module - coded diagnoses for documentation and billing

use serde::{Deserialize, Serialize};

/// Status of a problem-list entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProblemStatus {
    /// Currently relevant (default)
    #[default]
    #[serde(rename = "active")]
    Active,
    /// No longer relevant
    #[serde(rename = "resolved")]
    Resolved,
    /// Considered and excluded
    #[serde(rename = "ruled-out")]
    RuledOut,
}

impl ProblemStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemStatus::Active => "active",
            ProblemStatus::Resolved => "resolved",
            ProblemStatus::RuledOut => "ruled-out",
        }
    }
}

/// A coded entry in the problem list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemListItem {
    /// Identifier, unique within one analysis
    pub id: String,

    /// Diagnosis label
    pub diagnosis: String,

    /// Disease-classification (ICD-10 style) code
    pub code: String,

    /// Likelihood [0.0, 1.0]
    pub likelihood: f64,

    /// Origin of the entry ("acute", "chronic", "comorbidity")
    pub category: String,

    /// Ordered supporting statements
    #[serde(default)]
    pub evidence: Vec<String>,

    /// Entry status
    #[serde(default)]
    pub status: ProblemStatus,
}
