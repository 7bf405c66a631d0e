//! Concept module - tagged medical terms

use serde::{Deserialize, Serialize};

/// Semantic category of a concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptCategory {
    /// Patient complaint or observable sign
    Symptom,
    /// Medical condition
    Diagnosis,
    /// Diagnostic test or study
    Test,
    /// Medication, procedure or therapy
    Treatment,
    /// Ongoing observation
    Monitoring,
    /// Clinical evaluation
    Assessment,
    /// Lifestyle, history or frailty factor
    RiskFactor,
    /// Care-process step (triage, review)
    Process,
}

impl ConceptCategory {
    /// All categories, in declaration order
    pub const ALL: [ConceptCategory; 8] = [
        ConceptCategory::Symptom,
        ConceptCategory::Diagnosis,
        ConceptCategory::Test,
        ConceptCategory::Treatment,
        ConceptCategory::Monitoring,
        ConceptCategory::Assessment,
        ConceptCategory::RiskFactor,
        ConceptCategory::Process,
    ];

    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConceptCategory::Symptom => "symptom",
            ConceptCategory::Diagnosis => "diagnosis",
            ConceptCategory::Test => "test",
            ConceptCategory::Treatment => "treatment",
            ConceptCategory::Monitoring => "monitoring",
            ConceptCategory::Assessment => "assessment",
            ConceptCategory::RiskFactor => "risk_factor",
            ConceptCategory::Process => "process",
        }
    }
}

impl std::fmt::Display for ConceptCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged medical term
///
/// Concepts are immutable once created. Within one analysis run they are
/// deduplicated by label, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    label: String,
    category: ConceptCategory,
    weight: f64,
}

impl Concept {
    /// Create a new concept
    ///
    /// # Panics
    /// Panics if the label is blank or the weight is outside [0, 1]
    pub fn new(label: impl Into<String>, category: ConceptCategory, weight: f64) -> Self {
        let label = label.into();
        assert!(!label.trim().is_empty(), "Concept label must not be empty");
        assert!((0.0..=1.0).contains(&weight), "Weight must be in [0, 1]");

        Self {
            label,
            category,
            weight,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Semantic category
    pub fn category(&self) -> ConceptCategory {
        self.category
    }

    /// Default weight (likelihood for diagnoses)
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Deduplication key for this concept
    pub fn key(&self) -> String {
        self.label.to_lowercase()
    }

    /// Check whether two concepts share a label (case-insensitive)
    pub fn same_label(&self, other: &Concept) -> bool {
        self.label.eq_ignore_ascii_case(&other.label)
    }
}

/// Remove later duplicates by label, keeping the first occurrence
pub fn dedupe(concepts: Vec<Concept>) -> Vec<Concept> {
    let mut seen = std::collections::HashSet::new();
    concepts
        .into_iter()
        .filter(|c| seen.insert(c.key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concept_creation() {
        let c = Concept::new("chest pain", ConceptCategory::Symptom, 0.8);
        assert_eq!(c.label(), "chest pain");
        assert_eq!(c.category(), ConceptCategory::Symptom);
        assert_eq!(c.weight(), 0.8);
    }

    #[test]
    #[should_panic]
    fn test_invalid_weight() {
        Concept::new("fever", ConceptCategory::Symptom, 1.5);
    }

    #[test]
    #[should_panic]
    fn test_blank_label() {
        Concept::new("  ", ConceptCategory::Symptom, 0.5);
    }

    #[test]
    fn test_dedupe_keeps_first_case_insensitive() {
        let concepts = vec![
            Concept::new("ECG", ConceptCategory::Test, 0.7),
            Concept::new("fever", ConceptCategory::Symptom, 0.8),
            Concept::new("ecg", ConceptCategory::Test, 0.5),
        ];
        let deduped = dedupe(concepts);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].label(), "ECG");
        assert_eq!(deduped[0].weight(), 0.7);
    }

    #[test]
    fn test_category_serde_name() {
        let json = serde_json::to_string(&ConceptCategory::RiskFactor).unwrap();
        assert_eq!(json, "\"risk_factor\"");
    }
}
