//! Differential diagnosis synthesis
//!
//! A fixed rule table turns presenting symptoms into candidate diagnoses.
//! Age adds chronic conditions; a small comorbidity screen is appended to
//! every run.

use crate::concepts::{patient_age, GERIATRIC_AGE};
use crate::lexicon::{self, MatchMode};
use dxflow_domain::{Concept, ConceptCategory};
use std::collections::HashSet;

/// Upper bound on synthesized differentials per run
pub const MAX_DIFFERENTIALS: usize = 4;

struct TriggerRule {
    phrases: &'static [&'static str],
    candidates: &'static [(&'static str, f64)],
}

const TRIGGER_RULES: &[TriggerRule] = &[
    TriggerRule {
        phrases: &["chest pain"],
        candidates: &[
            ("acute coronary syndrome", 0.7),
            ("pulmonary embolism", 0.6),
            ("aortic dissection", 0.4),
            ("pericarditis", 0.5),
        ],
    },
    TriggerRule {
        phrases: &["dyspnea", "shortness of breath"],
        candidates: &[
            ("congestive heart failure", 0.6),
            ("pneumonia", 0.7),
            ("asthma exacerbation", 0.5),
            ("copd exacerbation", 0.6),
        ],
    },
    TriggerRule {
        phrases: &["fever"],
        candidates: &[
            ("sepsis", 0.7),
            ("urinary tract infection", 0.6),
            ("viral syndrome", 0.5),
        ],
    },
];

const CHRONIC_CONDITIONS: &[(&str, f64)] = &[
    ("hypertension", 0.6),
    ("diabetes", 0.5),
    ("osteoarthritis", 0.4),
];

const COMORBIDITIES: &[(&str, ConceptCategory, f64)] = &[
    ("obesity", ConceptCategory::RiskFactor, 0.4),
    ("smoking history", ConceptCategory::RiskFactor, 0.3),
    ("needs medication review", ConceptCategory::Process, 0.5),
];

/// A synthesized candidate diagnosis and the phrase that triggered it
#[derive(Debug, Clone, PartialEq)]
pub struct Differential {
    /// Candidate diagnosis; weight is its likelihood
    pub concept: Concept,
    /// Trigger phrase found among symptoms or in the text
    pub trigger: &'static str,
}

/// Output of one synthesis pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Synthesis {
    /// Candidate diagnoses in rule-table order, capped at `MAX_DIFFERENTIALS`
    pub differentials: Vec<Differential>,
    /// Age-associated chronic conditions
    pub chronic: Vec<Concept>,
    /// Routine comorbidity screen
    pub comorbidities: Vec<Concept>,
}

/// Synthesize differentials, chronic conditions and comorbidities
///
/// Each trigger phrase is checked against the extracted symptom concepts
/// and against the raw note text.
pub fn synthesize(concepts: &[Concept], note: &str, mode: MatchMode) -> Synthesis {
    let lowered = note.to_lowercase();
    let symptoms: HashSet<String> = concepts
        .iter()
        .filter(|c| c.category() == ConceptCategory::Symptom)
        .map(Concept::key)
        .collect();

    let mut seen = HashSet::new();
    let differentials = TRIGGER_RULES
        .iter()
        .filter_map(|rule| {
            rule.phrases
                .iter()
                .find(|phrase| {
                    symptoms.contains(**phrase) || lexicon::contains_phrase(&lowered, phrase, mode)
                })
                .map(|trigger| (rule, *trigger))
        })
        .flat_map(|(rule, trigger)| {
            rule.candidates.iter().map(move |(label, likelihood)| Differential {
                concept: Concept::new(*label, ConceptCategory::Diagnosis, *likelihood),
                trigger,
            })
        })
        .filter(|d| seen.insert(d.concept.key()))
        .take(MAX_DIFFERENTIALS)
        .collect();

    let chronic = if patient_age(&lowered).is_some_and(|age| age >= GERIATRIC_AGE) {
        CHRONIC_CONDITIONS
            .iter()
            .map(|(label, weight)| Concept::new(*label, ConceptCategory::Diagnosis, *weight))
            .collect()
    } else {
        Vec::new()
    };

    let comorbidities = COMORBIDITIES
        .iter()
        .map(|(label, category, weight)| Concept::new(*label, *category, *weight))
        .collect();

    Synthesis {
        differentials,
        chronic,
        comorbidities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concepts::extract;

    fn run(note: &str) -> Synthesis {
        let concepts = extract(note, MatchMode::WordBoundary);
        synthesize(&concepts, note, MatchMode::WordBoundary)
    }

    fn likelihoods(synthesis: &Synthesis) -> Vec<(&str, f64)> {
        synthesis
            .differentials
            .iter()
            .map(|d| (d.concept.label(), d.concept.weight()))
            .collect()
    }

    #[test]
    fn test_chest_pain_differentials() {
        let synthesis = run("45-year-old male with chest pain");
        assert_eq!(
            likelihoods(&synthesis),
            vec![
                ("acute coronary syndrome", 0.7),
                ("pulmonary embolism", 0.6),
                ("aortic dissection", 0.4),
                ("pericarditis", 0.5),
            ]
        );
        assert!(synthesis.differentials.iter().all(|d| d.trigger == "chest pain"));
        assert!(synthesis.chronic.is_empty());
    }

    #[test]
    fn test_differentials_are_capped() {
        let synthesis = run("chest pain with shortness of breath and fever");
        assert_eq!(synthesis.differentials.len(), MAX_DIFFERENTIALS);
        assert_eq!(synthesis.differentials[0].concept.label(), "acute coronary syndrome");
    }

    #[test]
    fn test_dyspnea_trigger_reports_matching_phrase() {
        let synthesis = run("worsening shortness of breath");
        assert_eq!(synthesis.differentials[0].trigger, "shortness of breath");
        assert_eq!(synthesis.differentials[1].concept.label(), "pneumonia");
    }

    #[test]
    fn test_trigger_from_symptom_concepts_alone() {
        let concepts = vec![Concept::new("Fever", ConceptCategory::Symptom, 0.8)];
        let synthesis = synthesize(&concepts, "", MatchMode::WordBoundary);
        assert_eq!(synthesis.differentials.len(), 3);
        assert_eq!(synthesis.differentials[0].concept.label(), "sepsis");
    }

    #[test]
    fn test_chronic_conditions_for_older_patients() {
        let synthesis = run("72-year-old female with fever");
        let chronic: Vec<_> = synthesis
            .chronic
            .iter()
            .map(|c| (c.label(), c.weight()))
            .collect();
        assert_eq!(
            chronic,
            vec![("hypertension", 0.6), ("diabetes", 0.5), ("osteoarthritis", 0.4)]
        );
    }

    #[test]
    fn test_comorbidities_always_present_once() {
        let synthesis = run("");
        assert!(synthesis.differentials.is_empty());
        let labels: Vec<_> = synthesis.comorbidities.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["obesity", "smoking history", "needs medication review"]);
    }
}
