//! Rule-based concept extraction from note text

use crate::lexicon::{self, MatchMode};
use dxflow_domain::{concept, Concept, ConceptCategory};
use regex::Regex;
use std::sync::LazyLock;

/// Age at which geriatric context applies
pub const GERIATRIC_AGE: u32 = 65;

static AGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,3})\s*-?\s*(?:years?|yrs?)\s*-?\s*old\b").expect("Invalid age regex pattern")
});

type ContextConcept = (&'static str, ConceptCategory, f64);

const GERIATRIC_CONTEXT: &[ContextConcept] = &[
    ("geriatric assessment", ConceptCategory::Assessment, 0.8),
    ("fall risk", ConceptCategory::RiskFactor, 0.7),
    ("polypharmacy", ConceptCategory::RiskFactor, 0.6),
    ("frailty", ConceptCategory::RiskFactor, 0.5),
];

const FEMALE_MARKERS: &[&str] = &["female", "woman"];

const FEMALE_CONTEXT: &[ContextConcept] = &[
    ("pregnancy screening", ConceptCategory::Test, 0.7),
    ("gynecologic assessment", ConceptCategory::Assessment, 0.6),
];

const URGENCY_MARKERS: &[&str] = &["emergency", "acute", "urgent"];

const URGENCY_CONTEXT: &[ContextConcept] = &[
    ("emergency assessment", ConceptCategory::Assessment, 0.9),
    ("triage", ConceptCategory::Process, 0.8),
    ("stabilization", ConceptCategory::Treatment, 0.7),
];

/// Patient age stated in the note ("45-year-old", "72 years old")
///
/// The first stated age wins.
pub fn patient_age(note: &str) -> Option<u32> {
    AGE_PATTERN
        .captures(&note.to_lowercase())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Extract tagged concepts from a clinical note
///
/// Lexicon matches come first, in bucket order, followed by age, gender
/// and urgency context. Labels are unique (case-insensitive), first
/// occurrence kept. Identical input always yields identical output.
///
/// # Examples
///
/// ```
/// use dxflow_extractor::{extract, MatchMode};
///
/// let concepts = extract("45-year-old male with chest pain", MatchMode::WordBoundary);
/// assert_eq!(concepts.len(), 1);
/// assert_eq!(concepts[0].label(), "chest pain");
/// ```
pub fn extract(note: &str, mode: MatchMode) -> Vec<Concept> {
    if note.trim().is_empty() {
        return Vec::new();
    }

    let lowered = note.to_lowercase();
    let mut concepts: Vec<Concept> = lexicon::scan(&lowered, mode)
        .into_iter()
        .map(|m| Concept::new(m.phrase, m.bucket.category(), m.bucket.weight()))
        .collect();

    if patient_age(&lowered).is_some_and(|age| age >= GERIATRIC_AGE) {
        push_context(&mut concepts, GERIATRIC_CONTEXT);
    }
    if mentions_any(&lowered, FEMALE_MARKERS, mode) {
        push_context(&mut concepts, FEMALE_CONTEXT);
    }
    if mentions_any(&lowered, URGENCY_MARKERS, mode) {
        push_context(&mut concepts, URGENCY_CONTEXT);
    }

    concept::dedupe(concepts)
}

fn mentions_any(lowered: &str, markers: &[&str], mode: MatchMode) -> bool {
    markers
        .iter()
        .any(|marker| lexicon::contains_phrase(lowered, marker, mode))
}

fn push_context(concepts: &mut Vec<Concept>, context: &[ContextConcept]) {
    concepts.extend(
        context
            .iter()
            .map(|(label, category, weight)| Concept::new(*label, *category, *weight)),
    );
}
