//! Static medical vocabulary
//!
//! Phrase buckets with default weights, the clinical system each diagnosis
//! bucket belongs to, and an ICD-10 style code table. All tables are
//! compile-time constants and all phrases are lower case.

use dxflow_domain::ConceptCategory;
use serde::{Deserialize, Serialize};

/// Code returned for labels missing from the code table ("illness, unspecified")
pub const UNSPECIFIED_CODE: &str = "R69";

/// How a lexicon phrase must appear in the note to count as a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Phrase bounded by non-alphanumeric characters or text edges
    #[default]
    WordBoundary,
    /// Plain containment; "feverish" matches "fever"
    Substring,
}

/// A group of lexicon phrases sharing a category and default weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Presenting complaints
    PrimarySymptom,
    /// Accompanying complaints
    SecondarySymptom,
    /// Cardiovascular conditions
    CardiacDiagnosis,
    /// Respiratory conditions
    PulmonaryDiagnosis,
    /// Digestive conditions
    GiDiagnosis,
    /// Neurological conditions
    NeuroDiagnosis,
    /// Infections
    InfectiousDiagnosis,
    /// Endocrine and metabolic conditions
    MetabolicDiagnosis,
    /// Labs, imaging and tracings
    DiagnosticTest,
    /// Medications and therapies
    Treatment,
    /// Ongoing observation
    Monitoring,
}

impl Bucket {
    /// All buckets, in scan order
    pub const ALL: [Bucket; 11] = [
        Bucket::PrimarySymptom,
        Bucket::SecondarySymptom,
        Bucket::CardiacDiagnosis,
        Bucket::PulmonaryDiagnosis,
        Bucket::GiDiagnosis,
        Bucket::NeuroDiagnosis,
        Bucket::InfectiousDiagnosis,
        Bucket::MetabolicDiagnosis,
        Bucket::DiagnosticTest,
        Bucket::Treatment,
        Bucket::Monitoring,
    ];

    /// Category of concepts emitted from this bucket
    pub fn category(&self) -> ConceptCategory {
        match self {
            Bucket::PrimarySymptom | Bucket::SecondarySymptom => ConceptCategory::Symptom,
            Bucket::CardiacDiagnosis
            | Bucket::PulmonaryDiagnosis
            | Bucket::GiDiagnosis
            | Bucket::NeuroDiagnosis
            | Bucket::InfectiousDiagnosis
            | Bucket::MetabolicDiagnosis => ConceptCategory::Diagnosis,
            Bucket::DiagnosticTest => ConceptCategory::Test,
            Bucket::Treatment => ConceptCategory::Treatment,
            Bucket::Monitoring => ConceptCategory::Monitoring,
        }
    }

    /// Default weight of concepts emitted from this bucket
    pub fn weight(&self) -> f64 {
        match self {
            Bucket::PrimarySymptom => 0.8,
            Bucket::SecondarySymptom => 0.6,
            Bucket::CardiacDiagnosis
            | Bucket::PulmonaryDiagnosis
            | Bucket::GiDiagnosis
            | Bucket::NeuroDiagnosis
            | Bucket::InfectiousDiagnosis
            | Bucket::MetabolicDiagnosis
            | Bucket::DiagnosticTest => 0.7,
            Bucket::Treatment => 0.6,
            Bucket::Monitoring => 0.5,
        }
    }

    /// Clinical system for diagnosis buckets
    pub fn system(&self) -> Option<&'static str> {
        match self {
            Bucket::CardiacDiagnosis => Some("cardiac"),
            Bucket::PulmonaryDiagnosis => Some("pulmonary"),
            Bucket::GiDiagnosis => Some("gastrointestinal"),
            Bucket::NeuroDiagnosis => Some("neurological"),
            Bucket::InfectiousDiagnosis => Some("infectious"),
            Bucket::MetabolicDiagnosis => Some("metabolic"),
            _ => None,
        }
    }

    /// Phrases in this bucket
    pub fn phrases(&self) -> &'static [&'static str] {
        match self {
            Bucket::PrimarySymptom => &[
                "chest pain",
                "shortness of breath",
                "dyspnea",
                "fever",
                "abdominal pain",
                "headache",
                "syncope",
                "palpitations",
                "cough",
                "altered mental status",
            ],
            Bucket::SecondarySymptom => &[
                "nausea",
                "vomiting",
                "diarrhea",
                "dizziness",
                "fatigue",
                "diaphoresis",
                "chills",
                "weakness",
                "edema",
                "wheezing",
                "dysuria",
                "confusion",
            ],
            Bucket::CardiacDiagnosis => &[
                "myocardial infarction",
                "acute coronary syndrome",
                "angina",
                "atrial fibrillation",
                "heart failure",
                "aortic dissection",
                "pericarditis",
                "hypertension",
            ],
            Bucket::PulmonaryDiagnosis => &[
                "pneumonia",
                "asthma",
                "copd",
                "pulmonary embolism",
                "bronchitis",
                "pneumothorax",
            ],
            Bucket::GiDiagnosis => &[
                "gastroenteritis",
                "appendicitis",
                "pancreatitis",
                "cholecystitis",
                "gerd",
                "gastrointestinal bleed",
            ],
            Bucket::NeuroDiagnosis => &[
                "stroke",
                "transient ischemic attack",
                "migraine",
                "seizure",
                "subarachnoid hemorrhage",
            ],
            Bucket::InfectiousDiagnosis => &[
                "sepsis",
                "urinary tract infection",
                "cellulitis",
                "influenza",
                "covid-19",
                "viral syndrome",
                "meningitis",
            ],
            Bucket::MetabolicDiagnosis => &[
                "diabetes",
                "diabetic ketoacidosis",
                "hypoglycemia",
                "hyperkalemia",
                "hypothyroidism",
                "dehydration",
            ],
            Bucket::DiagnosticTest => &[
                "ecg",
                "ekg",
                "troponin",
                "chest x-ray",
                "ct scan",
                "cbc",
                "metabolic panel",
                "urinalysis",
                "blood culture",
                "d-dimer",
                "echocardiogram",
                "lipase",
                "mri",
            ],
            Bucket::Treatment => &[
                "aspirin",
                "nitroglycerin",
                "heparin",
                "antibiotics",
                "oxygen",
                "iv fluids",
                "albuterol",
                "insulin",
                "morphine",
                "acetaminophen",
                "furosemide",
            ],
            Bucket::Monitoring => &[
                "telemetry",
                "vital signs",
                "pulse oximetry",
                "cardiac monitoring",
                "blood glucose monitoring",
                "neuro checks",
                "intake and output",
            ],
        }
    }
}

/// One phrase found in a text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexiconMatch {
    /// The lexicon phrase (lower case)
    pub phrase: &'static str,
    /// Bucket the phrase belongs to
    pub bucket: Bucket,
}

/// ICD-10 style codes keyed by lower-case label
const CODES: &[(&str, &str)] = &[
    ("acute coronary syndrome", "I24.9"),
    ("myocardial infarction", "I21.9"),
    ("angina", "I20.9"),
    ("atrial fibrillation", "I48.91"),
    ("heart failure", "I50.9"),
    ("congestive heart failure", "I50.9"),
    ("aortic dissection", "I71.00"),
    ("pericarditis", "I30.9"),
    ("hypertension", "I10"),
    ("pulmonary embolism", "I26.99"),
    ("pneumonia", "J18.9"),
    ("asthma", "J45.909"),
    ("asthma exacerbation", "J45.901"),
    ("copd", "J44.9"),
    ("copd exacerbation", "J44.1"),
    ("bronchitis", "J40"),
    ("pneumothorax", "J93.9"),
    ("gastroenteritis", "K52.9"),
    ("appendicitis", "K37"),
    ("pancreatitis", "K85.90"),
    ("cholecystitis", "K81.9"),
    ("gerd", "K21.9"),
    ("gastrointestinal bleed", "K92.2"),
    ("stroke", "I63.9"),
    ("transient ischemic attack", "G45.9"),
    ("migraine", "G43.909"),
    ("seizure", "R56.9"),
    ("subarachnoid hemorrhage", "I60.9"),
    ("sepsis", "A41.9"),
    ("urinary tract infection", "N39.0"),
    ("cellulitis", "L03.90"),
    ("influenza", "J11.1"),
    ("covid-19", "U07.1"),
    ("viral syndrome", "B34.9"),
    ("meningitis", "G03.9"),
    ("diabetes", "E11.9"),
    ("diabetic ketoacidosis", "E11.10"),
    ("hypoglycemia", "E16.2"),
    ("hyperkalemia", "E87.5"),
    ("hypothyroidism", "E03.9"),
    ("dehydration", "E86.0"),
    ("osteoarthritis", "M19.90"),
    ("obesity", "E66.9"),
    ("smoking history", "Z87.891"),
    ("needs medication review", "Z51.81"),
    ("chest pain", "R07.9"),
    ("fever", "R50.9"),
];

/// Find every lexicon phrase in `text`
///
/// Matches come back in bucket order, then phrase order within a bucket.
pub fn lookup(text: &str, mode: MatchMode) -> Vec<LexiconMatch> {
    scan(&text.to_lowercase(), mode)
}

/// Scan an already lower-cased text
pub(crate) fn scan(lowered: &str, mode: MatchMode) -> Vec<LexiconMatch> {
    Bucket::ALL
        .iter()
        .flat_map(|bucket| {
            bucket
                .phrases()
                .iter()
                .filter(move |phrase| contains_phrase(lowered, phrase, mode))
                .map(move |phrase| LexiconMatch {
                    phrase: *phrase,
                    bucket: *bucket,
                })
        })
        .collect()
}

/// Check whether `phrase` occurs in `haystack` under `mode`
///
/// Both arguments are expected in lower case.
pub fn contains_phrase(haystack: &str, phrase: &str, mode: MatchMode) -> bool {
    if phrase.is_empty() {
        return false;
    }
    match mode {
        MatchMode::Substring => haystack.contains(phrase),
        MatchMode::WordBoundary => haystack.match_indices(phrase).any(|(start, _)| {
            let before = haystack[..start].chars().next_back();
            let after = haystack[start + phrase.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        }),
    }
}

/// Clinical system of a diagnosis label
///
/// Exact phrase matches win; otherwise the first diagnosis phrase contained
/// in the label decides ("copd exacerbation" is pulmonary).
pub fn system_for(label: &str) -> Option<&'static str> {
    let label = label.trim().to_lowercase();
    let diagnosis_buckets = || Bucket::ALL.iter().filter(|b| b.system().is_some());

    diagnosis_buckets()
        .find(|b| b.phrases().contains(&label.as_str()))
        .or_else(|| {
            diagnosis_buckets().find(|b| {
                b.phrases()
                    .iter()
                    .any(|phrase| contains_phrase(&label, phrase, MatchMode::WordBoundary))
            })
        })
        .and_then(Bucket::system)
}

/// Classification code for a label, never empty
pub fn classification_code(label: &str) -> &'static str {
    let key = label.trim().to_lowercase();
    CODES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, code)| *code)
        .unwrap_or(UNSPECIFIED_CODE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_finds_phrases_in_bucket_order() {
        let matches = lookup("Fever and chest pain, ECG ordered", MatchMode::WordBoundary);
        let phrases: Vec<_> = matches.iter().map(|m| m.phrase).collect();
        assert_eq!(phrases, vec!["chest pain", "fever", "ecg"]);
        assert_eq!(matches[0].bucket, Bucket::PrimarySymptom);
        assert_eq!(matches[2].bucket.category(), ConceptCategory::Test);
    }

    #[test]
    fn test_word_boundary_rejects_embedded_phrases() {
        assert!(!contains_phrase("patient feverish overnight", "fever", MatchMode::WordBoundary));
        assert!(contains_phrase("patient feverish overnight", "fever", MatchMode::Substring));
        assert!(contains_phrase("fever.", "fever", MatchMode::WordBoundary));
        assert!(contains_phrase("(fever)", "fever", MatchMode::WordBoundary));
    }

    #[test]
    fn test_word_boundary_checks_every_occurrence() {
        assert!(contains_phrase(
            "feverish, then frank fever",
            "fever",
            MatchMode::WordBoundary
        ));
    }

    #[test]
    fn test_hyphenated_phrases_match() {
        let matches = lookup("chest x-ray and d-dimer pending", MatchMode::WordBoundary);
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_no_matches() {
        assert!(lookup("routine follow-up, no complaints", MatchMode::WordBoundary).is_empty());
        assert!(lookup("", MatchMode::Substring).is_empty());
    }

    #[test]
    fn test_bucket_weights() {
        assert_eq!(Bucket::PrimarySymptom.weight(), 0.8);
        assert_eq!(Bucket::SecondarySymptom.weight(), 0.6);
        assert_eq!(Bucket::NeuroDiagnosis.weight(), 0.7);
        assert_eq!(Bucket::DiagnosticTest.weight(), 0.7);
        assert_eq!(Bucket::Treatment.weight(), 0.6);
        assert_eq!(Bucket::Monitoring.weight(), 0.5);
    }

    #[test]
    fn test_phrases_are_lower_case_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for bucket in Bucket::ALL {
            for phrase in bucket.phrases() {
                assert_eq!(*phrase, phrase.to_lowercase());
                assert!(seen.insert(*phrase), "duplicate phrase {}", phrase);
            }
        }
    }

    #[test]
    fn test_system_for() {
        assert_eq!(system_for("pneumonia"), Some("pulmonary"));
        assert_eq!(system_for("Acute Coronary Syndrome"), Some("cardiac"));
        assert_eq!(system_for("copd exacerbation"), Some("pulmonary"));
        assert_eq!(system_for("congestive heart failure"), Some("cardiac"));
        assert_eq!(system_for("osteoarthritis"), None);
    }

    #[test]
    fn test_classification_code() {
        assert_eq!(classification_code("Pneumonia"), "J18.9");
        assert_eq!(classification_code("  sepsis "), "A41.9");
        assert_eq!(classification_code("unobtainium poisoning"), UNSPECIFIED_CODE);
        assert_eq!(classification_code(""), UNSPECIFIED_CODE);
    }
}
