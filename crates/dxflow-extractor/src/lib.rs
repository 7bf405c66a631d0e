//! dxflow Extractor
//!
//! Converts a free-text clinical note into a diagnostic workflow graph.
//!
//! # Overview
//!
//! Two paths produce the same `AnalysisResult` shape. When a provider is
//! configured, the note goes to an LLM and the reply is parsed and
//! validated. Otherwise, or when inference fails, a rule-based pipeline
//! synthesizes the graph from a static medical lexicon.
//!
//! # Architecture
//!
//! ```text
//! Note → Concept Extractor → Differential Synthesizer → Workflow Assembler
//!                                                              ↓
//!        LLM → Reply Parser → Validator ──────────────→ Layout Selector → Graph
//! ```
//!
//! # Key Features
//!
//! - **Lexicon Matching**: word-boundary phrase matching against bucketed vocabulary
//! - **Contextual Concepts**: age, gender and urgency modifiers
//! - **Bounded Assembly**: diagnosis, action and problem-list counts always within limits
//! - **Retry and Fallback**: explicit retry policy, deterministic or static fallback
//! - **Cancel-and-Replace**: newer submissions supersede in-flight ones
//!
//! # Example Usage
//!
//! ```
//! use dxflow_extractor::{Analyzer, AnalyzerConfig};
//! use dxflow_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer: Analyzer<MockProvider> = Analyzer::new(None, AnalyzerConfig::default());
//!
//! let result = analyzer.analyze("45-year-old male with chest pain").await?;
//!
//! println!("Diagnoses: {}", result.diagnoses().count());
//! println!("Next actions: {}", result.actions().count());
//! println!("Layout: {}", result.metadata.layout.algorithm);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod assembler;
mod concepts;
mod config;
mod differential;
mod error;
mod fallback;
mod layout;
mod lexicon;
mod parser;
mod prompt;
mod session;
mod validate;


pub use analyzer::Analyzer;
pub use assembler::{
    assemble, priority_for, timing_for, ActionCategory, ConfidenceScorer, MAX_ACTIONS,
    MAX_DIAGNOSES, MAX_EXTRACTED_DIAGNOSES, MAX_PROBLEMS, MAX_PROBLEM_DIAGNOSES, MIN_DIAGNOSES,
};
pub use concepts::{extract, patient_age, GERIATRIC_AGE};
pub use config::{AnalyzerConfig, ConfidenceMode, FallbackPolicy, InferenceConfig};
pub use differential::{synthesize, Differential, Synthesis, MAX_DIFFERENTIALS};
pub use error::AnalyzerError;
pub use fallback::static_fallback;
pub use layout::{arrange, forced, select_layout, MEDIUM_GRAPH_MAX, SMALL_GRAPH_MAX};
pub use lexicon::{
    classification_code, contains_phrase, lookup, system_for, Bucket, LexiconMatch, MatchMode,
    UNSPECIFIED_CODE,
};
pub use parser::{extract_json, parse_llm_response, InferredGraph};
pub use prompt::PromptBuilder;
pub use session::AnalysisSession;
pub use validate::{validate_result, violations};
