//! Error types for the Analyzer

use thiserror::Error;

/// Errors that can occur during analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    /// Note is empty or whitespace only
    #[error("Note is empty")]
    EmptyNote,

    /// Note exceeds maximum length
    #[error("Note too long: {0} chars (max: {1})")]
    NoteTooLong(usize, usize),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Inference call timed out
    #[error("Inference timeout")]
    Timeout,

    /// Reply contains no usable JSON object
    #[error("Invalid reply format: {0}")]
    InvalidFormat(String),

    /// Reply parsed but violates graph invariants
    #[error("Invalid analysis result: {0}")]
    InvalidResult(String),

    /// A newer submission replaced this one
    #[error("Analysis superseded by a newer submission")]
    Superseded,
}
