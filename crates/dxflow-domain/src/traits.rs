//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (dxflow-llm). Calls are blocking;
/// async callers run them on a blocking thread.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate a reply constrained to JSON, when the backend supports it
    ///
    /// Providers without a JSON mode fall back to plain generation.
    fn generate_json(&self, prompt: &str) -> Result<String, Self::Error> {
        self.generate(prompt)
    }

    /// Name of the model behind this provider
    fn model_name(&self) -> &str;
}
