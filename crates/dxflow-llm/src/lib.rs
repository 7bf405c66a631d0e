//! dxflow LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `dxflow-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scriptable mock for testing
//! - `GeminiProvider`: Google Generative Language API
//!
//! # Examples
//!
//! ```
//! use dxflow_llm::MockProvider;
//! use dxflow_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("{\"nodes\": []}");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "{\"nodes\": []}");
//! ```

#![warn(missing_docs)]

pub mod gemini;

use dxflow_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use gemini::{GeminiConfig, GeminiProvider};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Credential missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Responses can be keyed on a fragment of the prompt (the note text is
/// embedded in every analysis prompt), and failures can be scripted to
/// exercise retry and fallback paths.
///
/// # Examples
///
/// ```
/// use dxflow_llm::MockProvider;
/// use dxflow_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("chest pain", "cardiac reply");
/// assert_eq!(provider.generate("note: chest pain at rest").unwrap(), "cardiac reply");
///
/// let provider = MockProvider::new("ok").fail_first(1);
/// assert!(provider.generate("anything").is_err());
/// assert_eq!(provider.generate("anything").unwrap(), "ok");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    failures_remaining: Arc<Mutex<usize>>,
    always_fail: bool,
    delay: Option<Duration>,
    call_count: Arc<Mutex<usize>>,
    model: String,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            failures_remaining: Arc::new(Mutex::new(0)),
            always_fail: false,
            delay: None,
            call_count: Arc::new(Mutex::new(0)),
            model: "mock".to_string(),
        }
    }

    /// Create a provider whose every call fails
    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }

    /// Fail the first `n` calls, then answer normally
    pub fn fail_first(self, n: usize) -> Self {
        *lock(&self.failures_remaining) = n;
        self
    }

    /// Sleep before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer with `response` whenever the prompt contains `fragment`
    pub fn add_response(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(fragment.into(), response.into());
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        *lock(&self.call_count) += 1;

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        if self.always_fail {
            return Err(LlmError::Communication("Mock provider offline".to_string()));
        }

        {
            let mut remaining = lock(&self.failures_remaining);
            if *remaining > 0 {
                *remaining -= 1;
                return Err(LlmError::Communication("Scripted mock failure".to_string()));
            }
        }

        let responses = lock(&self.responses);
        let keyed = responses
            .iter()
            .filter(|(fragment, _)| prompt.contains(fragment.as_str()))
            .max_by_key(|(fragment, _)| fragment.len());
        if let Some((_, response)) = keyed {
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
