//! Configuration for the Analyzer

use crate::lexicon::MatchMode;
use dxflow_domain::LayoutAlgorithm;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How diagnosis confidence values are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ConfidenceMode {
    /// Linear decay by rank
    #[default]
    Ranked,
    /// Seeded jitter, reproducible per seed
    Seeded {
        /// Generator seed
        seed: u64,
    },
}

/// What to return when inference is unavailable or rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Run the rule-based pipeline
    #[default]
    Deterministic,
    /// Return the minimal "assessment required" graph
    Static,
}

/// Inference call settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Consult the provider at all
    pub enabled: bool,

    /// Maximum time for a single inference call (seconds)
    pub timeout_secs: u64,

    /// Extra attempts after the first failure
    pub max_retries: u32,

    /// Fixed delay between attempts (milliseconds)
    pub retry_delay_ms: u64,

    /// Ask the provider for a JSON-only reply
    pub json_mode: bool,

    /// Maximum extracted concepts listed as hints in the prompt
    pub context_concepts_limit: usize,
}

impl InferenceConfig {
    /// Get the call timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the retry delay as a Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 45,
            max_retries: 1,
            retry_delay_ms: 500,
            json_mode: true,
            context_concepts_limit: 20,
        }
    }
}

/// Configuration for the Analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Maximum note length (characters)
    pub max_note_length: usize,

    /// Lexicon phrase matching
    pub match_mode: MatchMode,

    /// Fallback when inference fails
    pub fallback: FallbackPolicy,

    /// Fixed layout algorithm; chosen from the graph when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutAlgorithm>,

    /// Diagnosis confidence source
    pub confidence: ConfidenceMode,

    /// Inference call settings
    pub inference: InferenceConfig,
}

impl AnalyzerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_note_length == 0 {
            return Err("max_note_length must be greater than 0".to_string());
        }
        if self.inference.timeout_secs == 0 {
            return Err("inference.timeout_secs must be greater than 0".to_string());
        }
        if self.inference.max_retries > 5 {
            return Err("inference.max_retries cannot exceed 5".to_string());
        }
        if self.inference.retry_delay_ms > 60_000 {
            return Err("inference.retry_delay_ms cannot exceed 60000".to_string());
        }
        Ok(())
    }

    /// Offline preset: never consult the provider
    pub fn offline() -> Self {
        Self {
            inference: InferenceConfig {
                enabled: false,
                ..InferenceConfig::default()
            },
            ..Self::default()
        }
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_note_length: 20_000,
            match_mode: MatchMode::WordBoundary,
            fallback: FallbackPolicy::Deterministic,
            layout: None,
            confidence: ConfidenceMode::Ranked,
            inference: InferenceConfig::default(),
        }
    }
}
