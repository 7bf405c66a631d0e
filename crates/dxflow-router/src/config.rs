//! Configuration file parsing for the Router.
//!
//! Loads the bind address, the Gemini connection settings and the analyzer
//! section from a TOML file. `DXFLOW_API_KEY` overrides the file's key.

use dxflow_extractor::AnalyzerConfig;
use dxflow_llm::GeminiConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Environment variable that overrides `gemini.api_key`
pub const API_KEY_ENV: &str = "DXFLOW_API_KEY";

/// Router configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Router configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// Gemini connection; absent means rule-based analysis only
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,

    /// Analysis pipeline settings
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

impl RouterConfig {
    /// Load configuration from a TOML file, then apply the key override
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: RouterConfig = toml::from_str(&contents)?;
        config.apply_api_key(std::env::var(API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Replace the Gemini key, creating the section when missing
    ///
    /// Blank keys are ignored.
    pub fn apply_api_key(&mut self, key: Option<String>) {
        let Some(key) = key.filter(|k| !k.trim().is_empty()) else {
            return;
        };
        match &mut self.gemini {
            Some(gemini) => gemini.api_key = key,
            None => self.gemini = Some(GeminiConfig::new(key)),
        }
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analyzer.validate().map_err(ConfigError::Invalid)?;
        if let Some(gemini) = &self.gemini {
            if gemini.api_key.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "gemini.api_key is empty (set it or {})",
                    API_KEY_ENV
                )));
            }
        }
        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        RouterConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            gemini: None,
            analyzer: AnalyzerConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxflow_extractor::FallbackPolicy;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default_test_config();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
        assert!(config.gemini.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_addr() {
        let config = RouterConfig::default_test_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000

            [gemini]
            api_key = "file-key"
            model = "gemini-2.5-pro"

            [analyzer]
            fallback = "static"

            [analyzer.inference]
            max_retries = 2
        "#;

        let config: RouterConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        let gemini = config.gemini.as_ref().unwrap();
        assert_eq!(gemini.api_key, "file-key");
        assert_eq!(gemini.model, "gemini-2.5-pro");
        assert_eq!(config.analyzer.fallback, FallbackPolicy::Static);
        assert_eq!(config.analyzer.inference.max_retries, 2);
        assert_eq!(config.analyzer.inference.timeout_secs, 45);
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: RouterConfig = toml::from_str("bind_address = \"::1\"\nbind_port = 1").unwrap();
        assert!(config.gemini.is_none());
        assert_eq!(config.analyzer, AnalyzerConfig::default());
    }

    #[test]
    fn test_api_key_override() {
        let mut config = RouterConfig::default_test_config();
        config.apply_api_key(Some("env-key".to_string()));
        assert_eq!(config.gemini.as_ref().unwrap().api_key, "env-key");

        config.apply_api_key(Some("   ".to_string()));
        assert_eq!(config.gemini.as_ref().unwrap().api_key, "env-key");

        config.apply_api_key(None);
        assert_eq!(config.gemini.as_ref().unwrap().api_key, "env-key");
    }

    #[test]
    fn test_empty_key_is_invalid() {
        let mut config = RouterConfig::default_test_config();
        config.gemini = Some(GeminiConfig::new(""));
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = RouterConfig::from_file("/nonexistent/dxflow-router.toml");
        assert!(matches!(result, Err(ConfigError::FileRead(_))));
    }
}
