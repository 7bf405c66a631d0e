//! Configuration management for the CLI.
//!
//! The file at `~/.dxflow/config.toml` holds display settings, the Gemini
//! connection and the stored API key. The key is the only credential the
//! application persists.

use crate::error::{CliError, Result};
use dxflow_extractor::AnalyzerConfig;
use dxflow_llm::GeminiConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Stored Gemini API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Gemini connection settings
    #[serde(default)]
    pub gemini: GeminiSettings,

    /// Analysis pipeline settings
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Gemini connection settings, minus the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiSettings {
    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

/// Where the effective API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// `--api-key` or `DXFLOW_API_KEY`
    Override,
    /// The configuration file
    File,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".dxflow").join("config.toml"))
    }

    /// Load configuration from a file, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.analyzer.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Store an API key; blank keys are rejected.
    pub fn set_api_key(&mut self, key: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::InvalidInput("API key must not be empty".to_string()));
        }
        self.api_key = Some(key.to_string());
        Ok(())
    }

    /// Remove the stored key, returning whether one was present.
    pub fn clear_api_key(&mut self) -> bool {
        self.api_key.take().is_some()
    }

    /// Effective key: a non-blank override wins over the stored key.
    pub fn resolve_api_key(&self, override_key: Option<&str>) -> Option<(String, KeySource)> {
        let non_blank = |k: &&str| !k.trim().is_empty();
        override_key
            .filter(non_blank)
            .map(|k| (k.trim().to_string(), KeySource::Override))
            .or_else(|| {
                self.api_key
                    .as_deref()
                    .filter(non_blank)
                    .map(|k| (k.trim().to_string(), KeySource::File))
            })
    }

    /// Provider configuration for a resolved key.
    pub fn gemini_config(&self, api_key: String) -> GeminiConfig {
        let mut config = GeminiConfig::new(api_key)
            .with_model(self.gemini.model.clone())
            .with_endpoint(self.gemini.endpoint.clone());
        config.timeout_secs = self.gemini.timeout_secs;
        config
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Mask a key for display, keeping the last four characters.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_model() -> String {
    dxflow_llm::gemini::DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    dxflow_llm::gemini::DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    dxflow_llm::gemini::DEFAULT_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxflow_extractor::FallbackPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.gemini.model, dxflow_llm::gemini::DEFAULT_MODEL);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".dxflow").join("config.toml");

        let mut config = Config::default();
        config.set_api_key("  secret-key  ").unwrap();
        config.settings.format = OutputFormat::Json;
        config.analyzer.fallback = FallbackPolicy::Static;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.api_key.as_deref(), Some("secret-key"));
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[settings]\ncolor = false\n\n[gemini]\nmodel = \"gemini-2.5-pro\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.gemini.endpoint, dxflow_llm::gemini::DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_invalid_analyzer_section_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[analyzer.inference]\nmax_retries = 99\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn test_key_management() {
        let mut config = Config::default();
        assert!(config.set_api_key("   ").is_err());
        assert!(!config.clear_api_key());

        config.set_api_key("stored").unwrap();
        assert!(config.clear_api_key());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_override_wins() {
        let mut config = Config::default();
        assert!(config.resolve_api_key(None).is_none());

        config.set_api_key("stored").unwrap();
        assert_eq!(
            config.resolve_api_key(None),
            Some(("stored".to_string(), KeySource::File))
        );
        assert_eq!(
            config.resolve_api_key(Some("env")),
            Some(("env".to_string(), KeySource::Override))
        );
        assert_eq!(
            config.resolve_api_key(Some(" ")),
            Some(("stored".to_string(), KeySource::File))
        );
    }

    #[test]
    fn test_gemini_config_carries_settings() {
        let mut config = Config::default();
        config.gemini.timeout_secs = 5;
        let gemini = config.gemini_config("k".to_string());
        assert_eq!(gemini.api_key, "k");
        assert_eq!(gemini.timeout_secs, 5);
        assert_eq!(gemini.model, config.gemini.model);
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abc"), "****");
        assert_eq!(mask_key("AIzaSyExample1234"), "****1234");
    }
}
