//! dxflow Router
//!
//! HTTP service that turns clinical notes into diagnostic workflow graphs
//! for a browser front end.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::RouterConfig;
use dxflow_extractor::{AnalysisSession, Analyzer};
use dxflow_llm::GeminiProvider;
use handlers::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Router error
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Inference provider could not be built
    #[error("Provider error: {0}")]
    Provider(#[from] dxflow_llm::LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the analyzer described by the configuration
pub fn build_analyzer(config: &RouterConfig) -> Result<Analyzer<GeminiProvider>, RouterError> {
    let provider = match &config.gemini {
        Some(gemini) => Some(GeminiProvider::new(gemini.clone())?),
        None => {
            warn!("No Gemini configuration; serving rule-based analysis only");
            None
        }
    };
    Ok(Analyzer::new(provider, config.analyzer.clone()))
}

/// Start the Router HTTP server
pub async fn start_server(config: RouterConfig) -> Result<(), RouterError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting dxflow Router");
    info!("Bind address: {}", config.bind_addr());

    // The blocking HTTP client must be built off the async runtime
    let analyzer_config = config.clone();
    let analyzer = tokio::task::spawn_blocking(move || build_analyzer(&analyzer_config))
        .await
        .map_err(|e| RouterError::Server(format!("Task join error: {}", e)))??;
    info!(
        "Inference {} (model: {})",
        if analyzer.inference_enabled() { "enabled" } else { "disabled" },
        analyzer.model_name().unwrap_or("none")
    );

    let state = AppState::new(AnalysisSession::new(analyzer));
    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Router listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| RouterError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxflow_llm::GeminiConfig;

    #[test]
    fn test_build_analyzer_without_gemini() {
        let analyzer = build_analyzer(&RouterConfig::default_test_config()).unwrap();
        assert!(!analyzer.inference_enabled());
        assert!(analyzer.model_name().is_none());
    }

    #[test]
    fn test_build_analyzer_with_gemini() {
        let mut config = RouterConfig::default_test_config();
        config.gemini = Some(GeminiConfig::new("test-key").with_model("gemini-2.5-pro"));

        let analyzer = build_analyzer(&config).unwrap();
        assert!(analyzer.inference_enabled());
        assert_eq!(analyzer.model_name(), Some("gemini-2.5-pro"));
    }
}
