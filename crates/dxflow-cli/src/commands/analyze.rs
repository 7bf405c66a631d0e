//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use dxflow_extractor::Analyzer;
use dxflow_llm::{GeminiConfig, GeminiProvider};
use std::fs;
use std::io::{self, Read};
use tracing::debug;

/// Execute the analyze command.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    config: &Config,
    api_key: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    let note = read_note(&args, io::stdin())?;

    let provider = match provider_config(config, args.offline, api_key) {
        Some(gemini) => {
            debug!("Using model {}", gemini.model);
            // The blocking HTTP client must be built off the async runtime
            let provider = tokio::task::spawn_blocking(move || GeminiProvider::new(gemini))
                .await
                .map_err(|e| CliError::Config(format!("Task join error: {}", e)))??;
            Some(provider)
        }
        None => {
            if !args.offline {
                eprintln!(
                    "{}",
                    formatter.warning("No API key configured; using rule-based analysis")
                );
            }
            None
        }
    };

    let analyzer = Analyzer::new(provider, config.analyzer.clone());
    let result = analyzer.analyze(&note).await?;

    println!("{}", formatter.format_analysis(&result)?);

    Ok(())
}

/// Read the note from the argument, a file or `stdin`.
pub fn read_note(args: &AnalyzeArgs, mut stdin: impl Read) -> Result<String> {
    let note = if args.stdin {
        let mut buffer = String::new();
        stdin.read_to_string(&mut buffer)?;
        buffer
    } else if let Some(path) = &args.file {
        fs::read_to_string(path)?
    } else if let Some(text) = &args.text {
        text.clone()
    } else {
        return Err(CliError::InvalidInput(
            "Provide note text, --file or --stdin".to_string(),
        ));
    };

    Ok(note)
}

/// Provider settings, or `None` when offline or no key is available.
pub fn provider_config(
    config: &Config,
    offline: bool,
    api_key: Option<&str>,
) -> Option<GeminiConfig> {
    if offline {
        return None;
    }
    config
        .resolve_api_key(api_key)
        .map(|(key, _)| config.gemini_config(key))
}
