//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "DXFLOW_API_KEY";

/// dxflow CLI - Turn clinical notes into diagnostic workflow graphs.
#[derive(Debug, Parser)]
#[command(name = "dxflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.dxflow/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Gemini API key, overriding the stored one
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format (the full result)
    Json,
    /// Quiet format (problem list only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a clinical note
    Analyze(AnalyzeArgs),

    /// Manage the configuration file and stored API key
    Config(ConfigArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Note text
    pub text: Option<String>,

    /// Read the note from a file
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Read the note from stdin
    #[arg(long, conflicts_with_all = ["text", "file"])]
    pub stdin: bool,

    /// Skip inference and use the rule-based pipeline only
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Store the Gemini API key
    SetKey {
        /// API key
        key: String,
    },

    /// Remove the stored API key
    ClearKey,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_analyze_text() {
        let cli = Cli::parse_from(["dxflow", "analyze", "fever and cough"]);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.text.as_deref(), Some("fever and cough"));
                assert!(!args.offline);
                assert!(!args.stdin);
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_analyze_flags() {
        let cli = Cli::parse_from([
            "dxflow", "analyze", "--file", "note.txt", "--offline", "--format", "json", "--no-color",
        ]);
        assert_eq!(cli.format, Some(CliFormat::Json));
        assert!(cli.no_color);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.file, Some(PathBuf::from("note.txt")));
                assert!(args.offline);
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_conflicting_sources_rejected() {
        let result = Cli::try_parse_from(["dxflow", "analyze", "fever", "--stdin"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_set_key() {
        let cli = Cli::parse_from(["dxflow", "config", "set-key", "abc123"]);
        match cli.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::SetKey { key },
            }) => assert_eq!(key, "abc123"),
            _ => panic!("Expected config set-key"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["dxflow"]).is_err());
    }

    #[test]
    fn test_format_conversion() {
        let format: OutputFormat = CliFormat::Quiet.into();
        assert_eq!(format, OutputFormat::Quiet);
    }
}
