//! dxflow CLI - Turn clinical notes into diagnostic workflow graphs.

use anyhow::Context;
use clap::Parser;
use dxflow_cli::commands;
use dxflow_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = match cli.config {
        Some(path) => path,
        None => Config::path()?,
    };
    let mut config = Config::load_from(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);
    let api_key = cli.api_key.as_deref();

    match cli.command {
        Command::Analyze(args) => {
            commands::execute_analyze(args, &config, api_key, &formatter)
                .await
                .context("Analysis failed")?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &mut config, &path, api_key, &formatter)?;
        }
    }

    Ok(())
}
