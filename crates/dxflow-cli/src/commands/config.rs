//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{mask_key, Config, KeySource};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &mut Config,
    path: &Path,
    api_key: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(config, path, api_key, formatter),
        ConfigAction::SetKey { key } => set_key(config, path, &key, formatter),
        ConfigAction::ClearKey => clear_key(config, path, formatter),
    }
}

/// Show the effective configuration.
fn show_config(
    config: &Config,
    path: &Path,
    api_key: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    println!("Config file: {}", path.display());

    match config.resolve_api_key(api_key) {
        Some((key, KeySource::Override)) => {
            println!("API key: {} (from --api-key or DXFLOW_API_KEY)", mask_key(&key))
        }
        Some((key, KeySource::File)) => println!("API key: {} (stored)", mask_key(&key)),
        None => println!("API key: {}", formatter.warning("not set")),
    }

    println!("Model: {}", config.gemini.model);
    println!("Endpoint: {}", config.gemini.endpoint);
    println!("Color: {}", config.settings.color);
    println!("Format: {:?}", config.settings.format);
    println!();
    println!("[analyzer]");
    let analyzer = config.analyzer.to_toml().map_err(CliError::Config)?;
    print!("{}", analyzer);

    Ok(())
}

/// Store the API key.
fn set_key(config: &mut Config, path: &Path, key: &str, formatter: &Formatter) -> Result<()> {
    config.set_api_key(key)?;
    config.save_to(path)?;
    println!("{}", formatter.success(&format!("API key stored in {}", path.display())));
    Ok(())
}

/// Remove the stored API key.
fn clear_key(config: &mut Config, path: &Path, formatter: &Formatter) -> Result<()> {
    if config.clear_api_key() {
        config.save_to(path)?;
        println!("{}", formatter.success("API key removed"));
    } else {
        println!("{}", formatter.info("No API key stored"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Table, false)
    }

    #[test]
    fn test_set_and_clear_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();

        let args = ConfigArgs {
            action: ConfigAction::SetKey {
                key: "my-key".to_string(),
            },
        };
        execute_config(args, &mut config, &path, None, &formatter()).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().api_key.as_deref(), Some("my-key"));

        let args = ConfigArgs {
            action: ConfigAction::ClearKey,
        };
        execute_config(args, &mut config, &path, None, &formatter()).unwrap();
        assert!(Config::load_from(&path).unwrap().api_key.is_none());
    }

    #[test]
    fn test_blank_key_not_saved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();

        let args = ConfigArgs {
            action: ConfigAction::SetKey {
                key: "  ".to_string(),
            },
        };
        let result = execute_config(args, &mut config, &path, None, &formatter());
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_show_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();

        let args = ConfigArgs {
            action: ConfigAction::Show,
        };
        execute_config(args, &mut config, &path, Some("env-key"), &formatter()).unwrap();
        assert!(!path.exists());
    }
}
