//! dxflow Router binary
//!
//! Starts the HTTP analysis service.

use dxflow_router::{config::RouterConfig, start_server, RouterError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), RouterError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        RouterConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default test configuration");
        eprintln!("Usage: dxflow-router --config <path-to-config.toml>");
        eprintln!();
        let mut config = RouterConfig::default_test_config();
        config.apply_api_key(env::var(dxflow_router::config::API_KEY_ENV).ok());
        config
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("dxflow Router - Clinical note analysis service");
    println!();
    println!("USAGE:");
    println!("    dxflow-router --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENDPOINTS:");
    println!("    POST /analyze            {{\"note\": \"...\"}} -> workflow graph");
    println!("    GET  /analysis/latest    Most recent completed analysis");
    println!("    GET  /health             Service status");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (e.g., '127.0.0.1')");
    println!("    - bind_port: Port number (e.g., 8080)");
    println!("    - [gemini]: api_key, model, endpoint, timeout_secs (optional)");
    println!("    - [analyzer]: fallback, match_mode, layout, [analyzer.inference]");
    println!();
    println!("    DXFLOW_API_KEY overrides gemini.api_key. RUST_LOG sets log level.");
    println!();
}
