//! aki-gateway: Akinator LINE Bot Main Binary
//!
//! Usage:
//!   aki-gateway           - Start the webhook server
//!   aki-gateway --check   - Validate configuration and exit
//!   aki-gateway --help    - Show help

use std::sync::Arc;

use aki_core::{AkinatorFactory, Config};
use aki_line::LineBot;
use tracing_subscriber::EnvFilter;

/// Run mode
#[derive(Debug, PartialEq)]
enum RunMode {
    /// Webhook server
    Server,
    /// Validate configuration only
    Check,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = parse_args(std::env::args().skip(1));

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("aki-gateway {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    if mode == RunMode::Check {
        tracing::info!("Configuration OK");
        return Ok(());
    }

    run_server(config).await
}

/// Parse command line arguments
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> RunMode {
    for arg in args {
        match arg.as_str() {
            "--check" => return RunMode::Check,
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Server
}

/// Print help message
fn print_help() {
    println!("aki-gateway - Akinator bot for LINE");
    println!();
    println!("Usage:");
    println!("  aki-gateway           Start the webhook server");
    println!("  aki-gateway --check   Validate configuration and exit");
    println!("  aki-gateway --help    Show this help message");
    println!("  aki-gateway --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  CHANNEL_SECRET        LINE channel secret (required)");
    println!("  CHANNEL_ACCESS_TOKEN  LINE channel access token (required)");
    println!("  BASE_URL              Public URL of this server (required)");
    println!("  PORT                  Webhook server port (default: 3000)");
    println!("  IMAGES_DIR            Directory served under /images (default: images)");
    println!("  AKI_LANGUAGE          Akinator region (default: en)");
    println!("  AKI_CHILD_MODE        Child mode (default: false)");
    println!("  AKI_WIN_PROGRESS      Progress needed to guess (default: 80)");
    println!("  AKI_MAX_STEPS         Questions before forcing a guess (default: 50)");
}

/// Run the webhook server until Ctrl+C
async fn run_server(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting aki-gateway...");
    tracing::info!("Akinator region: {}", config.game.language);

    let factory = AkinatorFactory::new(&config.game)
        .map_err(|e| anyhow::anyhow!("Failed to create game client: {}", e))?;
    let bot = LineBot::new(config, Arc::new(factory))?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutting down...");
            let _ = shutdown_tx.send(());
        }
    });

    bot.run(shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
