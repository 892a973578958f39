use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use nutrichat::chat;
use nutrichat::config::{Cli, Commands};
use nutrichat::web_server::{self, ServerConfig};

// The main entry point of the application, using tokio's async runtime
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for NUTRICHAT_* settings)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG environment variable (e.g., RUST_LOG=info,nutrichat=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("nutrichat starting with command: {:?}", cli.command);

    match cli.command {
        Commands::Serve(args) => {
            let config = ServerConfig::from(args);
            info!("Starting web server on {}:{}...", config.host, config.port);
            web_server::start_web_server(config, shutdown_signal())
                .await
                .context("Web server failed")?;
            info!("Shutdown complete.");
        }
        Commands::Chat { timing } => {
            info!("Starting interactive chat session...");
            chat::run_terminal_chat((&timing).into())
                .await
                .context("Chat session failed")?;
            info!("Chat session finished.");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, initiating shutdown..."),
        Err(e) => tracing::error!("Failed to listen for Ctrl-C: {:?}", e),
    }
}
