use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::constants::{DEFAULT_HOST, DEFAULT_RESPONSE_DELAY_MS};
use crate::controller::ControllerConfig;
use crate::web_server::ServerConfig;

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

// Define the available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the chat widget over HTTP and WebSocket.
    Serve(ServeArgs),
    /// Chat with the assistant in the terminal.
    Chat {
        #[command(flatten)]
        timing: TimingArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "NUTRICHAT_HOST", default_value_t = DEFAULT_HOST.clone(), help = "Address to bind.")]
    pub host: String,
    #[arg(long, env = "NUTRICHAT_PORT", default_value_t = 9900, help = "Port for the web server.")]
    pub port: u16,
    #[arg(long, env = "NUTRICHAT_STATIC_DIR", help = "Serve /static from this directory instead of the built-in assets.")]
    pub static_dir: Option<PathBuf>,
    #[arg(long, env = "NUTRICHAT_TEMPLATES_DIR", help = "Load templates from this directory and reload them on change.")]
    pub templates_dir: Option<PathBuf>,
    #[command(flatten)]
    pub timing: TimingArgs,
}

#[derive(Args, Debug, Clone)]
pub struct TimingArgs {
    #[arg(long, default_value_t = *DEFAULT_RESPONSE_DELAY_MS, help = "Milliseconds before the bot answers.")]
    pub response_delay_ms: u64,
}

impl From<&TimingArgs> for ControllerConfig {
    fn from(args: &TimingArgs) -> Self {
        Self {
            response_delay: Duration::from_millis(args.response_delay_ms),
        }
    }
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            controller: (&args.timing).into(),
            host: args.host,
            port: args.port,
            static_dir: args.static_dir,
            templates_dir: args.templates_dir,
        }
    }
}
