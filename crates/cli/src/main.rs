mod auth;
mod client;
mod config;
mod sessions;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "workdeck", about = "workdeck CLI - monitor and control agent sessions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the live dashboard (default)
    Dash,

    /// Sign in and store the refresh credential
    Login {
        /// Username (prompted when omitted)
        #[arg(long, short)]
        username: Option<String>,
    },

    /// Revoke the stored credential and sign out
    Logout,

    /// Print the current sessions grouped by group
    Sessions,

    /// Show or set configuration
    Config {
        /// Set the server URL
        #[arg(long)]
        server: Option<String>,

        /// Accept self-signed server certificates
        #[arg(long)]
        accept_invalid_certs: Option<bool>,
    },
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dash);

    if let Err(e) = run(command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    let dir = config::config_dir()?;

    match command {
        Commands::Dash => {
            init_file_logging(&dir)?;
            let config = config::load_config(&dir)?;
            let client = client::connect(&dir, &config)?;
            match workdeck_tui::run(&config, client)? {
                workdeck_tui::Exit::Quit => {}
                workdeck_tui::Exit::SignedOut => {
                    println!("Signed out. Run `workdeck login` to sign in again.");
                }
            }
            Ok(())
        }
        Commands::Config {
            server,
            accept_invalid_certs,
        } => {
            init_stderr_logging();
            if server.is_none() && accept_invalid_certs.is_none() {
                config::show_config(&dir)
            } else {
                config::set_config(&dir, server, accept_invalid_certs)
            }
        }
        Commands::Login { username } => {
            init_stderr_logging();
            let config = config::load_config(&dir)?;
            let client = client::connect(&dir, &config)?;
            block_on(auth::run_login(&client, username))
        }
        Commands::Logout => {
            init_stderr_logging();
            let config = config::load_config(&dir)?;
            let client = client::connect(&dir, &config)?;
            block_on(auth::run_logout(&client))
        }
        Commands::Sessions => {
            init_stderr_logging();
            let config = config::load_config(&dir)?;
            let client = client::connect(&dir, &config)?;
            block_on(sessions::run_sessions(&client))
        }
    }
}

fn block_on<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
    tokio::runtime::Runtime::new()
        .context("Failed to start async runtime")?
        .block_on(future)
}

fn env_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// The dashboard owns the terminal, so its logs go to a file.
fn init_file_logging(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create config dir at {}", dir.display()))?;
    let path = dir.join(config::LOG_FILE_NAME);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file at {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
