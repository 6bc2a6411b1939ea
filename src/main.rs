//! Unbeatable - unified CLI
//!
//! Play in the terminal, serve the JSON API, or solve a single position.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;
use unbeatable::server::{self, SolveResponse};
use unbeatable::{AppConfig, GameSession, terminal};
use unbeatable_core::{Board, Mark, analyze, classify};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    init_tracing(&config);
    debug!(?config, "Configuration resolved");

    match cli.command {
        Command::Play => run_terminal().await,
        Command::Serve { port, host } => run_server(config, host, port).await,
        Command::Solve { board, mark } => run_solve(&board, &mark),
    }
}

/// Logs go to stderr so the terminal game owns stdout.
fn init_tracing(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log().filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the terminal game on stdin/stdout
async fn run_terminal() -> Result<()> {
    // Reading stdin blocks, so keep it off the async workers.
    tokio::task::spawn_blocking(|| {
        let mut session = GameSession::new();
        let stdin = std::io::stdin();
        terminal::run(&mut session, stdin.lock(), std::io::stdout().lock())
    })
    .await
    .context("Terminal task panicked")?
}

/// Run the HTTP game server
async fn run_server(config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = config.with_server_overrides(host, port);
    info!("Starting unbeatable HTTP server");
    server::serve(config.server()).await
}

/// Print the best move for one position
#[instrument]
fn run_solve(board: &str, mark: &str) -> Result<()> {
    let board: Board = board.parse()?;
    let mark: Mark = mark.parse()?;

    let report = analyze(&board, mark);
    let response = SolveResponse {
        best: *report.best(),
        outcome: classify(&board),
        nodes: *report.nodes(),
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
