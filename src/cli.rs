//! Command-line interface for unbeatable.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Unbeatable - tic-tac-toe against a computer that never loses
#[derive(Parser, Debug)]
#[command(name = "unbeatable")]
#[command(about = "Tic-tac-toe against a minimax opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./unbeatable.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play,

    /// Run the HTTP game server
    Serve {
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the best move for a position as JSON
    Solve {
        /// Nine row-major cells: X, O, or . for empty (e.g. "X...O...X")
        #[arg(short, long)]
        board: String,

        /// Side to move
        #[arg(short, long, default_value = "O")]
        mark: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["unbeatable", "serve", "--port", "8080"]);
        match cli.command {
            Command::Serve { port, host } => {
                assert_eq!(port, Some(8080));
                assert_eq!(host, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_solve_with_global_config() {
        let cli = Cli::parse_from([
            "unbeatable",
            "solve",
            "-b",
            "X........",
            "--config",
            "a.toml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
        match cli.command {
            Command::Solve { board, mark } => {
                assert_eq!(board, "X........");
                assert_eq!(mark, "O");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
