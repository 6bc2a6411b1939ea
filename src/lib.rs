//! Unbeatable tic-tac-toe.
//!
//! A human plays X against a computer O driven by the exhaustive minimax
//! search in [`unbeatable_core`].
//!
//! # Architecture
//!
//! - **Session**: board, running score and turn sequencing
//! - **Terminal**: line-oriented game on stdin/stdout
//! - **Server**: JSON API for a browser front end
//! - **Config**: TOML settings for the server and logging
//!
//! # Example
//!
//! ```
//! use unbeatable::GameSession;
//!
//! let mut session = GameSession::new();
//! let (human, computer) = session.play_turn(4)?;
//! assert_eq!(*human.cell(), 4);
//! assert_eq!(computer.map(|turn| *turn.cell()), Some(0));
//! # Ok::<(), unbeatable::SessionError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod server;
pub mod session;
pub mod terminal;

pub use config::{AppConfig, ConfigError, LogConfig, ServerConfig};
pub use server::{AppState, router};
pub use session::{Cue, GameSession, PendingReply, Scoreboard, SessionError, Turn};
