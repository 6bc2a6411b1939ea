//! Tic-tac-toe board model and an opponent that never loses.
//!
//! # Architecture
//!
//! - **Types**: [`Board`], [`Mark`], [`Square`]
//! - **Rules**: win-line table, full-board and outcome checks
//! - **Search**: exhaustive minimax choosing O's reply
//!
//! # Example
//!
//! ```
//! use unbeatable_core::{Board, GameOutcome, Mark, classify, search};
//!
//! let mut board = Board::new();
//! board.apply_move(4, Mark::X)?;
//! assert_eq!(classify(&board), GameOutcome::Ongoing);
//!
//! let reply = search(&board, Mark::O);
//! assert_eq!(reply.index(), Some(0));
//! # Ok::<(), unbeatable_core::CoreError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod rules;
mod search;
mod types;

pub use error::{CoreError, MoveRejection};
pub use rules::{GameOutcome, WIN_LINES, WinLine, classify, find_winning_line, is_full, winner};
pub use search::{Move, SearchReport, WIN_SCORE, analyze, best_move, search, search_symbol};
pub use types::{Board, CELL_COUNT, Mark, Square};
