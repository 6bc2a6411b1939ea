//! Game rules for tic-tac-toe.
//!
//! Pure functions that evaluate a board snapshot. Rules are kept apart
//! from board storage so the search and the session share one
//! definition of "the game is over".

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{WIN_LINES, WinLine, find_winning_line, winner};

use crate::types::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Terminal classification of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Moves remain and nobody has a line.
    Ongoing,
    /// The mark completed a line.
    Win(Mark),
    /// The board is full without a line.
    Draw,
}

impl GameOutcome {
    /// True for `Win` and `Draw`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameOutcome::Ongoing)
    }
}

/// Classifies the board: a win beats a full board, a full board is a draw,
/// anything else is still in play.
#[instrument(level = "debug", skip_all, fields(board = %board))]
pub fn classify(board: &Board) -> GameOutcome {
    if let Some((_, mark)) = win::completed_line(board) {
        GameOutcome::Win(mark)
    } else if draw::board_full(board) {
        GameOutcome::Draw
    } else {
        GameOutcome::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_is_ongoing() {
        assert_eq!(classify(&Board::new()), GameOutcome::Ongoing);
        assert!(!classify(&Board::new()).is_terminal());
    }

    #[test]
    fn test_full_top_row_of_o_is_win() {
        let board: Board = "OOOXXOXXO".parse().unwrap();
        assert_eq!(classify(&board), GameOutcome::Win(Mark::O));
    }

    #[test]
    fn test_draw_board() {
        let board: Board = "XOXXOOOXX".parse().unwrap();
        assert_eq!(classify(&board), GameOutcome::Draw);
        assert!(classify(&board).is_terminal());
    }

    #[test]
    fn test_win_on_partial_board() {
        let board: Board = "X..X..X.O".parse().unwrap();
        assert_eq!(classify(&board), GameOutcome::Win(Mark::X));
    }
}
