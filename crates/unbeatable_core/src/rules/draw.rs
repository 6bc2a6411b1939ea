//! Draw detection logic for tic-tac-toe.

use crate::types::{Board, Square};
use tracing::instrument;

/// Checks if the board is full (all squares occupied).
///
/// A full board with no winner indicates a draw.
#[instrument(level = "trace", skip_all, fields(board = %board))]
pub fn is_full(board: &Board) -> bool {
    board_full(board)
}

pub(crate) fn board_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::win::winner;
    use crate::types::Mark;

    fn is_draw(board: &Board) -> bool {
        is_full(board) && winner(board).is_none()
    }

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new();
        board.apply_move(4, Mark::X).unwrap();
        assert!(!is_full(&board));
    }

    #[test]
    fn test_full_board() {
        let board: Board = "XXXXXXXXX".parse().unwrap();
        assert!(is_full(&board));
    }

    #[test]
    fn test_draw_detection() {
        // X O X / X O O / O X X
        let board: Board = "XOXXOOOXX".parse().unwrap();
        assert!(is_draw(&board));
    }

    #[test]
    fn test_not_draw_if_winner() {
        // O completes the top row on the last free cell.
        let board: Board = "OOOXXOXOX".parse().unwrap();
        assert!(is_full(&board));
        assert!(!is_draw(&board));
    }
}
