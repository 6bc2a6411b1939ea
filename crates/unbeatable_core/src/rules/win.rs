//! Win detection logic for tic-tac-toe.

use crate::types::{Board, Mark, Square};
use tracing::instrument;

/// Three cell indices forming a straight line.
pub type WinLine = [usize; 3];

/// Every winning line: rows, then columns, then diagonals.
///
/// The order is significant: [`find_winning_line`] reports the first
/// complete line in this order.
pub const WIN_LINES: [WinLine; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the first complete line on the board, if any.
#[instrument(level = "trace", skip_all, fields(board = %board))]
pub fn find_winning_line(board: &Board) -> Option<WinLine> {
    completed_line(board).map(|(line, _)| line)
}

/// Returns the mark holding a complete line, if any.
#[instrument(level = "trace", skip_all, fields(board = %board))]
pub fn winner(board: &Board) -> Option<Mark> {
    completed_line(board).map(|(_, mark)| mark)
}

/// Uninstrumented line scan shared with the search's hot loop.
pub(crate) fn completed_line(board: &Board) -> Option<(WinLine, Mark)> {
    let squares = board.squares();
    WIN_LINES.into_iter().find_map(|line @ [a, b, c]| match squares[a] {
        Square::Occupied(mark) if squares[b] == squares[a] && squares[c] == squares[a] => {
            Some((line, mark))
        }
        _ => None,
    })
}
