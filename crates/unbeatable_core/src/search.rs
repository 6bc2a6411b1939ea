//! Exhaustive minimax search for the computer opponent.
//!
//! O maximises, X minimises. Terminal boards score +10 for an O line,
//! -10 for an X line and 0 for a draw, independent of depth, so a quick
//! win and a slow win look the same to the search. Children are tried in
//! ascending cell order and only a strictly better score replaces the
//! current best, which makes the lowest index win every tie.

use crate::error::CoreError;
use crate::rules::{draw::board_full, win::completed_line};
use crate::types::{Board, CELL_COUNT, Mark, Square};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Score of a board where O holds a line. X's lines score the negation.
pub const WIN_SCORE: i32 = 10;

/// A scored move.
///
/// `index` is `None` when the searched board was already terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    index: Option<usize>,
    score: i32,
}

impl Move {
    fn terminal(score: i32) -> Self {
        Self { index: None, score }
    }

    fn candidate(index: usize, score: i32) -> Self {
        Self {
            index: Some(index),
            score,
        }
    }

    /// The chosen cell, if the board had one to choose.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The minimax value of the position for O.
    pub fn score(&self) -> i32 {
        self.score
    }
}

/// Result of one top-level search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, derive_new::new)]
pub struct SearchReport {
    /// The selected move.
    best: Move,
    /// Positions visited, including the root.
    nodes: u64,
}

/// A mark placed on the scratch board for the duration of one branch.
///
/// Dropping the guard empties the cell again, so the board is restored
/// on every path out of the branch.
struct Placement<'a> {
    board: &'a mut Board,
    index: usize,
}

impl<'a> Placement<'a> {
    fn new(board: &'a mut Board, index: usize, mark: Mark) -> Self {
        board.set(index, Square::Occupied(mark));
        Self { board, index }
    }

    fn board(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for Placement<'_> {
    fn drop(&mut self) {
        self.board.set(self.index, Square::Empty);
    }
}

/// Searches the full game tree below `board` with `mark` to move.
///
/// The caller's board is never modified; the search works on its own copy.
#[instrument(skip(board), fields(board = %board))]
pub fn analyze(board: &Board, mark: Mark) -> SearchReport {
    let mut scratch = board.clone();
    let mut nodes = 0;
    let best = minimax(&mut scratch, mark, &mut nodes);
    debug!(
        nodes,
        index = ?best.index(),
        score = best.score(),
        "Search complete"
    );
    SearchReport::new(best, nodes)
}

/// Returns the optimal move for `mark` on `board`.
pub fn search(board: &Board, mark: Mark) -> Move {
    *analyze(board, mark).best()
}

/// Returns just the cell `mark` should play, `None` on a finished board.
pub fn best_move(board: &Board, mark: Mark) -> Option<usize> {
    search(board, mark).index()
}

/// Like [`search`], taking the mark as a raw symbol.
///
/// Anything other than `X` or `O` is rejected before the search starts.
pub fn search_symbol(board: &Board, symbol: char) -> Result<Move, CoreError> {
    let mark = Mark::try_from(symbol)?;
    Ok(search(board, mark))
}

fn terminal_score(winner: Mark) -> i32 {
    match winner {
        Mark::O => WIN_SCORE,
        Mark::X => -WIN_SCORE,
    }
}

fn improves(mark: Mark, score: i32, best: i32) -> bool {
    match mark {
        Mark::O => score > best,
        Mark::X => score < best,
    }
}

fn minimax(board: &mut Board, mark: Mark, nodes: &mut u64) -> Move {
    *nodes += 1;

    if let Some((_, winner)) = completed_line(board) {
        return Move::terminal(terminal_score(winner));
    }
    if board_full(board) {
        return Move::terminal(0);
    }

    // Worse than any real score, so the first candidate always replaces it.
    let mut best = Move::terminal(match mark {
        Mark::O => i32::MIN,
        Mark::X => i32::MAX,
    });

    for index in 0..CELL_COUNT {
        if !board.is_empty(index) {
            continue;
        }
        let score = {
            let mut placed = Placement::new(board, index, mark);
            minimax(placed.board(), mark.opponent(), nodes).score
        };
        if improves(mark, score, best.score) {
            best = Move::candidate(index, score);
        }
    }

    best
}
