//! Core domain types for tic-tac-toe.

use crate::error::{CoreError, MoveRejection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::instrument;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// A player's mark.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Mark {
    /// The human player (moves first).
    X,
    /// The computer opponent.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Returns the character drawn for this mark.
    pub fn symbol(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl TryFrom<char> for Mark {
    type Error = CoreError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'X' => Ok(Mark::X),
            'O' => Ok(Mark::O),
            _ => Err(CoreError::InvalidMark(c)),
        }
    }
}

impl FromStr for Mark {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Mark::try_from(c),
            // Report the first offending character, or a NUL for empty input.
            (first, _) => Err(CoreError::InvalidMark(first.unwrap_or('\0'))),
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// Empty cell.
    Empty,
    /// Cell holding a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

/// 3x3 tic-tac-toe board.
///
/// Cells are stored in row-major order:
///
/// ```text
/// 0|1|2
/// 3|4|5
/// 6|7|8
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    squares: [Square; CELL_COUNT],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; CELL_COUNT],
        }
    }

    /// Gets the square at the given index (0-8).
    pub fn get(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Checks if a cell is empty. Out-of-range indices are never empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Square::Empty))
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; CELL_COUNT] {
        &self.squares
    }

    /// Returns each cell's mark, `None` for empty cells.
    pub fn cells(&self) -> [Option<Mark>; CELL_COUNT] {
        self.squares.map(Square::mark)
    }

    /// Iterates the indices of empty cells in ascending order.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Square::Empty)
            .map(|(i, _)| i)
    }

    /// Places `mark` at `index`.
    ///
    /// Fails with [`CoreError::InvalidMove`] if the index is out of range or
    /// the cell is already taken; the board is left untouched in that case.
    #[instrument(skip(self), fields(board = %self.to_compact()))]
    pub fn apply_move(&mut self, index: usize, mark: Mark) -> Result<(), CoreError> {
        match self.squares.get_mut(index) {
            None => Err(MoveRejection::OutOfRange(index).into()),
            Some(Square::Occupied(_)) => Err(MoveRejection::Occupied(index).into()),
            Some(square) => {
                *square = Square::Occupied(mark);
                Ok(())
            }
        }
    }

    /// Returns a copy of the board with `mark` placed at `index`.
    pub fn with_move(&self, index: usize, mark: Mark) -> Result<Board, CoreError> {
        let mut next = self.clone();
        next.apply_move(index, mark)?;
        Ok(next)
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.squares = [Square::Empty; CELL_COUNT];
    }

    /// Writes a square without validation. Only the search's scratch
    /// placement uses this, and it always restores what it overwrote.
    pub(crate) fn set(&mut self, index: usize, square: Square) {
        self.squares[index] = square;
    }

    /// Renders the board as 9 characters, `.` for empty cells.
    pub fn to_compact(&self) -> String {
        self.squares
            .iter()
            .map(|s| s.mark().map_or('.', Mark::symbol))
            .collect()
    }

    /// Formats the board as a human-readable grid.
    ///
    /// Empty cells show their 1-based number so a player can pick them.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.squares[pos] {
                    Square::Empty => char::from(b'1' + pos as u8),
                    Square::Occupied(mark) => mark.symbol(),
                };
                result.push(symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_compact())
    }
}

impl FromStr for Board {
    type Err = CoreError;

    /// Parses 9 row-major characters: `X`, `O`, or one of `.`, `-`, `_`,
    /// space for an empty cell.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != CELL_COUNT {
            return Err(CoreError::InvalidBoard(format!(
                "expected {} cells, got {}",
                CELL_COUNT,
                chars.len()
            )));
        }

        let mut board = Board::new();
        for (index, c) in chars.into_iter().enumerate() {
            board.squares[index] = match c {
                '.' | '-' | '_' | ' ' => Square::Empty,
                other => match Mark::try_from(other) {
                    Ok(mark) => Square::Occupied(mark),
                    Err(_) => {
                        return Err(CoreError::InvalidBoard(format!(
                            "unexpected {:?} at cell {}",
                            other, index
                        )));
                    }
                },
            };
        }
        Ok(board)
    }
}
