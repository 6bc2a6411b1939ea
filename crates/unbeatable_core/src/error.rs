//! Error types for the board model and search.

use derive_more::Display;

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MoveRejection {
    /// The cell index is outside 0-8.
    #[display("cell {} is out of range (must be 0-8)", _0)]
    OutOfRange(usize),

    /// The cell already holds a mark.
    #[display("cell {} is already occupied", _0)]
    Occupied(usize),
}

/// Errors raised at the core's call boundary.
///
/// All of these are caller mistakes: the search itself is total and
/// never fails once it has a valid board and mark.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum CoreError {
    /// A move targeted an occupied or out-of-range cell.
    #[display("Invalid move: {}", _0)]
    InvalidMove(MoveRejection),

    /// A mark symbol other than X or O.
    #[display("Invalid mark {:?} (expected X or O)", _0)]
    InvalidMark(char),

    /// A board string that could not be parsed.
    #[display("Invalid board: {}", _0)]
    InvalidBoard(String),
}

impl std::error::Error for CoreError {}

impl From<MoveRejection> for CoreError {
    fn from(rejection: MoveRejection) -> Self {
        CoreError::InvalidMove(rejection)
    }
}
