//! A human-versus-computer game with a running score.
//!
//! The session is the only owner of the board between turns. Front ends
//! feed it the human's cell, ask it for a board snapshot to search on,
//! and hand the search result back. Nothing here is global: a process can
//! host as many sessions as it likes.

use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use unbeatable_core::{
    Board, CoreError, GameOutcome, Mark, WinLine, classify, find_winning_line,
};

/// The human always plays X and moves first.
pub const HUMAN: Mark = Mark::X;

/// The computer always plays O.
pub const COMPUTER: Mark = Mark::O;

/// Finished games per result, kept across restarts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Games won by X.
    x_wins: u32,
    /// Games won by O.
    o_wins: u32,
    /// Drawn games.
    draws: u32,
}

impl Scoreboard {
    fn record(&mut self, outcome: GameOutcome) {
        match outcome {
            GameOutcome::Win(Mark::X) => self.x_wins += 1,
            GameOutcome::Win(Mark::O) => self.o_wins += 1,
            GameOutcome::Draw => self.draws += 1,
            GameOutcome::Ongoing => {}
        }
    }
}

/// Sound the front end should play when a game ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// Someone completed a line.
    Win,
    /// The board filled up.
    Draw,
}

/// What happened on one placement.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct Turn {
    /// Cell that was played.
    cell: usize,
    /// Mark that was placed.
    mark: Mark,
    /// Classification after the placement.
    outcome: GameOutcome,
    /// The completed line to highlight, on a win.
    winning_line: Option<WinLine>,
    /// Sound cue, on a finished game.
    cue: Option<Cue>,
}

/// Reasons a session refuses a move.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionError {
    /// The game has ended; restart to play again.
    #[display("Game is already over")]
    GameOver,

    /// The computer has not replied to the last move yet.
    #[display("Waiting for the computer's move")]
    AwaitingComputer,

    /// No computer reply is pending.
    #[display("It's not the computer's turn")]
    NotComputersTurn,

    /// The reply was computed for a position the session has since left.
    #[display("Computer reply no longer matches the game")]
    StaleReply,

    /// The core rejected the placement.
    #[display("{}", _0)]
    Move(CoreError),
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Move(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CoreError> for SessionError {
    fn from(err: CoreError) -> Self {
        SessionError::Move(err)
    }
}

/// A computer reply the session is waiting for.
///
/// The token ties the eventual answer to the position it was searched on;
/// a restart or a later human move makes it stale.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PendingReply {
    /// Epoch the reply belongs to.
    token: u64,
    /// Snapshot to search on.
    board: Board,
}

/// One board, one running score.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    board: Board,
    score: Scoreboard,
    game_over: bool,
    awaiting_computer: bool,
    winning_line: Option<WinLine>,
    epoch: u64,
}

impl GameSession {
    /// Creates a session with an empty board and zero score.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating new game session");
        Self::default()
    }

    /// The current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The running score.
    pub fn score(&self) -> &Scoreboard {
        &self.score
    }

    /// Whether the current game has finished.
    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Whether a human move is waiting for the computer's reply.
    pub fn is_awaiting_computer(&self) -> bool {
        self.awaiting_computer
    }

    /// The line that ended the current game, if it ended in a win.
    pub fn winning_line(&self) -> Option<WinLine> {
        self.winning_line
    }

    /// Classification of the current board.
    pub fn outcome(&self) -> GameOutcome {
        classify(&self.board)
    }

    /// Places the human's mark.
    ///
    /// On an ongoing board the session then waits for
    /// [`computer_move`](Self::computer_move) and refuses further human
    /// moves until it arrives.
    #[instrument(skip(self), fields(board = %self.board))]
    pub fn human_move(&mut self, cell: usize) -> Result<Turn, SessionError> {
        if self.game_over {
            warn!(cell, "Move after game over");
            return Err(SessionError::GameOver);
        }
        if self.awaiting_computer {
            warn!(cell, "Move while computer is thinking");
            return Err(SessionError::AwaitingComputer);
        }

        let turn = self.place(cell, HUMAN)?;
        self.awaiting_computer = !turn.outcome.is_terminal();
        if self.awaiting_computer {
            self.epoch += 1;
        }
        Ok(turn)
    }

    /// The reply to search for, while one is pending.
    pub fn pending_search(&self) -> Option<PendingReply> {
        self.awaiting_computer.then(|| PendingReply {
            token: self.epoch,
            board: self.board.clone(),
        })
    }

    /// Places the computer's reply to `pending`.
    ///
    /// Fails with [`SessionError::StaleReply`] when the session has moved on
    /// since `pending` was taken.
    #[instrument(skip(self, pending), fields(board = %self.board, token = pending.token))]
    pub fn computer_move(
        &mut self,
        pending: &PendingReply,
        cell: usize,
    ) -> Result<Turn, SessionError> {
        self.check_pending(pending)?;

        let turn = self.place(cell, COMPUTER)?;
        self.awaiting_computer = false;
        Ok(turn)
    }

    /// Gives up on `pending` without placing a mark, handing the turn back
    /// to the human. Token checks match [`computer_move`](Self::computer_move).
    #[instrument(skip(self, pending), fields(token = pending.token))]
    pub fn abandon_reply(&mut self, pending: &PendingReply) -> Result<(), SessionError> {
        self.check_pending(pending)?;
        warn!("Computer reply abandoned");
        self.awaiting_computer = false;
        Ok(())
    }

    /// Plays the human's cell and, if the game goes on, the computer's
    /// reply, searching synchronously.
    ///
    /// Returns the human's turn and the computer's, if it moved.
    pub fn play_turn(&mut self, cell: usize) -> Result<(Turn, Option<Turn>), SessionError> {
        let human = self.human_move(cell)?;
        let Some(pending) = self.pending_search() else {
            return Ok((human, None));
        };

        let Some(reply) = unbeatable_core::best_move(&pending.board, COMPUTER) else {
            error!(board = %pending.board, "Search found no reply on an ongoing board");
            self.abandon_reply(&pending)?;
            return Ok((human, None));
        };
        let computer = self.computer_move(&pending, reply)?;
        Ok((human, Some(computer)))
    }

    /// Clears the board for a new game. The score is kept.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!(score = ?self.score, "Restarting game");
        self.board.clear();
        self.game_over = false;
        self.awaiting_computer = false;
        self.winning_line = None;
        self.epoch += 1;
    }

    fn check_pending(&self, pending: &PendingReply) -> Result<(), SessionError> {
        if pending.token != self.epoch {
            warn!(
                expected = self.epoch,
                got = pending.token,
                "Discarding stale computer reply"
            );
            return Err(SessionError::StaleReply);
        }
        if !self.awaiting_computer {
            return Err(SessionError::NotComputersTurn);
        }
        Ok(())
    }

    fn place(&mut self, cell: usize, mark: Mark) -> Result<Turn, SessionError> {
        self.board.apply_move(cell, mark)?;
        let outcome = classify(&self.board);
        debug!(cell, %mark, ?outcome, "Mark placed");

        let cue = match outcome {
            GameOutcome::Ongoing => None,
            GameOutcome::Win(_) => Some(Cue::Win),
            GameOutcome::Draw => Some(Cue::Draw),
        };
        if outcome.is_terminal() {
            self.game_over = true;
            self.winning_line = find_winning_line(&self.board);
            self.score.record(outcome);
            info!(?outcome, score = ?self.score, "Game over");
        }

        Ok(Turn {
            cell,
            mark,
            outcome,
            winning_line: self.winning_line,
            cue,
        })
    }
}
