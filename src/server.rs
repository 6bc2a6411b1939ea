//! JSON API for a browser front end.
//!
//! One shared session per server. The computer's search runs on the
//! blocking pool; while it runs the session refuses human moves, so the
//! page can keep rendering and simply disable input until the reply.
//!
//! Replies are applied by a detached task. A client that hangs up
//! mid-search still gets its move answered, and a reply that outlives a
//! restart is discarded by the session.

use crate::config::ServerConfig;
use crate::session::{COMPUTER, Cue, GameSession, PendingReply, Scoreboard, SessionError};
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use unbeatable_core::{
    Board, CELL_COUNT, CoreError, GameOutcome, Mark, Move, WinLine, analyze, classify,
};

/// Shared server state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    session: Arc<Mutex<GameSession>>,
}

impl AppState {
    /// Creates state around a fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates state around an existing session.
    pub fn with_session(session: GameSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}

/// Request body for `POST /api/move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Cell index (0-8, where 0=top-left, 8=bottom-right).
    pub cell: usize,
}

/// Request body for `POST /api/solve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Nine row-major cells, `X`, `O` or `.` for empty.
    pub board: String,
    /// Side to move, `X` or `O`. Defaults to `O`.
    #[serde(default)]
    pub mark: Option<String>,
}

/// Snapshot of the session returned by every game route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResponse {
    /// Cell contents, `null` for empty.
    pub cells: [Option<Mark>; CELL_COUNT],
    /// Current classification.
    pub outcome: GameOutcome,
    /// The line to highlight after a win.
    pub winning_line: Option<WinLine>,
    /// Running score.
    pub score: Scoreboard,
    /// True while the computer is choosing its reply.
    pub awaiting_computer: bool,
    /// The computer's reply to this request's move, if it made one.
    pub computer_cell: Option<usize>,
    /// Sound to play if this request ended the game.
    pub cue: Option<Cue>,
}

impl StateResponse {
    fn from_session(session: &GameSession) -> Self {
        Self {
            cells: session.board().cells(),
            outcome: session.outcome(),
            winning_line: session.winning_line(),
            score: *session.score(),
            awaiting_computer: session.is_awaiting_computer(),
            computer_cell: None,
            cue: None,
        }
    }
}

/// Response body for `POST /api/solve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    /// The chosen move and its score.
    pub best: Move,
    /// Classification of the submitted board.
    pub outcome: GameOutcome,
    /// Positions the search visited.
    pub nodes: u64,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub error: String,
}

/// Errors surfaced by the routes.
#[derive(Debug)]
pub enum ApiError {
    /// The session refused the request.
    Session(SessionError),
    /// Bad input to a stateless route.
    Core(CoreError),
    /// The search task died.
    Internal(String),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::Session(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Session(err @ (SessionError::GameOver
            | SessionError::AwaitingComputer
            | SessionError::NotComputersTurn
            | SessionError::StaleReply)) => (StatusCode::CONFLICT, err.to_string()),
            ApiError::Session(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Core(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Internal(message) => {
                error!(%message, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/move", post(make_move))
        .route("/api/restart", post(restart))
        .route("/api/solve", post(solve))
        .with_state(state)
}

/// Binds the configured address and serves until the process stops.
#[instrument(skip_all, fields(host = %config.host(), port = config.port()))]
pub async fn serve(config: &ServerConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port()))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host(), config.port()))?;
    info!(
        "Server ready at http://{}/",
        listener.local_addr().context("Listener has no local address")?
    );

    axum::serve(listener, router(AppState::new()))
        .await
        .context("Server exited with an error")?;
    Ok(())
}

#[instrument(skip_all)]
async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let session = state.session.lock().await;
    Json(StateResponse::from_session(&session))
}

#[instrument(skip(state))]
async fn make_move(
    State(state): State<AppState>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<StateResponse>, ApiError> {
    // Apply the human move and take a snapshot under the lock, then release
    // it for the search so state requests keep answering.
    let (pending, human_cue) = {
        let mut session = state.session.lock().await;
        let turn = session.human_move(req.cell)?;
        (session.pending_search(), *turn.cue())
    };

    let Some(pending) = pending else {
        let session = state.session.lock().await;
        let mut response = StateResponse::from_session(&session);
        response.cue = human_cue;
        return Ok(Json(response));
    };

    // Dropping this handle detaches the task; it does not cancel it.
    let reply = tokio::spawn(reply_to(state.clone(), pending));
    let response = reply
        .await
        .map_err(|e| ApiError::Internal(format!("Reply task failed: {}", e)))??;
    info!(human = req.cell, computer = ?response.computer_cell, "Turn played");
    Ok(Json(response))
}

/// Searches for the computer's answer to `pending` and applies it.
#[instrument(skip_all, fields(token = pending.token()))]
async fn reply_to(state: AppState, pending: PendingReply) -> Result<StateResponse, ApiError> {
    let board = pending.board().clone();
    let searched = tokio::task::spawn_blocking(move || analyze(&board, COMPUTER)).await;

    let mut session = state.session.lock().await;
    let report = match searched {
        Ok(report) => report,
        Err(e) => {
            give_up(&mut session, &pending);
            return Err(ApiError::Internal(format!("Search task failed: {}", e)));
        }
    };
    debug!(nodes = report.nodes(), "Computer search finished");

    let Some(reply) = report.best().index() else {
        give_up(&mut session, &pending);
        return Err(ApiError::Internal("Search returned no move".to_string()));
    };

    let turn = session.computer_move(&pending, reply)?;
    let mut response = StateResponse::from_session(&session);
    response.computer_cell = Some(reply);
    response.cue = *turn.cue();
    Ok(response)
}

fn give_up(session: &mut GameSession, pending: &PendingReply) {
    if let Err(err) = session.abandon_reply(pending) {
        debug!(%err, "No reply left to abandon");
    }
}

#[instrument(skip_all)]
async fn restart(State(state): State<AppState>) -> Json<StateResponse> {
    let mut session = state.session.lock().await;
    session.reset();
    Json(StateResponse::from_session(&session))
}

#[instrument(skip_all, fields(board = %req.board))]
async fn solve(Json(req): Json<SolveRequest>) -> Result<Json<SolveResponse>, ApiError> {
    let board: Board = req.board.parse()?;
    let mark = match req.mark.as_deref() {
        Some(symbol) => symbol.parse::<Mark>()?,
        None => COMPUTER,
    };

    let outcome = classify(&board);
    let report = tokio::task::spawn_blocking(move || analyze(&board, mark))
        .await
        .map_err(|e| ApiError::Internal(format!("Search task failed: {}", e)))?;
    if report.best().index().is_none() {
        warn!(?outcome, "Solve requested on a finished board");
    }

    Ok(Json(SolveResponse {
        best: *report.best(),
        outcome,
        nodes: *report.nodes(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::HUMAN;

    #[tokio::test]
    async fn test_reply_after_restart_is_discarded() {
        let mut session = GameSession::new();
        session.human_move(4).unwrap();
        let pending = session.pending_search().unwrap();
        let state = AppState::with_session(session);

        state.session.lock().await.reset();

        let err = reply_to(state.clone(), pending).await.unwrap_err();
        assert!(matches!(err, ApiError::Session(SessionError::StaleReply)));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

        let session = state.session.lock().await;
        assert_eq!(session.board(), &Board::new());
        assert!(!session.is_awaiting_computer());
    }

    #[tokio::test]
    async fn test_reply_lands_on_the_position_it_was_searched_for() {
        let mut session = GameSession::new();
        session.human_move(4).unwrap();
        let pending = session.pending_search().unwrap();
        let state = AppState::with_session(session);

        // Restart and play a different opening while the old search runs.
        {
            let mut session = state.session.lock().await;
            session.reset();
            session.human_move(8).unwrap();
        }
        let fresh = state.session.lock().await.pending_search().unwrap();

        assert!(reply_to(state.clone(), pending).await.is_err());
        let response = reply_to(state.clone(), fresh).await.unwrap();
        assert_eq!(response.computer_cell, Some(4));
        assert_eq!(response.cells[8], Some(HUMAN));
        assert_eq!(response.cells[4], Some(COMPUTER));
        assert_eq!(response.cells[0], None);
        assert!(!response.awaiting_computer);
    }
}
