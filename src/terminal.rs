//! Line-oriented terminal game.
//!
//! Reads commands from any `BufRead` and writes the board to any `Write`,
//! so the loop runs the same on a real terminal and in tests.

use crate::session::{GameSession, Scoreboard, SessionError, Turn};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::{debug, info, instrument, warn};
use unbeatable_core::{Board, GameOutcome};

/// A parsed line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Play a cell (0-based).
    Play(usize),
    Restart,
    Score,
    Quit,
}

impl Command {
    /// Cells are typed 1-9, matching the numbers drawn on empty cells.
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "r" | "restart" => Some(Command::Restart),
            "s" | "score" => Some(Command::Score),
            "q" | "quit" | "exit" => Some(Command::Quit),
            other => match other.parse::<usize>() {
                Ok(n @ 1..=9) => Some(Command::Play(n - 1)),
                _ => None,
            },
        }
    }
}

/// Runs the game until `q` or end of input.
#[instrument(skip_all)]
pub fn run<R: BufRead, W: Write>(
    session: &mut GameSession,
    input: R,
    mut output: W,
) -> Result<()> {
    info!("Starting terminal game");
    writeln!(
        output,
        "You are X. Enter 1-9 to play, r to restart, s for the score, q to quit."
    )?;
    print_board(&mut output, session.board())?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        debug!(%line, "Input received");

        match Command::parse(&line) {
            Some(Command::Quit) => break,
            Some(Command::Score) => print_score(&mut output, session.score())?,
            Some(Command::Restart) => {
                session.reset();
                writeln!(output, "New game.")?;
                print_board(&mut output, session.board())?;
            }
            Some(Command::Play(cell)) => play(session, cell, &mut output)?,
            None if line.trim().is_empty() => {}
            None => {
                warn!(%line, "Unrecognised input");
                writeln!(output, "Unrecognised input {:?}.", line.trim())?;
            }
        }
        output.flush()?;
    }

    info!(score = ?session.score(), "Terminal game finished");
    print_score(&mut output, session.score())?;
    Ok(())
}

fn play<W: Write>(session: &mut GameSession, cell: usize, output: &mut W) -> Result<()> {
    match session.play_turn(cell) {
        Ok((human, computer)) => {
            if let Some(computer) = &computer {
                writeln!(output, "Computer plays {}.", computer.cell() + 1)?;
            }
            print_board(output, session.board())?;
            let last = computer.as_ref().unwrap_or(&human);
            if last.outcome().is_terminal() {
                print_result(output, last)?;
                print_score(output, session.score())?;
                writeln!(output, "Press r to play again.")?;
            }
        }
        Err(SessionError::GameOver) => {
            writeln!(output, "The game is over. Press r to play again.")?;
        }
        Err(err) => writeln!(output, "{}.", err)?,
    }
    Ok(())
}

fn print_board<W: Write>(output: &mut W, board: &Board) -> Result<()> {
    writeln!(output, "\n{}\n", board.display())?;
    Ok(())
}

fn print_result<W: Write>(output: &mut W, turn: &Turn) -> Result<()> {
    match turn.outcome() {
        GameOutcome::Win(mark) => {
            let line = turn
                .winning_line()
                .map(|l| l.map(|i| (i + 1).to_string()).join("-"))
                .unwrap_or_default();
            writeln!(output, "{} wins ({})!", mark, line)?;
        }
        GameOutcome::Draw => writeln!(output, "Draw!")?,
        GameOutcome::Ongoing => {}
    }
    Ok(())
}

fn print_score<W: Write>(output: &mut W, score: &Scoreboard) -> Result<()> {
    writeln!(
        output,
        "Score: X {} | O {} | Draws {}",
        score.x_wins(),
        score.o_wins(),
        score.draws()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(input: &str) -> (GameSession, String) {
        let mut session = GameSession::new();
        let mut output = Vec::new();
        run(&mut session, input.as_bytes(), &mut output).unwrap();
        (session, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("5"), Some(Command::Play(4)));
        assert_eq!(Command::parse(" 1 "), Some(Command::Play(0)));
        assert_eq!(Command::parse("R"), Some(Command::Restart));
        assert_eq!(Command::parse("score"), Some(Command::Score));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("0"), None);
        assert_eq!(Command::parse("10"), None);
        assert_eq!(Command::parse("x"), None);
    }

    #[test]
    fn test_computer_replies() {
        let (session, out) = transcript("5\nq\n");
        assert!(out.contains("Computer plays 1."));
        assert_eq!(session.board().to_compact(), "O...X....");
    }

    #[test]
    fn test_computer_win_is_reported() {
        let (session, out) = transcript("5\n9\n7\n");
        assert!(out.contains("O wins (1-2-3)!"), "{}", out);
        assert!(out.contains("Score: X 0 | O 1 | Draws 0"));
        assert!(session.is_over());
    }

    #[test]
    fn test_moves_after_game_over_are_refused() {
        let (_, out) = transcript("5\n9\n7\n4\n");
        assert!(out.contains("The game is over."));
    }

    #[test]
    fn test_restart_keeps_score() {
        let (session, out) = transcript("5\n9\n7\nr\n5\n");
        assert!(out.contains("New game."));
        assert_eq!(*session.score().o_wins(), 1);
        assert_eq!(session.board().to_compact(), "O...X....");
    }

    #[test]
    fn test_occupied_cell_is_reported() {
        let (_, out) = transcript("5\n5\n");
        assert!(out.contains("Invalid move: cell 4 is already occupied."), "{}", out);
    }

    #[test]
    fn test_draw() {
        let (session, out) = transcript("5\n2\n7\n6\n9\n");
        assert!(out.contains("Draw!"), "{}", out);
        assert_eq!(*session.score().draws(), 1);
    }

    #[test]
    fn test_garbage_input() {
        let (_, out) = transcript("hello\n\n");
        assert!(out.contains("Unrecognised input \"hello\"."));
    }
}
