//! Headless self-play writing engine events as JSON lines.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use tictactoe_engine::{Board, EventSink, Game, GameEvent, GameMode, GameStatus};
use tracing::{info, instrument, warn};

/// Writes each event as one JSON object per line.
///
/// [`EventSink::emit`] cannot fail, so the first write error is kept and
/// reported by [`JsonLinesSink::finish`].
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    error: Option<std::io::Error>,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer, error: None }
    }

    fn write_line(&mut self, value: &impl Serialize) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, value)?;
        self.writer.write_all(b"\n")
    }

    /// Returns the writer, or the first error hit while writing.
    pub fn finish(mut self) -> std::io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: GameEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_line(&event) {
            warn!(error = %e, "Failed to write event");
            self.error = Some(e);
        }
    }
}

/// Last line of a self-play run.
#[derive(Debug, Clone, Serialize)]
struct Summary {
    status: GameStatus,
    board: String,
    moves: Vec<usize>,
}

/// Plays the search against itself from `board` (empty if `None`) and
/// writes every event, then a summary line, to `writer`.
#[instrument(skip(writer))]
pub fn run_selfplay<W: Write>(board: Option<Board>, writer: W) -> Result<W> {
    let board = board.unwrap_or_default();
    let mut game = Game::from_position(GameMode::TwoPlayers, board, JsonLinesSink::new(writer))
        .context("Invalid starting board")?;

    let mut moves = Vec::new();
    while let Some(result) = game.play_computer_move() {
        moves.push(result.index());
    }

    let summary = Summary {
        status: game.status(),
        board: game.board().to_string(),
        moves,
    };
    info!(status = ?summary.status, moves = summary.moves.len(), "Self-play finished");

    let mut sink = game.into_sink();
    sink.write_line(&serde_json::json!({ "summary": summary }))
        .context("Failed to write summary")?;
    sink.finish().context("Failed to write events")
}
