//! Notifications from the engine to whatever presents it.
//!
//! The engine never draws anything. After each state change it emits
//! [`GameEvent`]s into an [`EventSink`]; a terminal UI, a test harness or a
//! JSON logger can subscribe without the engine knowing which.

use crate::{Board, GameSnapshot, Player, WinningLine};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Human-facing status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMessage {
    /// The game is in progress and `player` moves next.
    Turn {
        /// Mark to move.
        player: Player,
        /// Turn-order number of that mark.
        number: u8,
    },
    /// `player` completed a line.
    Won {
        /// Winning mark.
        player: Player,
        /// Turn-order number of the winner.
        number: u8,
    },
    /// Board full without a line.
    Draw,
}

impl StatusMessage {
    /// Status announcing that `player` moves next.
    pub fn turn(player: Player) -> Self {
        Self::Turn {
            player,
            number: player.number(),
        }
    }

    /// Status announcing that `player` won.
    pub fn won(player: Player) -> Self {
        Self::Won {
            player,
            number: player.number(),
        }
    }
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusMessage::Turn { number, .. } => write!(f, "Player {}, make your move!", number),
            StatusMessage::Won { number, .. } => write!(f, "Player {} wins!", number),
            StatusMessage::Draw => write!(f, "It's a draw!"),
        }
    }
}

/// State change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    /// Board contents changed; render all nine squares.
    Redraw {
        /// Board after the change.
        board: Board,
    },
    /// Status text changed.
    Status(StatusMessage),
    /// The game was won along this line.
    Highlight(WinningLine),
    /// The computer is to move; apply its move after `delay_ms`.
    ComputerTurn {
        /// Cosmetic delay before the move, in milliseconds.
        delay_ms: u64,
        /// The position the computer must answer.
        snapshot: GameSnapshot,
    },
}

/// Receiver of engine notifications.
pub trait EventSink {
    /// Delivers one event.
    fn emit(&mut self, event: GameEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Records events in order, for tests and replays.
impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl EventSink for std::sync::mpsc::Sender<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        if self.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }
}
