//! Win detection logic for tic-tac-toe.

use crate::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};

/// Three positions that win the game when held by one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinningLine([Position; 3]);

impl WinningLine {
    /// The 8 lines in scan order: rows, columns, then diagonals.
    pub const ALL: [WinningLine; 8] = [
        // Rows
        WinningLine([Position::TopLeft, Position::TopCenter, Position::TopRight]),
        WinningLine([Position::MiddleLeft, Position::Center, Position::MiddleRight]),
        WinningLine([Position::BottomLeft, Position::BottomCenter, Position::BottomRight]),
        // Columns
        WinningLine([Position::TopLeft, Position::MiddleLeft, Position::BottomLeft]),
        WinningLine([Position::TopCenter, Position::Center, Position::BottomCenter]),
        WinningLine([Position::TopRight, Position::MiddleRight, Position::BottomRight]),
        // Diagonals
        WinningLine([Position::TopLeft, Position::Center, Position::BottomRight]),
        WinningLine([Position::TopRight, Position::Center, Position::BottomLeft]),
    ];

    /// Positions on this line.
    pub fn positions(&self) -> [Position; 3] {
        self.0
    }

    /// Board indices on this line.
    pub fn indices(&self) -> [usize; 3] {
        self.0.map(Position::to_index)
    }

    /// Checks whether `pos` lies on this line.
    pub fn contains(&self, pos: Position) -> bool {
        self.0.contains(&pos)
    }

    /// Checks whether `player` holds all three squares of this line.
    pub fn is_completed_by(&self, board: &Board, player: Player) -> bool {
        self.0
            .iter()
            .all(|pos| board.get(*pos) == Square::Occupied(player))
    }
}

/// Returns the first line (in [`WinningLine::ALL`] order) completed by `player`.
pub fn winning_line(board: &Board, player: Player) -> Option<WinningLine> {
    WinningLine::ALL
        .into_iter()
        .find(|line| line.is_completed_by(board, player))
}

/// Checks whether `player` has three in a row.
pub fn check_winner(board: &Board, player: Player) -> bool {
    winning_line(board, player).is_some()
}

/// Returns the player holding the first completed line, with that line.
pub fn winner(board: &Board) -> Option<(Player, WinningLine)> {
    for line in WinningLine::ALL {
        if let Some(player) = board.get(line.0[0]).player()
            && line.is_completed_by(board, player)
        {
            return Some((player, line));
        }
    }
    None
}
