//! The stored terminal flag agrees with what the board shows.

use super::Invariant;
use crate::GameSnapshot;

/// Invariant: the stored status equals the status derived from the board.
pub struct StatusMatchesBoard;

impl Invariant<GameSnapshot> for StatusMatchesBoard {
    fn holds(state: &GameSnapshot) -> bool {
        state.status == crate::GameStatus::of_board(&state.board)
    }

    fn description() -> &'static str {
        "Stored status disagrees with the board"
    }
}
