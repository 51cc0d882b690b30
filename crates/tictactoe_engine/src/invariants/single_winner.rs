//! A game stops at its first line, so two winners cannot coexist.

use super::Invariant;
use crate::rules::check_winner;
use crate::{GameSnapshot, Player};

/// Invariant: at most one player has a completed line.
pub struct SingleWinner;

impl Invariant<GameSnapshot> for SingleWinner {
    fn holds(state: &GameSnapshot) -> bool {
        !(check_winner(&state.board, Player::O) && check_winner(&state.board, Player::X))
    }

    fn description() -> &'static str {
        "Both players have a completed line"
    }
}
