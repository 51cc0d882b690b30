//! O opens and players alternate, so O is never behind and never two ahead.

use super::Invariant;
use crate::{GameSnapshot, Player};

/// Invariant: O has as many marks as X, or exactly one more.
pub struct MarkBalance;

impl Invariant<GameSnapshot> for MarkBalance {
    fn holds(state: &GameSnapshot) -> bool {
        let o = state.board.count(Player::O);
        let x = state.board.count(Player::X);
        o == x || o == x + 1
    }

    fn description() -> &'static str {
        "Mark counts do not match alternating turns from O"
    }
}
