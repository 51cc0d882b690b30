//! Play stops at the first line, so the winner's mark is the last one placed.

use super::Invariant;
use crate::rules::check_winner;
use crate::{GameSnapshot, Player};

/// Invariant: an O line needs O one mark ahead, an X line needs level counts.
pub struct WinnerMovedLast;

impl Invariant<GameSnapshot> for WinnerMovedLast {
    fn holds(state: &GameSnapshot) -> bool {
        let o = state.board.count(Player::O);
        let x = state.board.count(Player::X);
        let o_ok = !check_winner(&state.board, Player::O) || o == x + 1;
        let x_ok = !check_winner(&state.board, Player::X) || o == x;
        o_ok && x_ok
    }

    fn description() -> &'static str {
        "A mark was placed after the game was won"
    }
}
