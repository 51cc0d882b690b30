//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`](crate::Board). Both the game state and the
//! move search evaluate positions through these, so they never disagree about
//! what counts as a win or a draw.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{WinningLine, check_winner, winner, winning_line};
