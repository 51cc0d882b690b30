//! Tic-tac-toe engine with an exhaustive minimax opponent.
//!
//! # Architecture
//!
//! - **Game**: single owner of the board, turn order and terminal status
//! - **Rules**: pure win and draw detection shared by game and search
//! - **Search**: minimax over a private copy of the board
//! - **Events**: notifications for whatever renders the game
//! - **Invariants**: properties checked after every move in debug builds
//!
//! # Example
//!
//! ```
//! use tictactoe_engine::{Game, GameEvent, GameMode, GameStatus};
//!
//! let mut game = Game::with_sink(GameMode::VsComputer, Vec::<GameEvent>::new());
//! assert!(game.attempt_move(4));
//! assert!(game.is_computer_turn());
//!
//! let reply = game.play_computer_move().expect("game in progress");
//! assert_eq!(reply.index(), 0);
//! assert_eq!(game.status(), GameStatus::InProgress);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod events;
mod game;
pub mod invariants;
mod position;
pub mod rules;
pub mod search;
mod types;

pub use action::{Move, MoveError};
pub use events::{EventSink, GameEvent, NullSink, StatusMessage};
pub use game::{DEFAULT_COMPUTER_DELAY, Game, GameMode, GameSnapshot, GameStatus, ResumeError};
pub use position::Position;
pub use rules::WinningLine;
pub use search::{SearchResult, best_move};
pub use types::{Board, BoardParseError, Player, Square};
