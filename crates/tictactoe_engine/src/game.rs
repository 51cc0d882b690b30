//! Game state: board, turn order, mode and terminal status.
//!
//! [`Game`] is the single owner of a board. It changes only through
//! [`Game::attempt_move`] (or its typed twin [`Game::try_move`]) and
//! [`Game::reset`], and reports every change to its [`EventSink`].

use crate::action::{Move, MoveError};
use crate::events::{EventSink, GameEvent, NullSink, StatusMessage};
use crate::invariants::{self, GameInvariants, InvariantSet};
use crate::rules::{self, WinningLine};
use crate::search::{self, SearchResult};
use crate::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Delay before the computer's move is applied, unless configured otherwise.
pub const DEFAULT_COMPUTER_DELAY: Duration = Duration::from_millis(500);

/// Who drives the second mark.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameMode {
    /// Two humans share the board.
    #[default]
    TwoPlayers,
    /// The second mark is played by the minimax search.
    #[serde(alias = "computer")]
    #[strum(to_string = "vs_computer", serialize = "computer")]
    VsComputer,
}

impl GameMode {
    /// The mark played by the computer in this mode.
    pub fn computer_player(self) -> Option<Player> {
        match self {
            GameMode::TwoPlayers => None,
            GameMode::VsComputer => Some(Player::FIRST.opponent()),
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            GameMode::TwoPlayers => GameMode::VsComputer,
            GameMode::VsComputer => GameMode::TwoPlayers,
        }
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won {
        /// Player who completed the line.
        winner: Player,
        /// The completed line.
        line: WinningLine,
    },
    /// Game ended in a draw.
    Draw,
}

impl GameStatus {
    /// Derives the status shown by a board on its own.
    pub fn of_board(board: &Board) -> Self {
        match rules::winner(board) {
            Some((winner, line)) => GameStatus::Won { winner, line },
            None if rules::is_full(board) => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }

    /// Checks whether the game has ended.
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Returns the winner, if any.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameStatus::Won { winner, .. } => Some(*winner),
            _ => None,
        }
    }

    /// Returns the winning line, if any.
    pub fn line(&self) -> Option<WinningLine> {
        match self {
            GameStatus::Won { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Immutable copy of a game, safe to hand to another thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Board contents.
    pub board: Board,
    /// Mark to move (the winner, once the game is won).
    pub to_move: Player,
    /// Game mode.
    pub mode: GameMode,
    /// Game status.
    pub status: GameStatus,
}

/// A board that cannot be resumed as a game.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ResumeError {
    /// The board breaks one or more game invariants.
    #[display("Inconsistent board: {}", _0)]
    Inconsistent(String),
}

impl std::error::Error for ResumeError {}

/// Tic-tac-toe game engine.
#[derive(Debug, Clone)]
pub struct Game<S = NullSink> {
    board: Board,
    to_move: Player,
    mode: GameMode,
    status: GameStatus,
    last_move: Option<Move>,
    computer_delay: Duration,
    sink: S,
}

impl Game {
    /// Creates a new game whose events are discarded.
    #[instrument]
    pub fn new(mode: GameMode) -> Self {
        Self::with_sink(mode, NullSink)
    }
}

impl<S: EventSink> Game<S> {
    /// Creates a new game reporting to `sink`.
    ///
    /// The initial reset is reported like any other.
    #[instrument(skip(sink))]
    pub fn with_sink(mode: GameMode, sink: S) -> Self {
        let mut game = Self {
            board: Board::new(),
            to_move: Player::FIRST,
            mode,
            status: GameStatus::InProgress,
            last_move: None,
            computer_delay: DEFAULT_COMPUTER_DELAY,
            sink,
        };
        game.reset(mode);
        game
    }

    /// Resumes a game from an arbitrary board.
    ///
    /// The first player moves on equal counts, the second player when the
    /// first is one ahead; a won board keeps the winner as the mark to move.
    /// The current state is reported to `sink` as after a move.
    ///
    /// # Errors
    ///
    /// Returns [`ResumeError::Inconsistent`] for boards no game can reach:
    /// counts that do not follow alternating turns from the first player,
    /// two winners, or a mark placed after a line was completed.
    #[instrument(skip(sink), fields(board = %board))]
    pub fn from_position(mode: GameMode, board: Board, sink: S) -> Result<Self, ResumeError> {
        let status = GameStatus::of_board(&board);
        let o = board.count(Player::O);
        let x = board.count(Player::X);
        let to_move = match status.winner() {
            Some(winner) => winner,
            None if o == x => Player::FIRST,
            None => Player::FIRST.opponent(),
        };

        let snapshot = GameSnapshot {
            board,
            to_move,
            mode,
            status,
        };
        GameInvariants::check_all(&snapshot).map_err(|violations| {
            warn!(?violations, "Rejected board");
            ResumeError::Inconsistent(invariants::describe(&violations))
        })?;

        let mut game = Self {
            board: snapshot.board,
            to_move,
            mode,
            status,
            last_move: None,
            computer_delay: DEFAULT_COMPUTER_DELAY,
            sink,
        };
        info!(status = ?game.status, to_move = %game.to_move, "Game resumed");
        game.notify_changed();
        Ok(game)
    }

    /// Sets the delay announced with [`GameEvent::ComputerTurn`].
    pub fn with_computer_delay(mut self, delay: Duration) -> Self {
        self.computer_delay = delay;
        self
    }

    /// Clears the board, gives the turn to the first player and stores `mode`.
    #[instrument(skip(self))]
    pub fn reset(&mut self, mode: GameMode) {
        self.board = Board::new();
        self.to_move = Player::FIRST;
        self.status = GameStatus::InProgress;
        self.last_move = None;
        self.mode = mode;
        info!("Game reset");

        self.notify_changed();
    }

    /// Places the current player's mark at `index` (0-8).
    ///
    /// Returns `false` without changing anything or emitting events if the
    /// game is over, the index is off the board, or the square is taken.
    pub fn attempt_move(&mut self, index: usize) -> bool {
        self.try_move(index).is_ok()
    }

    /// Places the current player's mark at `index` (0-8).
    ///
    /// # Errors
    ///
    /// Returns the reason the move was rejected; a rejected move leaves the
    /// game untouched and emits nothing.
    #[instrument(skip(self), fields(player = %self.to_move))]
    pub fn try_move(&mut self, index: usize) -> Result<GameStatus, MoveError> {
        if self.status.is_over() {
            debug!("Move rejected: game over");
            return Err(MoveError::GameOver);
        }
        let position = Position::from_index(index).ok_or(MoveError::OutOfRange(index))?;
        if !self.board.is_empty(position) {
            debug!(%position, "Move rejected: square occupied");
            return Err(MoveError::SquareOccupied(position));
        }

        let mark = self.to_move;
        self.board.set(position, Square::Occupied(mark));
        self.last_move = Some(Move::new(mark, position));
        self.evaluate_terminal(mark);
        if !self.status.is_over() {
            self.to_move = mark.opponent();
        }
        debug!(%position, status = ?self.status, "Move applied");
        self.check_invariants();

        self.notify_changed();
        Ok(self.status)
    }

    /// Places the current player's mark at `position`.
    ///
    /// # Errors
    ///
    /// Same as [`Game::try_move`].
    pub fn place(&mut self, position: Position) -> Result<GameStatus, MoveError> {
        self.try_move(position.to_index())
    }

    /// Searches for the best move of the player to move and applies it.
    ///
    /// Returns `None` and does nothing once the game is over.
    #[instrument(skip(self), fields(player = %self.to_move))]
    pub fn play_computer_move(&mut self) -> Option<SearchResult> {
        if self.status.is_over() {
            debug!("No computer move: game over");
            return None;
        }

        let result = search::best_move(&self.board, self.to_move);
        debug_assert!(result.is_some(), "in-progress game must have a legal move");
        let result = result?;

        let accepted = self.attempt_move(result.index());
        debug_assert!(accepted, "search chose an illegal square");
        info!(position = %result.position, score = result.score, "Computer moved");
        Some(result)
    }

    fn evaluate_terminal(&mut self, mark: Player) {
        self.status = match rules::winning_line(&self.board, mark) {
            Some(line) => GameStatus::Won { winner: mark, line },
            None if rules::is_full(&self.board) => GameStatus::Draw,
            None => GameStatus::InProgress,
        };
        if let GameStatus::Won { line, .. } = self.status {
            info!(winner = %mark, line = ?line.indices(), "Game won");
        } else if self.status == GameStatus::Draw {
            info!("Game drawn");
        }
    }

    /// Reports the current state: redraw, highlight, status, then the
    /// computer's turn if it is due.
    fn notify_changed(&mut self) {
        self.sink.emit(GameEvent::Redraw {
            board: self.board.clone(),
        });

        match self.status {
            GameStatus::Won { winner, line } => {
                self.sink.emit(GameEvent::Highlight(line));
                self.sink.emit(GameEvent::Status(StatusMessage::won(winner)));
            }
            GameStatus::Draw => self.sink.emit(GameEvent::Status(StatusMessage::Draw)),
            GameStatus::InProgress => {
                self.sink
                    .emit(GameEvent::Status(StatusMessage::turn(self.to_move)));
                if self.is_computer_turn() {
                    let delay_ms = u64::try_from(self.computer_delay.as_millis()).unwrap_or(u64::MAX);
                    debug!(delay_ms, "Computer to move");
                    let snapshot = self.snapshot();
                    self.sink.emit(GameEvent::ComputerTurn { delay_ms, snapshot });
                }
            }
        }
    }

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        if let Err(violations) = GameInvariants::check_all(&self.snapshot()) {
            panic!("Invariant violation: {}", invariants::describe(&violations));
        }
    }

    #[cfg(not(debug_assertions))]
    fn check_invariants(&self) {}
}

impl<S> Game<S> {
    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark to move (the winner, once the game is won).
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Checks whether the game has ended.
    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// Returns the winner, if any.
    pub fn winner(&self) -> Option<Player> {
        self.status.winner()
    }

    /// Returns the winning line, if any.
    pub fn winning_line(&self) -> Option<WinningLine> {
        self.status.line()
    }

    /// Returns the last accepted move since the last reset.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Returns the delay announced before computer moves.
    pub fn computer_delay(&self) -> Duration {
        self.computer_delay
    }

    /// Checks whether the search should play the next move.
    pub fn is_computer_turn(&self) -> bool {
        !self.status.is_over() && self.mode.computer_player() == Some(self.to_move)
    }

    /// Returns an immutable copy of the game state.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            to_move: self.to_move,
            mode: self.mode,
            status: self.status,
        }
    }

    /// Returns the event sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the event sink mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the game, returning its event sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameMode::default())
    }
}
