//! Application state and logic.
//!
//! The [`App`] owns the one [`Game`] and is the only code that mutates it.
//! What the screen shows ([`BoardView`]) is rebuilt purely from the engine's
//! events, so the renderer never reads the game directly.

use crate::config::TerminalConfig;
use crate::input::move_cursor;
use crate::scheduler::{ComputerMoveScheduler, ScheduledMove};
use crossterm::event::KeyCode;
use std::time::Duration;
use tictactoe_engine::{Board, EventSink, Game, GameEvent, GameMode, Position, WinningLine};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument};

/// Messages processed by the owning loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    /// Notification from the engine.
    Engine(GameEvent),
    /// Search answer for a scheduled computer turn.
    Computer(ScheduledMove),
}

/// Forwards engine events onto the app channel.
#[derive(Debug, Clone)]
pub struct ChannelSink(UnboundedSender<AppMessage>);

impl EventSink for ChannelSink {
    fn emit(&mut self, event: GameEvent) {
        if self.0.send(AppMessage::Engine(event)).is_err() {
            debug!("App loop gone, dropping engine event");
        }
    }
}

/// Everything the renderer needs, built from engine events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardView {
    /// Board as last redrawn.
    pub board: Board,
    /// Status line.
    pub status: String,
    /// Winning line to highlight.
    pub highlight: Option<WinningLine>,
    /// A computer move is pending.
    pub thinking: bool,
    /// Why the last key press did nothing, if it did nothing.
    pub notice: Option<String>,
}

/// Main application state.
pub struct App {
    game: Game<ChannelSink>,
    view: BoardView,
    cursor: Position,
    scheduler: ComputerMoveScheduler,
    should_quit: bool,
}

impl App {
    /// Creates the application and its first game.
    ///
    /// The game's initial events are queued on `tx`; feed them back through
    /// [`App::handle_message`].
    #[instrument(skip(tx))]
    pub fn new(config: &TerminalConfig, tx: UnboundedSender<AppMessage>) -> Self {
        let game = Game::with_sink(*config.mode(), ChannelSink(tx.clone()))
            .with_computer_delay(config.computer_delay());
        Self {
            game,
            view: BoardView::default(),
            cursor: Position::Center,
            scheduler: ComputerMoveScheduler::new(tx),
            should_quit: false,
        }
    }

    /// Gets the view to render.
    pub fn view(&self) -> &BoardView {
        &self.view
    }

    /// Gets the keyboard cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Gets the current game mode.
    pub fn mode(&self) -> GameMode {
        self.game.mode()
    }

    /// Checks whether the user asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handles a message from the engine or the scheduler.
    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::Engine(event) => self.apply_event(event),
            AppMessage::Computer(scheduled) => self.apply_computer_move(scheduled),
        }
    }

    fn apply_event(&mut self, event: GameEvent) {
        debug!(?event, "Handling game event");
        match event {
            GameEvent::Redraw { board } => {
                self.view.board = board;
                self.view.highlight = None;
            }
            GameEvent::Status(status) => self.view.status = status.to_string(),
            GameEvent::Highlight(line) => self.view.highlight = Some(line),
            GameEvent::ComputerTurn { delay_ms, snapshot } => {
                if snapshot != self.game.snapshot() {
                    debug!("Game moved on since the computer turn was requested");
                    return;
                }
                self.view.thinking = true;
                self.scheduler
                    .schedule(snapshot, Duration::from_millis(delay_ms));
            }
        }
    }

    fn apply_computer_move(&mut self, scheduled: ScheduledMove) {
        if !self.scheduler.complete(scheduled.generation) {
            return;
        }
        self.view.thinking = false;

        if !self.game.is_computer_turn() {
            debug!("Computer move arrived off turn, ignoring");
            return;
        }
        let position = scheduled.result.position;
        info!(%position, score = scheduled.result.score, "Applying computer move");
        if let Err(e) = self.game.place(position) {
            debug!(error = %e, "Computer move rejected");
        }
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyCode) {
        self.view.notice = None;
        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                info!("Quit requested");
                self.should_quit = true;
            }
            KeyCode::Char('r') => self.restart(self.game.mode()),
            KeyCode::Char('m') => self.restart(self.game.mode().toggled()),
            KeyCode::Enter | KeyCode::Char(' ') => self.human_move(self.cursor),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(position) = Position::from_index(index) {
                    self.cursor = position;
                    self.human_move(position);
                }
            }
            other => self.cursor = move_cursor(self.cursor, other),
        }
    }

    /// Cancels any pending computer move and starts a new game in `mode`.
    #[instrument(skip(self))]
    pub fn restart(&mut self, mode: GameMode) {
        if self.scheduler.is_pending() {
            info!("Discarding pending computer move");
        }
        self.scheduler.cancel();
        self.view.thinking = false;
        self.game.reset(mode);
    }

    fn human_move(&mut self, position: Position) {
        if self.game.is_computer_turn() {
            debug!(%position, "Ignoring input during computer turn");
            self.view.notice = Some("Wait for the computer's move".to_string());
            return;
        }
        if let Err(e) = self.game.place(position) {
            debug!(error = %e, "Move rejected");
            self.view.notice = Some(e.to_string());
        }
    }
}
