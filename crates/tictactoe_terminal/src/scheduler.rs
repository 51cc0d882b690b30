//! Deferred, cancellable computer moves.
//!
//! The search runs on a blocking worker against an immutable snapshot. Its
//! answer comes back to the owning loop as an [`AppMessage::Computer`], and
//! the loop applies it through the same move path humans use. Every schedule
//! gets a new generation; answers from cancelled generations are dropped.

use crate::app::AppMessage;
use std::time::Duration;
use tictactoe_engine::{GameSnapshot, SearchResult, best_move};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tracing::{debug, error, instrument, warn};

/// Search answer for one scheduled computer turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledMove {
    /// Generation the move was scheduled under.
    pub generation: u64,
    /// The chosen move.
    pub result: SearchResult,
}

/// Owns at most one pending computer move.
#[derive(Debug)]
pub struct ComputerMoveScheduler {
    tx: UnboundedSender<AppMessage>,
    generation: u64,
    pending: Option<AbortHandle>,
}

impl ComputerMoveScheduler {
    /// Creates a scheduler delivering answers to `tx`.
    pub fn new(tx: UnboundedSender<AppMessage>) -> Self {
        Self {
            tx,
            generation: 0,
            pending: None,
        }
    }

    /// Schedules a search for the mark to move in `snapshot` after `delay`,
    /// replacing any pending one.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(self, snapshot), fields(to_move = %snapshot.to_move))]
    pub fn schedule(&mut self, snapshot: GameSnapshot, delay: Duration) {
        self.cancel();
        let generation = self.generation;
        let tx = self.tx.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mark = snapshot.to_move;
            let board = snapshot.board;
            match tokio::task::spawn_blocking(move || best_move(&board, mark)).await {
                Ok(Some(result)) => {
                    debug!(generation, position = %result.position, "Computer move ready");
                    if tx
                        .send(AppMessage::Computer(ScheduledMove { generation, result }))
                        .is_err()
                    {
                        debug!("App loop gone, dropping computer move");
                    }
                }
                Ok(None) => warn!(generation, "Scheduled search found no move"),
                Err(e) => error!(error = %e, "Search task failed"),
            }
        });

        debug!(generation, "Computer move scheduled");
        self.pending = Some(handle.abort_handle());
    }

    /// Cancels the pending move, if any. Its answer will be rejected even if
    /// the search already finished.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            debug!(generation = self.generation, "Cancelling computer move");
            handle.abort();
        }
        self.generation += 1;
    }

    /// Accepts an answer if it belongs to the pending generation.
    pub fn complete(&mut self, generation: u64) -> bool {
        if generation == self.generation && self.pending.is_some() {
            self.pending = None;
            true
        } else {
            debug!(generation, current = self.generation, "Stale computer move");
            false
        }
    }

    /// Checks whether a computer move is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe_engine::{Game, GameMode};
    use tokio::sync::mpsc;

    fn snapshot_after_human_center() -> GameSnapshot {
        let mut game = Game::new(GameMode::VsComputer);
        assert!(game.attempt_move(4));
        game.snapshot()
    }

    #[tokio::test]
    async fn test_delivers_move_for_current_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ComputerMoveScheduler::new(tx);

        scheduler.schedule(snapshot_after_human_center(), Duration::ZERO);
        assert!(scheduler.is_pending());

        let Some(AppMessage::Computer(scheduled)) = rx.recv().await else {
            panic!("expected a computer move");
        };
        assert_eq!(scheduled.result.index(), 0);
        assert!(scheduler.complete(scheduled.generation));
        assert!(!scheduler.is_pending());
        assert!(!scheduler.complete(scheduled.generation), "answers are accepted once");
    }

    #[tokio::test]
    async fn test_cancelled_move_is_rejected() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ComputerMoveScheduler::new(tx);

        scheduler.schedule(snapshot_after_human_center(), Duration::from_secs(60));
        scheduler.cancel();
        assert!(!scheduler.is_pending());

        scheduler.schedule(snapshot_after_human_center(), Duration::ZERO);
        let Some(AppMessage::Computer(scheduled)) = rx.recv().await else {
            panic!("expected a computer move");
        };
        assert!(scheduler.complete(scheduled.generation));
        assert!(rx.try_recv().is_err(), "the cancelled task never answers");
    }

    #[tokio::test]
    async fn test_stale_generation_is_rejected() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = ComputerMoveScheduler::new(tx);

        scheduler.schedule(snapshot_after_human_center(), Duration::ZERO);
        let Some(AppMessage::Computer(scheduled)) = rx.recv().await else {
            panic!("expected a computer move");
        };
        scheduler.cancel();
        assert!(!scheduler.complete(scheduled.generation));
    }
}
