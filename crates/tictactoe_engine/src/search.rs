//! Exhaustive minimax search.
//!
//! Every empty square is explored at every depth; the only pruning is the
//! terminal check at the top of each node. From an empty board that is fewer
//! than 9! leaves, which is cheap enough that no alpha-beta cut is used.
//!
//! Candidates are tried in ascending index order and only a strictly better
//! score replaces the current best, so ties resolve to the lowest index and a
//! given board always produces the same move.

use crate::rules::{check_winner, is_full};
use crate::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Game-theoretic value of a position from the maximizer's point of view.
pub type Score = i32;

/// The maximizer has a completed line.
pub const WIN_SCORE: Score = 10;
/// Board full with no line.
pub const DRAW_SCORE: Score = 0;
/// The maximizer's opponent has a completed line.
pub const LOSS_SCORE: Score = -10;

/// Optimal move and the value it guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResult {
    /// Square to play.
    pub position: Position,
    /// Value of the position after playing it, assuming perfect play.
    pub score: Score,
}

impl SearchResult {
    /// Board index of the chosen square.
    pub fn index(&self) -> usize {
        self.position.to_index()
    }
}

/// Finds the optimal move for `maximizer`, who is also the player to move.
///
/// Returns `None` if the board is already decided (a completed line or no
/// empty square).
pub fn best_move(board: &Board, maximizer: Player) -> Option<SearchResult> {
    search(board, maximizer, maximizer)
}

/// Finds the optimal move for `to_move`, scoring positions for `maximizer`.
///
/// When `to_move` is the maximizer the highest-scoring square is chosen,
/// otherwise the lowest. The caller's board is left untouched.
#[instrument(skip(board), fields(board = %board))]
pub fn search(board: &Board, to_move: Player, maximizer: Player) -> Option<SearchResult> {
    if terminal_score(board, maximizer).is_some() {
        debug!("Board already decided, nothing to search");
        return None;
    }

    let mut scratch = board.clone();
    let mut nodes = 0u64;
    let (best, score) = minimax(&mut scratch, to_move, maximizer, &mut nodes);
    debug_assert_eq!(&scratch, board, "search must restore its scratch board");

    let position = best?;
    debug!(nodes, position = %position, score, "Search complete");
    Some(SearchResult { position, score })
}

/// Base cases, checked in this order: opponent line, maximizer line, full board.
fn terminal_score(board: &Board, maximizer: Player) -> Option<Score> {
    if check_winner(board, maximizer.opponent()) {
        Some(LOSS_SCORE)
    } else if check_winner(board, maximizer) {
        Some(WIN_SCORE)
    } else if is_full(board) {
        Some(DRAW_SCORE)
    } else {
        None
    }
}

fn minimax(
    board: &mut Board,
    to_move: Player,
    maximizer: Player,
    nodes: &mut u64,
) -> (Option<Position>, Score) {
    *nodes += 1;
    if let Some(score) = terminal_score(board, maximizer) {
        return (None, score);
    }

    let maximizing = to_move == maximizer;
    let mut best: Option<(Position, Score)> = None;

    for position in Position::ALL {
        if !board.is_empty(position) {
            continue;
        }

        board.set(position, Square::Occupied(to_move));
        let (_, score) = minimax(board, to_move.opponent(), maximizer, nodes);
        board.set(position, Square::Empty);

        let improves = match best {
            None => true,
            Some((_, best_score)) if maximizing => score > best_score,
            Some((_, best_score)) => score < best_score,
        };
        if improves {
            best = Some((position, score));
        }
    }

    match best {
        Some((position, score)) => (Some(position), score),
        // Unreachable: a non-full board always has a candidate.
        None => (None, DRAW_SCORE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takes_immediate_win() {
        let board: Board = "XX. OO. ...".parse().unwrap();
        let result = best_move(&board, Player::X).unwrap();
        assert_eq!(result.index(), 2);
        assert_eq!(result.score, WIN_SCORE);
    }

    #[test]
    fn test_blocks_threat() {
        // O to move, X threatens the left column.
        let board: Board = "X.. X.. .O.".parse().unwrap();
        let result = best_move(&board, Player::O).unwrap();
        assert_eq!(result.position, Position::BottomLeft);
    }

    #[test]
    fn test_decided_board_has_no_move() {
        let won: Board = "XXX OO. ...".parse().unwrap();
        assert_eq!(best_move(&won, Player::O), None);

        let full: Board = "XOX XOO OXX".parse().unwrap();
        assert_eq!(best_move(&full, Player::X), None);
    }

    #[test]
    fn test_minimizing_side_picks_lowest_score() {
        // X to move but O is the maximizer: X picks its own winning square.
        let board: Board = "XX. OO. ...".parse().unwrap();
        let result = search(&board, Player::X, Player::O).unwrap();
        assert_eq!(result.index(), 2);
        assert_eq!(result.score, LOSS_SCORE);
    }

    #[test]
    fn test_avoids_square_that_hands_over_a_line() {
        // X at 8 lets O complete the middle column at 7.
        let board: Board = "XOX XOO O..".parse().unwrap();
        let result = best_move(&board, Player::X).unwrap();
        assert_eq!(result.index(), 7);
        assert_eq!(result.score, DRAW_SCORE);
    }

    #[test]
    fn test_ties_resolve_to_lowest_index() {
        // Every opening move draws under perfect play.
        let result = best_move(&Board::new(), Player::X).unwrap();
        assert_eq!(result.position, Position::TopLeft);
        assert_eq!(result.score, DRAW_SCORE);
    }
}
