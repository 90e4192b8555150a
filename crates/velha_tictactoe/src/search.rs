//! Exhaustive minimax search.
//!
//! Scores are from the maximizer's point of view. A win is worth
//! [`WIN_SCORE`] minus the depth at which it happens and a loss is worth
//! `-WIN_SCORE` plus that depth, so faster wins and slower losses rank
//! higher. The tree is at most nine plies deep and is searched in full.

use super::rules::{Outcome, evaluate};
use super::{Board, Mark, Position};
use tracing::{debug, instrument};

/// Score of a win found at depth zero.
pub const WIN_SCORE: i32 = 10;

/// Minimax searcher with a fixed maximizing mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Minimax {
    maximizer: Mark,
}

impl Minimax {
    /// Creates a searcher that maximizes for `maximizer`.
    pub fn new(maximizer: Mark) -> Self {
        Self { maximizer }
    }

    /// Returns the maximizing mark.
    pub fn maximizer(&self) -> Mark {
        self.maximizer
    }

    /// Scores `board` with `depth` plies already played below the root.
    ///
    /// `maximizing` tells whose turn it is on `board`.
    pub fn score(&self, board: &Board, depth: i32, maximizing: bool) -> i32 {
        match evaluate(board) {
            Outcome::Win { mark, .. } if mark == self.maximizer => return WIN_SCORE - depth,
            Outcome::Win { .. } => return -WIN_SCORE + depth,
            Outcome::Draw => return 0,
            Outcome::Ongoing => {}
        }

        let mark = if maximizing {
            self.maximizer
        } else {
            self.maximizer.opponent()
        };
        let scores = board
            .empty_positions()
            .map(|pos| self.score(&board.with_mark(pos, mark), depth + 1, !maximizing));

        // Ongoing boards always have an empty square.
        let best = if maximizing { scores.max() } else { scores.min() };
        best.unwrap_or(0)
    }

    /// Scores every empty square as the maximizer's next move.
    ///
    /// Each candidate is searched with the opponent to move, starting at
    /// depth zero. Results are in ascending position order.
    #[instrument(level = "debug", skip(self, board), fields(maximizer = %self.maximizer, board = %board.compact()))]
    pub fn move_scores(&self, board: &Board) -> Vec<(Position, i32)> {
        board
            .empty_positions()
            .map(|pos| {
                let next = board.with_mark(pos, self.maximizer);
                (pos, self.score(&next, 0, false))
            })
            .collect()
    }

    /// Returns the highest scoring move, or `None` on a full board.
    ///
    /// Ties go to the lowest position index.
    #[instrument(level = "debug", skip(self, board), fields(maximizer = %self.maximizer))]
    pub fn best_move(&self, board: &Board) -> Option<Position> {
        let mut best: Option<(Position, i32)> = None;
        for (pos, score) in self.move_scores(board) {
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((pos, score));
            }
        }
        debug!(?best, "Search complete");
        best.map(|(pos, _)| pos)
    }
}
