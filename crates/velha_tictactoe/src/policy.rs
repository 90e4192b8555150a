//! Computer opponent.
//!
//! Moves are picked in three stages, each one gated by difficulty:
//!
//! 1. Easy plays a uniformly random empty square most of the time.
//! 2. A one-ply scan takes an immediate win, or else blocks the
//!    opponent's immediate win.
//! 3. Full minimax search. Medium sometimes skips a candidate scored as
//!    an immediate win, simulating a missed opportunity.
//!
//! The random source is injected, so a seeded generator makes every
//! decision reproducible.

use super::rules::check_winner;
use super::search::{Minimax, WIN_SCORE};
use super::{Board, Difficulty, Mark, Position};
use rand::Rng;
use tracing::{debug, error, instrument};

/// Chance that easy skips all analysis and plays at random.
pub const EASY_RANDOM_MOVE_PROBABILITY: f64 = 0.8;

/// Chance that medium ignores a search candidate scored as an immediate win.
pub const MEDIUM_MISSED_WIN_PROBABILITY: f64 = 0.2;

/// Error raised when the computer is asked to move on a full board.
///
/// A round never asks for a move once the board is full, so this points
/// at a bug in the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PolicyError {
    /// Every square is occupied.
    #[display("No empty square left for the computer to play")]
    NoMovesAvailable,
}

impl std::error::Error for PolicyError {}

/// Picks the computer's move on `board`.
///
/// `computer` is the mark the computer plays; its opponent holds the
/// other mark.
///
/// # Errors
///
/// Returns [`PolicyError::NoMovesAvailable`] if the board is full.
#[instrument(skip(board, rng), fields(board = %board.compact()))]
pub fn choose_move<R: Rng>(
    board: &Board,
    difficulty: Difficulty,
    computer: Mark,
    rng: &mut R,
) -> Result<Position, PolicyError> {
    let available = Position::valid_moves(board);
    if available.is_empty() {
        error!("Computer asked to move on a full board");
        return Err(PolicyError::NoMovesAvailable);
    }

    if difficulty == Difficulty::Easy && rng.random_bool(EASY_RANDOM_MOVE_PROBABILITY) {
        let pos = available[rng.random_range(0..available.len())];
        debug!(position = %pos, "Easy opponent played at random");
        return Ok(pos);
    }

    if let Some(pos) = immediate_move(board, computer, &available) {
        return Ok(pos);
    }

    Ok(searched_move(board, difficulty, computer, &available, rng))
}

/// One-ply scan: the first winning square, else the first blocking square.
fn immediate_move(board: &Board, computer: Mark, available: &[Position]) -> Option<Position> {
    let opponent = computer.opponent();
    let mut block = None;

    for &pos in available {
        if check_winner(&board.with_mark(pos, computer)) == Some(computer) {
            debug!(position = %pos, "Taking immediate win");
            return Some(pos);
        }
        if block.is_none() && check_winner(&board.with_mark(pos, opponent)) == Some(opponent) {
            block = Some(pos);
        }
    }

    if let Some(pos) = block {
        debug!(position = %pos, "Blocking opponent's immediate win");
    }
    block
}

/// Full search over `available`, with medium's missed-win rule applied.
fn searched_move<R: Rng>(
    board: &Board,
    difficulty: Difficulty,
    computer: Mark,
    available: &[Position],
    rng: &mut R,
) -> Position {
    let search = Minimax::new(computer);
    let mut best_score = i32::MIN;
    let mut best_move = available[0];

    for &pos in available {
        let score = search.score(&board.with_mark(pos, computer), 0, false);

        if difficulty == Difficulty::Medium
            && score == WIN_SCORE
            && rng.random_bool(MEDIUM_MISSED_WIN_PROBABILITY)
        {
            debug!(position = %pos, "Medium opponent missed a winning move");
            continue;
        }

        if score > best_score {
            best_score = score;
            best_move = pos;
        }
    }

    debug!(position = %best_move, score = best_score, "Searched move");
    best_move
}
