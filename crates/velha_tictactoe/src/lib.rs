//! Velha tic-tac-toe - pure game logic
//!
//! Board adjudication, the minimax search and the computer opponent for
//! jogo da velha, plus the round state machine that hosts drive.
//!
//! # Architecture
//!
//! - **Rules**: [`evaluate`] turns a board snapshot into an [`Outcome`]
//! - **Search**: [`Minimax`] scores moves by exhaustive search
//! - **Policy**: [`choose_move`] gates the search behind difficulty
//! - **Round**: [`Round`] owns the history and fires one [`OutcomeEvent`] per round
//! - **Score**: [`Scoreboard`] tallies outcome events
//!
//! # Example
//!
//! ```
//! use velha_tictactoe::{Difficulty, GameMode, Position, Round};
//! use rand::SeedableRng;
//!
//! let mut round = Round::new(GameMode::VsComputer, Difficulty::Hard);
//! round.apply_move(Position::Center);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! round.play_computer(&mut rng).expect("board has empty squares");
//! assert_eq!(round.ply(), 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod policy;
mod position;
mod round;
pub mod rules;
mod score;
mod search;
mod types;

pub use policy::{
    EASY_RANDOM_MOVE_PROBABILITY, MEDIUM_MISSED_WIN_PROBABILITY, PolicyError, choose_move,
};
pub use position::Position;
pub use round::{GameStatus, OutcomeEvent, Rejection, Round, RoundError, Transition};
pub use rules::{LINES, Line, Outcome, check_winner, evaluate, is_full};
pub use score::{ScoreRecord, Scoreboard};
pub use search::{Minimax, WIN_SCORE};
pub use types::{Board, BoardParseError, Difficulty, GameMode, Mark, Square};
