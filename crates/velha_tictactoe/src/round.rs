//! Round state machine.
//!
//! A [`Round`] owns the snapshot history of one round of play. The side to
//! move is never stored: it is derived from the current ply, so it cannot
//! drift from the history. Jumping back and then moving truncates the
//! forward history (undo and branch).

use super::policy::{PolicyError, choose_move};
use super::rules::{Outcome, evaluate};
use super::{Board, Difficulty, GameMode, Mark, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Status of the round at the current ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves are accepted.
    InProgress,
    /// The given mark completed a line.
    Won(Mark),
    /// Full board without a line.
    Drawn,
}

impl GameStatus {
    /// Returns true for `Won` and `Drawn`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

impl From<&Outcome> for GameStatus {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Ongoing => GameStatus::InProgress,
            Outcome::Win { mark, .. } => GameStatus::Won(*mark),
            Outcome::Draw => GameStatus::Drawn,
        }
    }
}

/// Notification sent to the host when a round ends.
///
/// Fired once per round; the scoreboard consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutcomeEvent {
    /// Winning mark, `None` on a draw.
    pub winner: Option<Mark>,
    /// True when the round ended in a draw.
    pub is_draw: bool,
}

impl OutcomeEvent {
    /// Builds the event for a terminal outcome, `None` while ongoing.
    pub fn from_outcome(outcome: &Outcome) -> Option<Self> {
        match outcome {
            Outcome::Ongoing => None,
            Outcome::Win { mark, .. } => Some(Self {
                winner: Some(*mark),
                is_draw: false,
            }),
            Outcome::Draw => Some(Self {
                winner: None,
                is_draw: true,
            }),
        }
    }
}

/// Why a move was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Rejection {
    /// The round is won or drawn at the current ply.
    #[display("Game is already over")]
    GameOver,
    /// The square already holds a mark.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),
}

/// Result of offering a move to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The move was ignored; nothing changed.
    Rejected(Rejection),
    /// The move was applied and the round goes on.
    Continued,
    /// The move ended the round.
    Finished {
        /// Final outcome, including the winning line.
        outcome: Outcome,
        /// Set only the first time this round reaches a terminal state.
        event: Option<OutcomeEvent>,
    },
}

impl Transition {
    /// Returns true unless the move was rejected.
    pub fn is_applied(&self) -> bool {
        !matches!(self, Transition::Rejected(_))
    }
}

/// Errors from navigating the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RoundError {
    /// The requested ply does not exist in the history.
    #[display("Ply {ply} is out of range (history holds {len} plies)")]
    PlyOutOfRange {
        /// Requested ply.
        ply: usize,
        /// Number of snapshots in the history.
        len: usize,
    },
}

impl std::error::Error for RoundError {}

/// One round of play.
#[derive(Debug, Clone)]
pub struct Round {
    history: Vec<Board>,
    ply: usize,
    status: GameStatus,
    notified: bool,
    generation: u64,
    mode: GameMode,
    difficulty: Difficulty,
}

impl Round {
    /// Starts a round on an empty board.
    #[instrument]
    pub fn new(mode: GameMode, difficulty: Difficulty) -> Self {
        Self {
            history: vec![Board::new()],
            ply: 0,
            status: GameStatus::InProgress,
            notified: false,
            generation: 0,
            mode,
            difficulty,
        }
    }

    /// Starts a new round with the same mode and difficulty.
    ///
    /// Clears the outcome latch so the next terminal state notifies again.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn reset(&mut self) {
        self.history.truncate(1);
        self.history[0] = Board::new();
        self.ply = 0;
        self.status = GameStatus::InProgress;
        self.notified = false;
        self.generation += 1;
        debug!("Round reset");
    }

    /// Starts a new round with a different mode or difficulty.
    #[instrument(skip(self))]
    pub fn reconfigure(&mut self, mode: GameMode, difficulty: Difficulty) {
        self.mode = mode;
        self.difficulty = difficulty;
        self.reset();
    }

    /// Places the side-to-move's mark at `position`.
    ///
    /// Moves on an occupied square or after the round ended are ignored.
    /// If the current ply is behind the end of the history, the forward
    /// snapshots are discarded first.
    #[instrument(skip(self), fields(ply = self.ply, generation = self.generation))]
    pub fn apply_move(&mut self, position: Position) -> Transition {
        if self.status.is_terminal() {
            debug!("Ignoring move: round is over");
            return Transition::Rejected(Rejection::GameOver);
        }

        let current = *self.current_board();
        if !current.is_empty(position) {
            debug!(%position, "Ignoring move: square occupied");
            return Transition::Rejected(Rejection::SquareOccupied(position));
        }

        let mark = self.side_to_move();
        if self.history.len() > self.ply + 1 {
            debug!(
                discarded = self.history.len() - self.ply - 1,
                "Branching: forward history discarded"
            );
            self.history.truncate(self.ply + 1);
        }
        self.history.push(current.with_mark(position, mark));
        self.ply += 1;
        self.generation += 1;

        let outcome = evaluate(self.current_board());
        self.status = GameStatus::from(&outcome);
        debug!(%mark, %position, status = ?self.status, "Move applied");

        if !outcome.is_terminal() {
            return Transition::Continued;
        }

        let event = if self.notified {
            None
        } else {
            self.notified = true;
            OutcomeEvent::from_outcome(&outcome)
        };
        if let Some(event) = event {
            info!(winner = ?event.winner, is_draw = event.is_draw, "Round finished");
        }
        Transition::Finished { outcome, event }
    }

    /// Moves the current ply pointer without touching the history.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::PlyOutOfRange`] if `ply` is past the end of
    /// the history; the round is left unchanged.
    #[instrument(skip(self), fields(from = self.ply))]
    pub fn jump_to(&mut self, ply: usize) -> Result<(), RoundError> {
        if ply >= self.history.len() {
            debug!(len = self.history.len(), "Jump out of range");
            return Err(RoundError::PlyOutOfRange {
                ply,
                len: self.history.len(),
            });
        }

        self.ply = ply;
        self.status = GameStatus::from(&evaluate(self.current_board()));
        self.generation += 1;
        debug!(status = ?self.status, "Jumped");
        Ok(())
    }

    /// Asks the computer opponent for a move and applies it.
    ///
    /// The computer plays the side to move at the round's difficulty. Does
    /// nothing if the round is already over.
    ///
    /// # Errors
    ///
    /// Propagates [`PolicyError`] from the opponent.
    #[instrument(skip(self, rng), fields(ply = self.ply, difficulty = %self.difficulty))]
    pub fn play_computer<R: Rng>(&mut self, rng: &mut R) -> Result<Transition, PolicyError> {
        if self.status.is_terminal() {
            return Ok(Transition::Rejected(Rejection::GameOver));
        }
        let position = choose_move(
            self.current_board(),
            self.difficulty,
            self.side_to_move(),
            rng,
        )?;
        Ok(self.apply_move(position))
    }

    /// Returns true when the computer should move next.
    pub fn awaits_computer(&self) -> bool {
        !self.status.is_terminal() && self.mode.computer_mark() == Some(self.side_to_move())
    }

    /// Returns the snapshot at the current ply.
    pub fn current_board(&self) -> &Board {
        &self.history[self.ply]
    }

    /// Returns the move that produced the current snapshot.
    pub fn last_move(&self) -> Option<(Mark, Position)> {
        let previous = self.ply.checked_sub(1)?;
        let (before, after) = (&self.history[previous], &self.history[self.ply]);
        Position::ALL
            .into_iter()
            .find(|&pos| before.get(pos) != after.get(pos))
            .map(|pos| (Mark::for_ply(previous), pos))
    }

    /// Returns every snapshot, ply 0 first.
    pub fn history(&self) -> &[Board] {
        &self.history
    }

    /// Returns the current ply.
    pub fn ply(&self) -> usize {
        self.ply
    }

    /// Returns the mark placed by the next move.
    pub fn side_to_move(&self) -> Mark {
        Mark::for_ply(self.ply)
    }

    /// Returns the status at the current ply.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the full outcome at the current ply, including the winning line.
    pub fn outcome(&self) -> Outcome {
        evaluate(self.current_board())
    }

    /// Returns the counter bumped by every move, jump and reset.
    ///
    /// Hosts capture it when deferring a computer move and drop the move
    /// if it has changed by the time it runs.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns whether this round already fired its outcome event.
    pub fn notified(&self) -> bool {
        self.notified
    }

    /// Returns the game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Returns the computer's difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the computer's mark, if the computer plays.
    pub fn computer_mark(&self) -> Option<Mark> {
        self.mode.computer_mark()
    }

    /// Labels for a move list, one per history entry.
    pub fn move_descriptions(&self) -> Vec<String> {
        (0..self.history.len())
            .map(|ply| {
                if ply == 0 {
                    "Go to game start".to_string()
                } else {
                    format!("Go to move #{} ({})", ply, Mark::for_ply(ply - 1))
                }
            })
            .collect()
    }
}

impl Default for Round {
    fn default() -> Self {
        Self::new(GameMode::default(), Difficulty::default())
    }
}
