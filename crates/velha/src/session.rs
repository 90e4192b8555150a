//! Match session: one round at a time, scores across rounds.
//!
//! A [`Session`] is a cheap cloneable handle. All state sits behind one
//! async mutex, so a human move and a deferred computer move never apply
//! to the same ply. The computer's move is scheduled as a task that
//! sleeps for the thinking delay and then re-checks the round's
//! generation; any move, jump or reset in between aborts it.

use crate::config::{MatchConfig, PlayerNames};
use derive_getters::Getters;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};
use velha_tictactoe::{
    Board, Difficulty, GameMode, GameStatus, Mark, Outcome, OutcomeEvent, Position, Round,
    RoundError, Scoreboard, Transition,
};

/// Notifications published to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The computer is about to think.
    Thinking {
        /// Mark the computer plays.
        mark: Mark,
    },
    /// A mark was placed.
    MovePlayed {
        /// Mark placed.
        mark: Mark,
        /// Where it was placed.
        position: Position,
        /// Ply after the move.
        ply: usize,
    },
    /// The round ended; the scoreboard already includes it.
    RoundOver {
        /// The round's outcome.
        event: OutcomeEvent,
        /// Totals after recording the outcome.
        scoreboard: Scoreboard,
    },
}

/// Read-only view of the session for rendering.
#[derive(Debug, Clone, Getters)]
pub struct SessionSnapshot {
    /// Board at the current ply.
    board: Board,
    /// Current ply.
    ply: usize,
    /// Number of snapshots in the history.
    history_len: usize,
    /// Status at the current ply.
    status: GameStatus,
    /// Outcome at the current ply, with the winning line.
    outcome: Outcome,
    /// Mark placed by the next move.
    side_to_move: Mark,
    /// Running totals.
    scoreboard: Scoreboard,
    /// Display names, the computer's name included.
    names: PlayerNames,
    /// Move list labels.
    move_descriptions: Vec<String>,
    /// One-line status for the players.
    status_line: String,
    /// Game mode.
    mode: GameMode,
    /// Computer strength.
    difficulty: Difficulty,
    /// True while a computer move is scheduled.
    computer_pending: bool,
}

struct SessionState {
    round: Round,
    scoreboard: Scoreboard,
    config: MatchConfig,
    rng: ChaCha8Rng,
    pending: Option<JoinHandle<()>>,
}

impl SessionState {
    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            debug!("Cancelling scheduled computer move");
            handle.abort();
        }
    }

    fn names(&self) -> PlayerNames {
        PlayerNames::new(
            self.config.display_name(Mark::X).to_string(),
            self.config.display_name(Mark::O).to_string(),
        )
    }

    fn status_line(&self) -> String {
        match self.round.status() {
            GameStatus::Won(mark) => format!("Winner: {}", self.config.display_name(mark)),
            GameStatus::Drawn => "Draw!".to_string(),
            GameStatus::InProgress => format!(
                "Next player: {}",
                self.config.display_name(self.round.side_to_move())
            ),
        }
    }
}

/// Handle to a running match.
#[derive(Clone)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    events: mpsc::UnboundedSender<SessionEvent>,
    thinking_delay: Duration,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("thinking_delay", &self.thinking_delay)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session and the receiver for its events.
    #[instrument(skip(config), fields(mode = %config.mode(), difficulty = %config.difficulty()))]
    pub fn new(config: MatchConfig) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let rng = match config.seed() {
            Some(seed) => ChaCha8Rng::seed_from_u64(*seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        let thinking_delay = Duration::from_millis(*config.thinking_delay_ms());
        let state = SessionState {
            round: Round::new(*config.mode(), *config.difficulty()),
            scoreboard: Scoreboard::new(),
            config,
            rng,
            pending: None,
        };
        info!("Session started");

        let session = Self {
            state: Arc::new(Mutex::new(state)),
            events,
            thinking_delay,
        };
        (session, rx)
    }

    /// Places the side-to-move's mark at `position`.
    ///
    /// Rejected moves change nothing. An accepted move cancels any
    /// scheduled computer move.
    #[instrument(skip(self))]
    pub async fn play(&self, position: Position) -> Transition {
        let mut state = self.state.lock().await;
        let transition = state.round.apply_move(position);
        self.after_transition(&mut state, transition);
        transition
    }

    /// Moves to an earlier (or later) ply of the current history.
    ///
    /// # Errors
    ///
    /// Returns [`RoundError::PlyOutOfRange`] if the ply does not exist.
    #[instrument(skip(self))]
    pub async fn jump_to(&self, ply: usize) -> Result<(), RoundError> {
        let mut state = self.state.lock().await;
        state.round.jump_to(ply)?;
        state.cancel_pending();
        self.schedule_computer(&mut state);
        Ok(())
    }

    /// Starts the next round between the same players, keeping the score.
    #[instrument(skip(self))]
    pub async fn continue_round(&self) {
        let mut state = self.state.lock().await;
        state.cancel_pending();
        state.round.reset();
        info!("Next round");
        self.schedule_computer(&mut state);
    }

    /// Starts over with new players: fresh round, zeroed score.
    #[instrument(skip(self))]
    pub async fn new_players(&self, players: PlayerNames, mode: GameMode, difficulty: Difficulty) {
        let mut state = self.state.lock().await;
        state.cancel_pending();
        let config = state
            .config
            .clone()
            .with_players(players)
            .with_mode(mode)
            .with_difficulty(difficulty);
        state.config = config;
        state.round.reconfigure(mode, difficulty);
        state.scoreboard.reset();
        info!(%mode, %difficulty, "New players registered");
        self.schedule_computer(&mut state);
    }

    /// Returns a view of the current state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            board: *state.round.current_board(),
            ply: state.round.ply(),
            history_len: state.round.history().len(),
            status: state.round.status(),
            outcome: state.round.outcome(),
            side_to_move: state.round.side_to_move(),
            scoreboard: state.scoreboard,
            names: state.names(),
            move_descriptions: state.round.move_descriptions(),
            status_line: state.status_line(),
            mode: state.round.mode(),
            difficulty: state.round.difficulty(),
            computer_pending: state.pending.is_some(),
        }
    }

    /// Publishes the effects of an applied move and schedules the reply.
    fn after_transition(&self, state: &mut SessionState, transition: Transition) {
        if !transition.is_applied() {
            return;
        }
        state.cancel_pending();

        if let Some((mark, position)) = state.round.last_move() {
            self.publish(SessionEvent::MovePlayed {
                mark,
                position,
                ply: state.round.ply(),
            });
        }

        if let Transition::Finished {
            event: Some(event), ..
        } = transition
        {
            state.scoreboard.record(&event);
            self.publish(SessionEvent::RoundOver {
                event,
                scoreboard: state.scoreboard,
            });
        }

        self.schedule_computer(state);
    }

    /// Spawns the deferred computer move if the computer is to play.
    fn schedule_computer(&self, state: &mut SessionState) {
        if !state.round.awaits_computer() {
            return;
        }

        let generation = state.round.generation();
        let mark = state.round.side_to_move();
        debug!(generation, delay = ?self.thinking_delay, "Scheduling computer move");
        self.publish(SessionEvent::Thinking { mark });

        let session = self.clone();
        state.pending = Some(tokio::spawn(async move {
            session.deferred_computer_move(generation).await;
        }));
    }

    /// Body of the scheduled task.
    #[instrument(skip(self))]
    async fn deferred_computer_move(self, generation: u64) {
        tokio::time::sleep(self.thinking_delay).await;

        let mut state = self.state.lock().await;
        if state.round.generation() != generation {
            debug!(current = state.round.generation(), "Discarding stale computer move");
            return;
        }
        // This task is the pending one; forget its handle before playing.
        state.pending = None;

        let SessionState { round, rng, .. } = &mut *state;
        match round.play_computer(rng) {
            Ok(transition) => self.after_transition(&mut state, transition),
            Err(e) => error!(error = %e, "Computer could not move"),
        }
    }

    fn publish(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            debug!("No listener for session events");
        }
    }
}
