//! Score tracking across rounds.

use super::Mark;
use super::round::OutcomeEvent;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Running totals for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Rounds won.
    pub wins: u32,
    /// Rounds lost.
    pub losses: u32,
    /// Rounds drawn.
    pub draws: u32,
    /// Rounds played.
    pub games: u32,
}

/// Score records for both marks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scoreboard {
    x: ScoreRecord,
    o: ScoreRecord,
}

impl Scoreboard {
    /// Creates an all-zero scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `mark`.
    pub fn record_for(&self, mark: Mark) -> &ScoreRecord {
        match mark {
            Mark::X => &self.x,
            Mark::O => &self.o,
        }
    }

    fn record_for_mut(&mut self, mark: Mark) -> &mut ScoreRecord {
        match mark {
            Mark::X => &mut self.x,
            Mark::O => &mut self.o,
        }
    }

    /// Applies one round's outcome.
    ///
    /// A win adds a win for the winner, a loss for the other player and a
    /// game for both; a draw adds a draw and a game for both.
    #[instrument(skip(self))]
    pub fn record(&mut self, event: &OutcomeEvent) {
        match (event.is_draw, event.winner) {
            (true, _) => {
                for mark in [Mark::X, Mark::O] {
                    let record = self.record_for_mut(mark);
                    record.draws += 1;
                    record.games += 1;
                }
            }
            (false, Some(winner)) => {
                let won = self.record_for_mut(winner);
                won.wins += 1;
                won.games += 1;
                let lost = self.record_for_mut(winner.opponent());
                lost.losses += 1;
                lost.games += 1;
            }
            (false, None) => warn!("Outcome event with neither winner nor draw ignored"),
        }
    }

    /// Zeroes both records (new players).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_updates_both_players() {
        let mut board = Scoreboard::new();
        board.record(&OutcomeEvent {
            winner: Some(Mark::O),
            is_draw: false,
        });
        assert_eq!(
            *board.record_for(Mark::O),
            ScoreRecord {
                wins: 1,
                losses: 0,
                draws: 0,
                games: 1
            }
        );
        assert_eq!(
            *board.record_for(Mark::X),
            ScoreRecord {
                wins: 0,
                losses: 1,
                draws: 0,
                games: 1
            }
        );
    }

    #[test]
    fn test_draw_updates_both_players() {
        let mut board = Scoreboard::new();
        let draw = OutcomeEvent {
            winner: None,
            is_draw: true,
        };
        board.record(&draw);
        board.record(&draw);
        for mark in [Mark::X, Mark::O] {
            assert_eq!(board.record_for(mark).draws, 2);
            assert_eq!(board.record_for(mark).games, 2);
            assert_eq!(board.record_for(mark).wins, 0);
        }
    }

    #[test]
    fn test_malformed_event_changes_nothing() {
        let mut board = Scoreboard::new();
        board.record(&OutcomeEvent {
            winner: None,
            is_draw: false,
        });
        assert_eq!(board, Scoreboard::new());
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let mut board = Scoreboard::new();
        board.record(&OutcomeEvent {
            winner: Some(Mark::X),
            is_draw: false,
        });
        board.reset();
        assert_eq!(board, Scoreboard::new());
    }
}
