//! Computer against computer, for tuning and sanity checks.

use derive_getters::Getters;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, instrument};
use velha_tictactoe::{
    Difficulty, GameMode, Mark, PolicyError, Round, Scoreboard, Transition, choose_move,
};

/// Tally of a self-play run.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct SelfplayReport {
    /// Rounds played.
    rounds: u32,
    /// Strength of the computer holding X.
    x_difficulty: Difficulty,
    /// Strength of the computer holding O.
    o_difficulty: Difficulty,
    /// Results, X's and O's records.
    scoreboard: Scoreboard,
}

impl std::fmt::Display for SelfplayReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} rounds, X ({}) vs O ({})",
            self.rounds, self.x_difficulty, self.o_difficulty
        )?;
        for mark in [Mark::X, Mark::O] {
            let record = self.scoreboard.record_for(mark);
            writeln!(
                f,
                "  {}: {} wins, {} losses, {} draws",
                mark, record.wins, record.losses, record.draws
            )?;
        }
        Ok(())
    }
}

/// Plays `rounds` rounds with each side driven by the computer.
///
/// Both sides share one random source, seeded from `seed` when given.
///
/// # Errors
///
/// Propagates [`PolicyError`], which only occurs if a round fails to
/// notice a full board.
#[instrument]
pub fn run(
    rounds: u32,
    x_difficulty: Difficulty,
    o_difficulty: Difficulty,
    seed: Option<u64>,
) -> Result<SelfplayReport, PolicyError> {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };
    let mut scoreboard = Scoreboard::new();
    let mut round = Round::new(GameMode::TwoPlayer, Difficulty::default());

    for index in 0..rounds {
        round.reset();
        loop {
            let mark = round.side_to_move();
            let difficulty = match mark {
                Mark::X => x_difficulty,
                Mark::O => o_difficulty,
            };
            let position = choose_move(round.current_board(), difficulty, mark, &mut rng)?;
            match round.apply_move(position) {
                Transition::Continued => continue,
                Transition::Finished { event, .. } => {
                    if let Some(event) = event {
                        scoreboard.record(&event);
                    }
                    break;
                }
                Transition::Rejected(rejection) => {
                    debug!(%rejection, "Computer move rejected");
                    break;
                }
            }
        }
        debug!(round = index + 1, board = %round.current_board().compact(), "Self-play round done");
    }

    info!(rounds, "Self-play finished");
    Ok(SelfplayReport {
        rounds,
        x_difficulty,
        o_difficulty,
        scoreboard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_round_is_tallied() {
        let report = run(5, Difficulty::Easy, Difficulty::Medium, Some(3)).unwrap();
        let x = report.scoreboard().record_for(Mark::X);
        let o = report.scoreboard().record_for(Mark::O);
        assert_eq!(x.games, 5);
        assert_eq!(o.games, 5);
        assert_eq!(x.wins, o.losses);
        assert_eq!(x.draws, o.draws);
    }

    #[test]
    fn test_same_seed_same_report() {
        let a = run(4, Difficulty::Easy, Difficulty::Easy, Some(11)).unwrap();
        let b = run(4, Difficulty::Easy, Difficulty::Easy, Some(11)).unwrap();
        assert_eq!(a, b);
    }
}
