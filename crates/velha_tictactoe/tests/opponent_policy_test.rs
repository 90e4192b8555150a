//! Tests for the computer opponent across difficulties.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use velha_tictactoe::{
    Board, Difficulty, GameMode, GameStatus, Mark, Position, Round, Transition, choose_move,
};

fn board(s: &str) -> Board {
    s.parse().expect("valid board")
}

#[test]
fn test_hard_blocks_open_row() {
    // X X _ / _ O _ / _ _ _, computer plays O.
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let pos = choose_move(&board("XX__O____"), Difficulty::Hard, Mark::O, &mut rng);
    assert_eq!(pos, Ok(Position::TopRight));
}

#[test]
fn test_hard_takes_win_instead_of_block() {
    // O O _ / X X _ / _ _ _, computer plays O.
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let pos = choose_move(&board("OO_XX____"), Difficulty::Hard, Mark::O, &mut rng);
    assert_eq!(pos, Ok(Position::TopRight));
}

#[test]
fn test_medium_takes_immediate_win_regardless_of_seed() {
    // The one-ply scan runs before any random draw for medium.
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pos = choose_move(&board("OO_XX____"), Difficulty::Medium, Mark::O, &mut rng);
        assert_eq!(pos, Ok(Position::TopRight), "seed {seed}");
    }
}

#[test]
fn test_medium_blocks_regardless_of_seed() {
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pos = choose_move(&board("XX__O____"), Difficulty::Medium, Mark::O, &mut rng);
        assert_eq!(pos, Ok(Position::TopRight), "seed {seed}");
    }
}

#[test]
fn test_block_when_computer_plays_x() {
    // O threatens the left column; X has no win.
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let pos = choose_move(&board("OX_O_X___"), Difficulty::Hard, Mark::X, &mut rng);
    assert_eq!(pos, Ok(Position::BottomLeft));
}

#[test]
fn test_easy_sometimes_ignores_a_win() {
    // With 80% random play over many seeds, easy must both hit and miss.
    let b = board("OO_XX____");
    let mut hits = 0;
    let mut misses = 0;
    for seed in 0..200 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        match choose_move(&b, Difficulty::Easy, Mark::O, &mut rng) {
            Ok(Position::TopRight) => hits += 1,
            Ok(_) => misses += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert!(hits > 0 && misses > 0, "hits {hits}, misses {misses}");
}

#[test]
fn test_hard_vs_hard_is_a_draw() {
    let mut round = Round::new(GameMode::TwoPlayer, Difficulty::Hard);
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    while !round.status().is_terminal() {
        let transition = round.play_computer(&mut rng).expect("moves available");
        assert!(transition.is_applied());
    }
    assert_eq!(round.status(), GameStatus::Drawn);
    assert_eq!(round.history().len(), 10);
}

#[test]
fn test_hard_never_loses_to_random_play() {
    for seed in 0..12 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut round = Round::new(GameMode::VsComputer, Difficulty::Hard);
        while !round.status().is_terminal() {
            if round.awaits_computer() {
                round.play_computer(&mut rng).expect("moves available");
            } else {
                let pos = choose_move(round.current_board(), Difficulty::Easy, Mark::X, &mut rng)
                    .expect("moves available");
                assert!(round.apply_move(pos).is_applied());
            }
        }
        assert_ne!(round.status(), GameStatus::Won(Mark::X), "seed {seed}");
    }
}

#[test]
fn test_computer_move_is_rejected_after_round_ends() {
    let mut round = Round::new(GameMode::VsComputer, Difficulty::Hard);
    for index in [0, 3, 1, 4, 2] {
        round.apply_move(Position::from_index(index).unwrap());
    }
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert!(matches!(
        round.play_computer(&mut rng),
        Ok(Transition::Rejected(_))
    ));
}
