//! Tests for round history navigation and outcome notification.

use velha_tictactoe::{
    Board, GameStatus, Mark, OutcomeEvent, Position, Rejection, Round, RoundError, Scoreboard,
    Transition,
};

fn at(index: usize) -> Position {
    Position::from_index(index).expect("index in range")
}

#[test]
fn test_branching_truncates_forward_history() {
    let mut round = Round::default();
    for index in [4, 0, 8] {
        round.apply_move(at(index));
    }
    assert_eq!(round.ply(), 3);
    assert_eq!(round.history().len(), 4);

    round.jump_to(1).unwrap();
    assert_eq!(round.side_to_move(), Mark::O);
    assert!(round.apply_move(at(2)).is_applied());

    // Plies 0 and 1 survive, the new move becomes ply 2.
    assert_eq!(round.history().len(), 3);
    assert_eq!(round.ply(), 2);
    assert_eq!(round.current_board().compact(), "__O_X____");
    assert_eq!(
        round.jump_to(3),
        Err(RoundError::PlyOutOfRange { ply: 3, len: 3 })
    );
}

#[test]
fn test_jump_does_not_truncate() {
    let mut round = Round::default();
    for index in [4, 0, 8] {
        round.apply_move(at(index));
    }
    round.jump_to(0).unwrap();
    assert_eq!(*round.current_board(), Board::new());
    assert_eq!(round.history().len(), 4);
    round.jump_to(3).unwrap();
    assert_eq!(round.current_board().compact(), "O___X___X");
}

#[test]
fn test_snapshots_are_never_mutated() {
    let mut round = Round::default();
    round.apply_move(at(4));
    let first = round.history()[1];
    round.apply_move(at(0));
    assert_eq!(round.history()[1], first);
    assert_eq!(round.history()[0], Board::new());
}

#[test]
fn test_terminal_round_ignores_moves() {
    let mut round = Round::default();
    // X O X / X O O / O X X with the last X completing the draw.
    for index in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
        round.apply_move(at(index));
    }
    assert_eq!(round.status(), GameStatus::Drawn);

    let before = round.clone();
    for index in 0..9 {
        assert_eq!(
            round.apply_move(at(index)),
            Transition::Rejected(Rejection::GameOver)
        );
    }
    assert_eq!(round.history(), before.history());
    assert_eq!(round.generation(), before.generation());
}

#[test]
fn test_draw_event_feeds_scoreboard_once() {
    let mut round = Round::default();
    let mut scoreboard = Scoreboard::new();
    let mut events = Vec::new();

    for index in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
        if let Transition::Finished {
            event: Some(event), ..
        } = round.apply_move(at(index))
        {
            events.push(event);
        }
    }
    // Revisit the terminal board and hammer it with moves.
    round.jump_to(0).unwrap();
    round.jump_to(9).unwrap();
    for index in 0..9 {
        if let Transition::Finished {
            event: Some(event), ..
        } = round.apply_move(at(index))
        {
            events.push(event);
        }
    }

    assert_eq!(
        events,
        vec![OutcomeEvent {
            winner: None,
            is_draw: true
        }]
    );
    for event in &events {
        scoreboard.record(event);
    }
    assert_eq!(scoreboard.record_for(Mark::X).draws, 1);
    assert_eq!(scoreboard.record_for(Mark::O).games, 1);
}

#[test]
fn test_winning_line_is_reported() {
    let mut round = Round::default();
    for index in [2, 0, 4, 1, 6] {
        round.apply_move(at(index));
    }
    assert_eq!(round.status(), GameStatus::Won(Mark::X));
    assert_eq!(
        round.outcome().line(),
        Some([Position::TopRight, Position::Center, Position::BottomLeft])
    );
}

#[test]
fn test_outcome_event_serializes() {
    let event = OutcomeEvent {
        winner: Some(Mark::O),
        is_draw: false,
    };
    let json = serde_json::to_string(&event).unwrap();
    assert_eq!(json, r#"{"winner":"O","is_draw":false}"#);
}
