//! Line-oriented terminal front end.
//!
//! Reads commands from stdin and session events from the session's
//! channel in one loop, redrawing the board after each.

use crate::config::{COMPUTER_NAME, MatchConfig, PlayerNames};
use crate::session::{Session, SessionEvent, SessionSnapshot};
use anyhow::Result;
use derive_more::{Display, Error};
use strum::IntoEnumIterator;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use velha_tictactoe::{Difficulty, GameMode, Mark, Position, Transition};

const HELP: &str = "\
Commands:
  1-9 (or a label like top-left)  place your mark
  jump N                          go to move N (0 is the game start)
  history                         list the moves of this round
  score                           show the scoreboard
  continue | new                  start the next round, keeping the score
  players MODE DIFFICULTY X [O]   new players, score reset
                                  (MODE is two-player or vs-computer)
  help                            show this text
  quit                            leave";

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Place the side-to-move's mark.
    Place(Position),
    /// Move to a ply of the history.
    Jump(usize),
    /// List the history.
    History,
    /// Print the scoreboard.
    Score,
    /// Next round, same players.
    Continue,
    /// Register new players.
    Players {
        /// Game mode for the new players.
        mode: GameMode,
        /// Computer strength.
        difficulty: Difficulty,
        /// Player names.
        names: PlayerNames,
    },
    /// Print the command list.
    Help,
    /// Leave the loop.
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{message}")]
pub struct CommandError {
    /// Human-readable explanation.
    pub message: String,
}

impl CommandError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Parses one line of input.
#[instrument]
pub fn parse_command(line: &str) -> Result<TerminalCommand, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(CommandError::new("Empty command, try 'help'"));
    };
    let rest: Vec<&str> = words.collect();

    match head.to_ascii_lowercase().as_str() {
        "jump" | "goto" => {
            let [ply] = rest.as_slice() else {
                return Err(CommandError::new("Usage: jump N"));
            };
            ply.parse()
                .map(TerminalCommand::Jump)
                .map_err(|_| CommandError::new(format!("Not a move number: {ply}")))
        }
        "history" => Ok(TerminalCommand::History),
        "score" => Ok(TerminalCommand::Score),
        "continue" | "new" => Ok(TerminalCommand::Continue),
        "help" | "?" => Ok(TerminalCommand::Help),
        "quit" | "exit" | "q" => Ok(TerminalCommand::Quit),
        "players" => parse_players(&rest),
        _ => Position::from_label_or_number(head)
            .map(TerminalCommand::Place)
            .ok_or_else(|| CommandError::new(format!("Unknown command: {head}, try 'help'"))),
    }
}

fn parse_players(args: &[&str]) -> Result<TerminalCommand, CommandError> {
    let usage = || CommandError::new("Usage: players MODE DIFFICULTY X [O]");
    let (mode, difficulty, x, o) = match args {
        [mode, difficulty, x] => (mode, difficulty, x, None),
        [mode, difficulty, x, o] => (mode, difficulty, x, Some(o)),
        _ => return Err(usage()),
    };

    let mode: GameMode = mode
        .parse()
        .map_err(|_| CommandError::new(format!("Unknown mode: {mode}")))?;
    let difficulty: Difficulty = difficulty
        .parse()
        .map_err(|_| CommandError::new(format!("Unknown difficulty: {difficulty}")))?;

    let o = match (mode, o) {
        (GameMode::VsComputer, _) => COMPUTER_NAME.to_string(),
        (GameMode::TwoPlayer, Some(o)) => o.to_string(),
        (GameMode::TwoPlayer, None) => {
            return Err(CommandError::new("Two-player mode needs a name for O"));
        }
    };

    Ok(TerminalCommand::Players {
        mode,
        difficulty,
        names: PlayerNames::new(x.to_string(), o),
    })
}

/// Runs the interactive loop until `quit` or end of input.
#[instrument(skip(config))]
pub async fn run(config: MatchConfig) -> Result<()> {
    let (session, mut events) = Session::new(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    render(&session.snapshot().await);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("End of input");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(TerminalCommand::Quit) => break,
                    Ok(command) => execute(&session, command).await,
                    Err(e) => println!("{e}"),
                }
            }
            Some(event) = events.recv() => {
                announce(&session, event).await;
                drain(&session, &mut events).await;
            }
        }
    }

    info!("Leaving");
    Ok(())
}

async fn execute(session: &Session, command: TerminalCommand) {
    debug!(?command, "Executing command");
    match command {
        TerminalCommand::Place(position) => match session.play(position).await {
            Transition::Rejected(rejection) => println!("{rejection}"),
            // The MovePlayed event redraws the board.
            Transition::Continued | Transition::Finished { .. } => {}
        },
        TerminalCommand::Jump(ply) => match session.jump_to(ply).await {
            Ok(()) => render(&session.snapshot().await),
            Err(e) => println!("{e}"),
        },
        TerminalCommand::History => {
            let snapshot = session.snapshot().await;
            for (ply, label) in snapshot.move_descriptions().iter().enumerate() {
                let marker = if ply == *snapshot.ply() { ">" } else { " " };
                println!("{marker} {ply}: {label}");
            }
        }
        TerminalCommand::Score => print_score(&session.snapshot().await),
        TerminalCommand::Continue => {
            session.continue_round().await;
            render(&session.snapshot().await);
        }
        TerminalCommand::Players {
            mode,
            difficulty,
            names,
        } => {
            if names.x().trim().is_empty() {
                warn!("Rejected blank player name");
                println!("Player X needs a name");
                return;
            }
            session.new_players(names, mode, difficulty).await;
            render(&session.snapshot().await);
        }
        TerminalCommand::Help => println!("{HELP}"),
        TerminalCommand::Quit => {}
    }
}

async fn announce(session: &Session, event: SessionEvent) {
    match event {
        SessionEvent::Thinking { .. } => println!("{COMPUTER_NAME} is thinking..."),
        SessionEvent::MovePlayed { mark, position, ply } => {
            println!("Move #{ply}: {mark} at {position}");
            render(&session.snapshot().await);
        }
        SessionEvent::RoundOver { .. } => {
            print_score(&session.snapshot().await);
            println!("Type 'continue' for another round.");
        }
    }
}

/// Announces events that queued up while the last one was handled.
async fn drain(session: &Session, events: &mut mpsc::UnboundedReceiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        announce(session, event).await;
    }
}

fn render(snapshot: &SessionSnapshot) {
    println!("\n{}\n", snapshot.board().display());
    println!("{}", snapshot.status_line());
}

fn print_score(snapshot: &SessionSnapshot) {
    let names = snapshot.names();
    for mark in Mark::iter() {
        let record = snapshot.scoreboard().record_for(mark);
        println!(
            "{} ({}): {} wins, {} losses, {} draws, {} games",
            names.for_mark(mark),
            mark,
            record.wins,
            record.losses,
            record.draws,
            record.games
        );
    }
}
