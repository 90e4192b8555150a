//! Velha - jogo da velha in the terminal
//!
//! Play against a friend or the computer, watch the computer play itself,
//! or ask it for a move.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use velha::MatchConfig;
use velha::cli::{Cli, Command};
use velha_tictactoe::{Board, Difficulty, GameMode, Mark, choose_move};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Play {
            config,
            mode,
            difficulty,
            x,
            o,
        } => run_play(config, mode, difficulty, x, o).await,
        Command::Selfplay {
            rounds,
            x_difficulty,
            o_difficulty,
            seed,
            json,
        } => run_selfplay(rounds, x_difficulty, o_difficulty, seed, json),
        Command::Suggest {
            board,
            difficulty,
            computer,
            seed,
        } => run_suggest(&board, difficulty, computer, seed),
    }
}

/// Run the interactive terminal game
#[instrument(skip(config_path), fields(config = %config_path.display()))]
async fn run_play(
    config_path: PathBuf,
    mode: Option<GameMode>,
    difficulty: Option<Difficulty>,
    x: Option<String>,
    o: Option<String>,
) -> Result<()> {
    let mut config = MatchConfig::load_or_default(&config_path)?;
    if let Some(mode) = mode {
        config = config.with_mode(mode);
    }
    if let Some(difficulty) = difficulty {
        config = config.with_difficulty(difficulty);
    }
    if x.is_some() || o.is_some() {
        let players = velha::PlayerNames::new(
            x.unwrap_or_else(|| config.players().x().clone()),
            o.unwrap_or_else(|| config.players().o().clone()),
        );
        config = config.with_players(players);
    }
    config.validate()?;

    info!(mode = %config.mode(), difficulty = %config.difficulty(), "Starting terminal game");
    velha::terminal::run(config).await
}

/// Run computer-vs-computer rounds and print the tally
fn run_selfplay(
    rounds: u32,
    x_difficulty: Difficulty,
    o_difficulty: Difficulty,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let report = velha::selfplay::run(rounds, x_difficulty, o_difficulty, seed)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Print the computer's move for a board
#[instrument]
fn run_suggest(
    board: &str,
    difficulty: Difficulty,
    computer: Option<Mark>,
    seed: Option<u64>,
) -> Result<()> {
    let board: Board = board.parse().context("Invalid board")?;
    // X opens, so O is to move whenever X is ahead.
    let computer = computer.unwrap_or(if board.count(Mark::X) > board.count(Mark::O) {
        Mark::O
    } else {
        Mark::X
    });
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };

    let position = choose_move(&board, difficulty, computer, &mut rng)?;
    println!("{}\n", board.display());
    println!("{computer} plays {} (square {})", position, position.to_index() + 1);
    Ok(())
}
