//! Command-line interface for velha.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use velha_tictactoe::{Difficulty, GameMode, Mark};

/// Velha - jogo da velha against a friend or the computer
#[derive(Parser, Debug)]
#[command(name = "velha")]
#[command(about = "Tic-tac-toe with a minimax opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play rounds in the terminal
    Play {
        /// Path to match config
        #[arg(short, long, default_value = "velha.toml")]
        config: PathBuf,

        /// Override the game mode (two-player, vs-computer)
        #[arg(long)]
        mode: Option<GameMode>,

        /// Override the computer's difficulty (easy, medium, hard)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Name of the player holding X
        #[arg(long)]
        x: Option<String>,

        /// Name of the player holding O
        #[arg(long)]
        o: Option<String>,
    },

    /// Let the computer play itself and report the score
    Selfplay {
        /// Number of rounds to play
        #[arg(short, long, default_value = "10")]
        rounds: u32,

        /// Difficulty of the computer holding X
        #[arg(long, default_value = "hard")]
        x_difficulty: Difficulty,

        /// Difficulty of the computer holding O
        #[arg(long, default_value = "hard")]
        o_difficulty: Difficulty,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Print the scoreboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the computer's move for a board
    Suggest {
        /// Board as nine cells, e.g. "XX__O____" or "XX_/_O_/___"
        #[arg(short, long)]
        board: String,

        /// Difficulty to play at
        #[arg(short, long, default_value = "hard")]
        difficulty: Difficulty,

        /// Mark the computer plays; defaults to the side to move
        #[arg(long)]
        computer: Option<Mark>,

        /// Seed for the easy and medium random draws
        #[arg(long)]
        seed: Option<u64>,
    },
}
