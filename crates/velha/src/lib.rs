//! Velha - terminal host for jogo da velha
//!
//! Wraps the pure game logic of [`velha_tictactoe`] in a match session
//! that schedules the computer's moves, tallies the score across rounds
//! and drives a line-oriented terminal front end.
//!
//! # Architecture
//!
//! - **Config**: [`MatchConfig`] loaded from TOML, overridden by flags
//! - **Session**: [`Session`] owns the round, the scoreboard and the
//!   deferred computer move, publishing [`SessionEvent`]s
//! - **Terminal**: [`terminal::run`] reads commands and renders events
//! - **Self-play**: [`selfplay::run`] pits two computer opponents

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
mod config;
pub mod selfplay;
mod session;
pub mod terminal;

pub use config::{COMPUTER_NAME, ConfigError, MatchConfig, PlayerNames};
pub use selfplay::SelfplayReport;
pub use session::{Session, SessionEvent, SessionSnapshot};
