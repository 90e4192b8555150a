//! Match configuration.
//!
//! Loaded from a TOML file; command-line flags override individual fields.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};
use velha_tictactoe::{Difficulty, GameMode, Mark};

/// Display name of the computer opponent.
pub const COMPUTER_NAME: &str = "🤖 ROBO-IA";

/// Names of the two players.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct PlayerNames {
    /// Name of the player holding X.
    #[serde(default = "default_x_name")]
    x: String,

    /// Name of the player holding O.
    #[serde(default = "default_o_name")]
    o: String,
}

impl PlayerNames {
    /// Returns the name registered for `mark`.
    pub fn for_mark(&self, mark: Mark) -> &str {
        match mark {
            Mark::X => &self.x,
            Mark::O => &self.o,
        }
    }
}

impl Default for PlayerNames {
    fn default() -> Self {
        Self::new(default_x_name(), default_o_name())
    }
}

#[instrument]
fn default_x_name() -> String {
    "Player X".to_string()
}

#[instrument]
fn default_o_name() -> String {
    "Player O".to_string()
}

#[instrument]
fn default_thinking_delay_ms() -> u64 {
    500
}

/// Configuration for a match (a series of rounds between the same players).
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct MatchConfig {
    /// Two humans, or a human against the computer.
    #[serde(default)]
    mode: GameMode,

    /// Computer strength.
    #[serde(default)]
    difficulty: Difficulty,

    /// Pause before the computer's move, in milliseconds.
    #[serde(default = "default_thinking_delay_ms")]
    thinking_delay_ms: u64,

    /// Seed for the computer's random choices; entropy when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Player names.
    #[serde(default)]
    players: PlayerNames,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            difficulty: Difficulty::default(),
            thinking_delay_ms: default_thinking_delay_ms(),
            seed: None,
            players: PlayerNames::default(),
        }
    }
}

impl MatchConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(mode = %config.mode, difficulty = %config.difficulty, "Config loaded successfully");
        Ok(config)
    }

    /// Loads configuration from `path`, or defaults if the file does not exist.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Returns the name shown for `mark`.
    ///
    /// Against the computer, O is always the computer.
    pub fn display_name(&self, mark: Mark) -> &str {
        if self.mode.computer_mark() == Some(mark) {
            COMPUTER_NAME
        } else {
            self.players.for_mark(mark)
        }
    }

    /// Checks that every human player has a name.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        for mark in [Mark::X, Mark::O] {
            if self.mode.computer_mark() == Some(mark) {
                continue;
            }
            if self.players.for_mark(mark).trim().is_empty() {
                return Err(ConfigError::new(format!(
                    "Player {} needs a name",
                    mark
                )));
            }
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();
        assert_eq!(*config.mode(), GameMode::TwoPlayer);
        assert_eq!(*config.difficulty(), Difficulty::Medium);
        assert_eq!(*config.thinking_delay_ms(), 500);
        assert_eq!(config.display_name(Mark::O), "Player O");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: MatchConfig = toml::from_str(
            r#"
            mode = "vs-computer"
            difficulty = "hard"

            [players]
            x = "Alice"
            "#,
        )
        .unwrap();
        assert_eq!(*config.mode(), GameMode::VsComputer);
        assert_eq!(*config.difficulty(), Difficulty::Hard);
        assert_eq!(*config.thinking_delay_ms(), 500);
        assert_eq!(config.display_name(Mark::X), "Alice");
        assert_eq!(config.display_name(Mark::O), COMPUTER_NAME);
    }

    #[test]
    fn test_blank_name_fails_validation() {
        let config = MatchConfig::default()
            .with_players(PlayerNames::new("Alice".to_string(), "  ".to_string()));
        assert!(config.validate().is_err());

        // The computer needs no name.
        let config = config.with_mode(GameMode::VsComputer);
        assert!(config.validate().is_ok());
    }
}
