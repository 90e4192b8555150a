//! Tests for loading match configuration from disk.

use std::io::Write;
use velha::{COMPUTER_NAME, MatchConfig};
use velha_tictactoe::{Difficulty, GameMode, Mark};

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
mode = "vs-computer"
difficulty = "easy"
thinking_delay_ms = 50
seed = 42

[players]
x = "Alice"
o = "Bob"
"#
    )
    .unwrap();

    let config = MatchConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.mode(), GameMode::VsComputer);
    assert_eq!(*config.difficulty(), Difficulty::Easy);
    assert_eq!(*config.thinking_delay_ms(), 50);
    assert_eq!(*config.seed(), Some(42));
    assert_eq!(config.display_name(Mark::X), "Alice");
    assert_eq!(config.display_name(Mark::O), COMPUTER_NAME);
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = MatchConfig::load_or_default(dir.path().join("velha.toml")).unwrap();
    assert_eq!(config, MatchConfig::default());
}

#[test]
fn test_invalid_toml_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "difficulty = \"impossible\"").unwrap();

    let err = MatchConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}
