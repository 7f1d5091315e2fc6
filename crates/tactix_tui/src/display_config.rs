//! Startup display configuration loaded from a TOML file.

use std::path::Path;
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tactix_core::{ConfigState, FirstMover, GlyphAssignment};
use tactix_engine::DifficultyLevel;
use tracing::{debug, info, instrument};

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

/// Startup settings for the terminal frontend.
///
/// Every field has a default, so a missing or partial file still yields a
/// playable configuration.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Symbol drawn for the human mark.
    #[serde(default = "default_player_one_glyph")]
    player_one_glyph: char,

    /// Symbol drawn for the computer mark.
    #[serde(default = "default_player_two_glyph")]
    player_two_glyph: char,

    /// Engine strength at startup.
    #[serde(default)]
    difficulty: DifficultyLevel,

    /// Which side opens the first round.
    #[serde(default)]
    first_mover: FirstMover,

    /// Frame-loop pacing in milliseconds.
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
}

#[instrument]
fn default_player_one_glyph() -> char {
    '×'
}

#[instrument]
fn default_player_two_glyph() -> char {
    'o'
}

#[instrument]
fn default_frame_ms() -> u64 {
    16
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            player_one_glyph: default_player_one_glyph(),
            player_two_glyph: default_player_two_glyph(),
            difficulty: DifficultyLevel::default(),
            first_mover: FirstMover::default(),
            frame_ms: default_frame_ms(),
        }
    }
}

impl DisplayConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading display config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(difficulty = %config.difficulty, "Display config loaded");
        Ok(config)
    }

    /// Loads the file when present, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// The controller-facing configuration these settings describe.
    pub fn to_config_state(&self) -> ConfigState {
        ConfigState::new(
            self.difficulty,
            GlyphAssignment::new(self.player_one_glyph, self.player_two_glyph),
            self.first_mover,
        )
    }

    /// Frame-loop pacing as a duration.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_playable() {
        let config = DisplayConfig::default();
        assert_eq!(*config.player_one_glyph(), '×');
        assert_eq!(*config.player_two_glyph(), 'o');
        assert_eq!(*config.difficulty(), DifficultyLevel::Moderate);
        assert_eq!(*config.first_mover(), FirstMover::Human);
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "difficulty = \"hard\"\nfirst_mover = \"ai\"").unwrap();

        let config = DisplayConfig::from_file(file.path()).unwrap();
        assert_eq!(*config.difficulty(), DifficultyLevel::Hard);
        assert_eq!(*config.first_mover(), FirstMover::Ai);
        assert_eq!(*config.player_one_glyph(), '×');
        assert_eq!(*config.frame_ms(), 16);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = DisplayConfig::load_or_default("does_not_exist.toml").unwrap();
        assert_eq!(*config.difficulty(), DifficultyLevel::Moderate);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "difficulty = \"impossible\"").unwrap();
        assert!(DisplayConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_config_state_carries_glyphs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "player_one_glyph = \"X\"\nplayer_two_glyph = \"O\"").unwrap();

        let state = DisplayConfig::from_file(file.path()).unwrap().to_config_state();
        assert_eq!(
            state.glyphs().glyph_for(tactix_engine::Cell::PlayerOne),
            Some('X')
        );
    }
}
