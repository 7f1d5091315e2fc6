//! Domain vocabulary shared between the engine and its clients.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One board position's state, encoded as a single byte in the raw cell buffer.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// No mark has been placed here.
    Empty = 0,
    /// Occupied by player one's mark.
    PlayerOne = 1,
    /// Occupied by player two's mark.
    PlayerTwo = 2,
}

impl Cell {
    /// Decodes a raw buffer byte, `None` for anything outside the cell encoding.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Cell::Empty),
            1 => Some(Cell::PlayerOne),
            2 => Some(Cell::PlayerTwo),
            _ => None,
        }
    }

    /// Encodes this cell for the raw buffer.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Whether no mark has been placed here.
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// A side in the game.
///
/// `One` is the mark the human plays, `Two` the mark the engine plays for
/// the computer; the status vocabulary in [`GameStatus`] is fixed to that
/// assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Player {
    /// The first mark (the human side).
    #[display("player one")]
    One,
    /// The second mark (the computer side).
    #[display("player two")]
    Two,
}

impl Player {
    /// Returns the opposing player.
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// The mark this player leaves on the board.
    pub fn cell(self) -> Cell {
        match self {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }

    /// The status reported when this player completes a winning line.
    pub fn win_status(self) -> GameStatus {
        match self {
            Player::One => GameStatus::Human,
            Player::Two => GameStatus::Computer,
        }
    }
}

/// Outcome of the current round as last computed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum GameStatus {
    /// Moves are still being accepted.
    #[display("in progress")]
    InProgress,
    /// The human side holds a winning line.
    #[display("human win")]
    Human,
    /// The computer side holds a winning line.
    #[display("computer win")]
    Computer,
    /// No winner and no empty cell remains.
    #[display("draw")]
    Draw,
}

impl GameStatus {
    /// Whether this status ends the round.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Strength setting for engine move selection.
///
/// Purely a configuration value: it changes how future moves are chosen and
/// never touches cells already on the board.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    /// Uniform random choice among empty cells.
    #[display("easy")]
    Easy,
    /// Completes its own line, blocks the opponent's, otherwise random.
    #[default]
    #[display("moderate")]
    Moderate,
    /// Full minimax search.
    #[display("hard")]
    Hard,
}

impl DifficultyLevel {
    /// Returns the next level in the cycle, wrapping from the last to the first.
    #[instrument]
    pub fn cycle(self) -> Self {
        use strum::IntoEnumIterator;
        let mut levels = Self::iter().cycle();
        levels.find(|l| *l == self);
        // The iterator is infinite, so a successor always exists.
        levels.next().unwrap_or_default()
    }
}
