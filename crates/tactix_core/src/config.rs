//! Display and gameplay toggles settable from outside the core.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tactix_engine::{Cell, DifficultyLevel};
use tracing::{debug, instrument};

/// The display symbols assigned to the two marks.
///
/// Swappable without touching board contents: the assignment changes which
/// symbol is drawn for each cell value, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct GlyphAssignment {
    /// Symbol drawn for player one's mark.
    player_one: char,
    /// Symbol drawn for player two's mark.
    player_two: char,
}

impl GlyphAssignment {
    /// Creates an assignment from the two symbols.
    pub fn new(player_one: char, player_two: char) -> Self {
        Self {
            player_one,
            player_two,
        }
    }

    /// Exchanges the two symbols in place.
    #[instrument(skip(self))]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.player_one, &mut self.player_two);
        debug!(player_one = %self.player_one, player_two = %self.player_two, "Glyphs swapped");
    }

    /// The symbol for a cell value, `None` for an empty cell.
    pub fn glyph_for(&self, cell: Cell) -> Option<char> {
        match cell {
            Cell::Empty => None,
            Cell::PlayerOne => Some(self.player_one),
            Cell::PlayerTwo => Some(self.player_two),
        }
    }
}

impl Default for GlyphAssignment {
    fn default() -> Self {
        Self::new('×', 'o')
    }
}

/// Which side opens a new round.
///
/// Defaults to [`FirstMover::Human`] so the player moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirstMover {
    /// The human clicks first.
    #[default]
    Human,
    /// The engine plays one move before the first click.
    Ai,
}

impl FirstMover {
    /// Returns the display label for this option.
    #[instrument]
    pub fn label(self) -> &'static str {
        match self {
            Self::Human => "Player",
            Self::Ai => "AI",
        }
    }

    /// Toggles between `Human` and `Ai`.
    #[instrument]
    pub fn toggle(self) -> Self {
        match self {
            Self::Human => Self::Ai,
            Self::Ai => Self::Human,
        }
    }
}

/// The three independent toggles the UI controls can set.
///
/// Holds values only; the reset policy attached to changing them belongs to
/// the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters)]
pub struct ConfigState {
    /// Engine strength for future moves.
    difficulty: DifficultyLevel,
    /// Display symbols for the two marks.
    glyphs: GlyphAssignment,
    /// Which side opens a new round.
    first_mover: FirstMover,
}

impl ConfigState {
    /// Creates a config from explicit values.
    #[instrument]
    pub fn new(difficulty: DifficultyLevel, glyphs: GlyphAssignment, first_mover: FirstMover) -> Self {
        Self {
            difficulty,
            glyphs,
            first_mover,
        }
    }

    /// Records a new difficulty level.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, level: DifficultyLevel) {
        debug!(level = %level, "Difficulty set");
        self.difficulty = level;
    }

    /// Exchanges the two display symbols.
    #[instrument(skip(self))]
    pub fn swap_glyphs(&mut self) {
        self.glyphs.swap();
    }

    /// Records which side opens a new round.
    #[instrument(skip(self))]
    pub fn set_first_mover(&mut self, mover: FirstMover) {
        debug!(mover = mover.label(), "First mover set");
        self.first_mover = mover;
    }
}
