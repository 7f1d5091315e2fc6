//! Authoritative board storage and the engine entry points.

use std::collections::BTreeSet;

use derive_getters::Getters;
use tracing::{debug, instrument};

use crate::cell::{Cell, DifficultyLevel, GameStatus, Player};
use crate::strategy;

/// Cells per side of the square board.
pub const BOARD_SIZE: usize = 3;

/// Total cell count; the raw cell buffer is always exactly this long.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Error raised by an engine call.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum EngineError {
    /// A cell index fell outside the board.
    #[display("cell index {} is out of bounds for a {} cell board", _0, CELL_COUNT)]
    IndexOutOfBounds(usize),
    /// A raw buffer byte did not decode to a cell value.
    #[display("byte {} at index {} does not decode to a cell", _1, _0)]
    InvalidCellByte(usize, u8),
}

impl std::error::Error for EngineError {}

/// Position sets for one mover's point of view, as raw indices.
struct CellSets {
    own: BTreeSet<usize>,
    opponent: BTreeSet<usize>,
    empty: BTreeSet<usize>,
}

/// The board engine: authoritative cell storage, move selection, and status
/// tracking.
///
/// Clients observe cell contents only through [`Board::raw_cells`], a copy of
/// the row-major byte buffer, and must re-copy after any mutating call.
#[derive(Debug, Clone, Getters)]
pub struct Board {
    #[getter(skip)]
    cells: [Cell; CELL_COUNT],
    /// Outcome as of the last status update.
    status: GameStatus,
    /// Strength used for future move selection.
    difficulty: DifficultyLevel,
}

impl Board {
    /// Creates a board with every cell empty at the default difficulty.
    #[instrument]
    pub fn new() -> Self {
        debug!("Creating board");
        Self {
            cells: [Cell::Empty; CELL_COUNT],
            status: GameStatus::InProgress,
            difficulty: DifficultyLevel::default(),
        }
    }

    /// Clears every cell and restarts the round in place.
    ///
    /// The difficulty setting survives a reset. Resetting an already-empty
    /// board is a no-op.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        debug!("Resetting board");
        self.cells = [Cell::Empty; CELL_COUNT];
        self.status = GameStatus::InProgress;
    }

    /// Changes the strength of future move selection.
    ///
    /// Existing cell contents are untouched.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, level: DifficultyLevel) {
        debug!(level = %level, "Changing difficulty");
        self.difficulty = level;
    }

    /// Whether the cell at `index` holds no mark.
    pub fn is_empty_cell(&self, index: usize) -> Result<bool, EngineError> {
        self.cells
            .get(index)
            .map(|cell| cell.is_empty())
            .ok_or(EngineError::IndexOutOfBounds(index))
    }

    /// Writes `player`'s mark at `index`.
    ///
    /// The write is unconditional: callers check [`Board::is_empty_cell`]
    /// first, as an occupied index is silently overwritten.
    #[instrument(skip(self))]
    pub fn set_cell(&mut self, index: usize, player: Player) -> Result<(), EngineError> {
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(EngineError::IndexOutOfBounds(index))?;
        *cell = player.cell();
        debug!(index, player = %player, "Mark placed");
        Ok(())
    }

    /// Selects and plays one legal move for `player`, updating the status.
    ///
    /// In order: if the opposing side already holds a winning line, its win
    /// is recorded and no move is made; if no empty cell remains, the round
    /// is a draw; otherwise a move is chosen at the configured difficulty
    /// and placed, recording a win for `player` if it completed a line or a
    /// draw if it filled the board.
    #[instrument(skip(self))]
    pub fn make_next_valid_move(&mut self, player: Player) {
        let sets = self.cell_sets(player);

        if strategy::has_winning_line(&sets.opponent) {
            self.status = player.opponent().win_status();
            debug!(status = %self.status, "Opposing side already won, passing");
            return;
        }
        if sets.empty.is_empty() {
            self.status = GameStatus::Draw;
            debug!("Board full, round is a draw");
            return;
        }

        let index = strategy::select_move(self.difficulty, &sets.own, &sets.opponent, &sets.empty);
        self.cells[index] = player.cell();
        debug!(index, player = %player, "Engine move placed");

        let sets = self.cell_sets(player);
        if strategy::has_winning_line(&sets.own) {
            self.status = player.win_status();
            debug!(status = %self.status, "Engine move completed a line");
        } else if sets.empty.is_empty() {
            self.status = GameStatus::Draw;
            debug!("Engine move filled the board, round is a draw");
        }
    }

    /// Outcome of the round as of the last status update.
    pub fn game_status(&self) -> GameStatus {
        self.status
    }

    /// Copies the current cell contents as a row-major byte buffer.
    ///
    /// Valid only until the next mutating call; clients re-copy per frame.
    pub fn raw_cells(&self) -> [u8; CELL_COUNT] {
        let mut buffer = [0u8; CELL_COUNT];
        for (byte, cell) in buffer.iter_mut().zip(self.cells.iter()) {
            *byte = cell.to_byte();
        }
        buffer
    }

    /// Splits cell indices into the mover's, the opponent's, and the empty.
    fn cell_sets(&self, player: Player) -> CellSets {
        let mut sets = CellSets {
            own: BTreeSet::new(),
            opponent: BTreeSet::new(),
            empty: BTreeSet::new(),
        };
        for (index, cell) in self.cells.iter().enumerate() {
            if cell.is_empty() {
                sets.empty.insert(index);
            } else if *cell == player.cell() {
                sets.own.insert(index);
            } else {
                sets.opponent.insert(index);
            }
        }
        sets
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
