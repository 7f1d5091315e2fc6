//! The board-engine capability seam and its client adapter.
//!
//! Everything the controller knows about the engine goes through
//! [`BoardEngine`]; the engine's own move selection, legality rules, and win
//! detection stay behind it. Every call can fail, so the controller's error
//! path exists even though the bundled engine rarely exercises it.

use tactix_engine::{
    BOARD_SIZE, Board, CELL_COUNT, Cell, DifficultyLevel, EngineError, GameStatus, Player,
};
use tracing::{debug, instrument};

use crate::layout::GridPos;

/// Capability interface onto the opaque board engine.
pub trait BoardEngine {
    /// Mutates the board to all empty, in place.
    fn reset(&mut self) -> Result<(), EngineError>;

    /// Whether the cell at `index` holds no mark.
    fn is_empty_cell(&self, index: usize) -> Result<bool, EngineError>;

    /// Writes `player`'s mark at `index`. Callers pre-check emptiness; the
    /// engine may overwrite an occupied index.
    fn set_cell(&mut self, index: usize, player: Player) -> Result<(), EngineError>;

    /// Selects and plays one legal move for `player`, or passes if the
    /// round is already decided.
    fn make_next_valid_move(&mut self, player: Player) -> Result<(), EngineError>;

    /// The round outcome as last computed by the engine.
    fn game_status(&self) -> Result<GameStatus, EngineError>;

    /// Changes the strength of future move selection.
    fn set_difficulty(&mut self, level: DifficultyLevel) -> Result<(), EngineError>;

    /// Copies the current row-major cell buffer. Stale after any mutating
    /// call; re-copy per frame.
    fn raw_cells(&self) -> Result<[u8; CELL_COUNT], EngineError>;
}

impl BoardEngine for Board {
    fn reset(&mut self) -> Result<(), EngineError> {
        Board::reset(self);
        Ok(())
    }

    fn is_empty_cell(&self, index: usize) -> Result<bool, EngineError> {
        Board::is_empty_cell(self, index)
    }

    fn set_cell(&mut self, index: usize, player: Player) -> Result<(), EngineError> {
        Board::set_cell(self, index, player)
    }

    fn make_next_valid_move(&mut self, player: Player) -> Result<(), EngineError> {
        Board::make_next_valid_move(self, player);
        Ok(())
    }

    fn game_status(&self) -> Result<GameStatus, EngineError> {
        Ok(Board::game_status(self))
    }

    fn set_difficulty(&mut self, level: DifficultyLevel) -> Result<(), EngineError> {
        Board::set_difficulty(self, level);
        Ok(())
    }

    fn raw_cells(&self) -> Result<[u8; CELL_COUNT], EngineError> {
        Ok(Board::raw_cells(self))
    }
}

/// A decoded copy of the cell buffer, taken between mutations.
///
/// The renderer reads cells only through a snapshot, never through live
/// engine state, so a frame always sees one consistent board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSnapshot {
    cells: [Cell; CELL_COUNT],
}

impl BoardSnapshot {
    /// Decodes a raw byte buffer, rejecting bytes outside the cell encoding.
    pub fn decode(buffer: &[u8; CELL_COUNT]) -> Result<Self, EngineError> {
        let mut cells = [Cell::Empty; CELL_COUNT];
        for (index, byte) in buffer.iter().enumerate() {
            cells[index] =
                Cell::from_byte(*byte).ok_or(EngineError::InvalidCellByte(index, *byte))?;
        }
        Ok(Self { cells })
    }

    /// The cell at a grid position.
    pub fn cell(&self, pos: GridPos) -> Cell {
        self.cells
            .get(pos.index())
            .copied()
            .unwrap_or(Cell::Empty)
    }

    /// Whether no cell holds a mark.
    pub fn is_all_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }

    /// Number of cells holding a mark.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Iterates every position and its cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, Cell)> + '_ {
        (0..BOARD_SIZE).flat_map(move |row| {
            (0..BOARD_SIZE).map(move |col| {
                let pos = GridPos::new(row, col);
                (pos, self.cell(pos))
            })
        })
    }
}

/// Thin adapter owning the engine handle.
///
/// Forwards every capability call with tracing and turns raw buffers into
/// decoded snapshots. Caches nothing across mutating calls.
#[derive(Debug)]
pub struct EngineClient<E> {
    engine: E,
}

impl<E: BoardEngine> EngineClient<E> {
    /// Wraps an engine handle.
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Resets the board to all empty.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<(), EngineError> {
        debug!("Requesting board reset");
        self.engine.reset()
    }

    /// Whether the cell at `index` holds no mark.
    pub fn is_empty_cell(&self, index: usize) -> Result<bool, EngineError> {
        self.engine.is_empty_cell(index)
    }

    /// Writes `player`'s mark at `index`.
    #[instrument(skip(self))]
    pub fn set_cell(&mut self, index: usize, player: Player) -> Result<(), EngineError> {
        debug!(index, player = %player, "Writing mark");
        self.engine.set_cell(index, player)
    }

    /// Asks the engine to play one move for `player`.
    #[instrument(skip(self))]
    pub fn make_next_valid_move(&mut self, player: Player) -> Result<(), EngineError> {
        debug!(player = %player, "Requesting engine move");
        self.engine.make_next_valid_move(player)
    }

    /// The round outcome as last computed by the engine.
    pub fn game_status(&self) -> Result<GameStatus, EngineError> {
        self.engine.game_status()
    }

    /// Changes the strength of future move selection.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, level: DifficultyLevel) -> Result<(), EngineError> {
        debug!(level = %level, "Forwarding difficulty");
        self.engine.set_difficulty(level)
    }

    /// Takes a fresh decoded snapshot of the cell buffer.
    ///
    /// Called once per frame and after every mutating sequence; nothing from
    /// an earlier snapshot survives a mutation.
    pub fn snapshot(&self) -> Result<BoardSnapshot, EngineError> {
        BoardSnapshot::decode(&self.engine.raw_cells()?)
    }
}
