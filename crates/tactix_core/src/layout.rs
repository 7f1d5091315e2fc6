//! Fixed grid geometry shared by the renderer and the input mapper.

use derive_new::new;
use tactix_engine::BOARD_SIZE;

/// Default edge length of one cell in surface pixels, borders excluded.
pub const CELL_PITCH: f64 = 100.0;

/// A cell address on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct GridPos {
    /// Row, counted from the top edge.
    pub row: usize,
    /// Column, counted from the left edge.
    pub col: usize,
}

impl GridPos {
    /// Row-major index into the raw cell buffer.
    pub fn index(self) -> usize {
        self.row * BOARD_SIZE + self.col
    }
}

/// Pitch-based surface geometry: where grid lines fall and where glyphs sit.
///
/// The surface spans `(pitch + 1) * N + 1` pixels per axis, one border line
/// between and around the cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    cell_pitch: f64,
}

impl GridLayout {
    /// Creates a layout with the given cell pitch in surface pixels.
    pub fn new(cell_pitch: f64) -> Self {
        Self { cell_pitch }
    }

    /// Edge length of one cell in surface pixels.
    pub fn cell_pitch(&self) -> f64 {
        self.cell_pitch
    }

    /// Surface extent per axis in surface pixels.
    pub fn extent(&self) -> f64 {
        (self.cell_pitch + 1.0) * BOARD_SIZE as f64 + 1.0
    }

    /// Surface coordinate of the `i`-th grid line on either axis.
    pub fn line_offset(&self, i: usize) -> f64 {
        i as f64 * (self.cell_pitch + 1.0) + 1.0
    }

    /// Center of a cell in surface coordinates, where its glyph is drawn.
    pub fn cell_center(&self, pos: GridPos) -> (f64, f64) {
        let half = self.cell_pitch / 2.0;
        (
            self.line_offset(pos.col) + half,
            self.line_offset(pos.row) + half,
        )
    }

    /// The cell containing the surface point `(x, y)`.
    ///
    /// Points beyond any edge land in the nearest edge cell; the result is
    /// always in range.
    pub fn cell_at(&self, x: f64, y: f64) -> GridPos {
        let span = self.cell_pitch + 1.0;
        let edge = (BOARD_SIZE - 1) as f64;
        let col = (x / span).floor().clamp(0.0, edge) as usize;
        let row = (y / span).floor().clamp(0.0, edge) as usize;
        GridPos::new(row, col)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(CELL_PITCH)
    }
}
