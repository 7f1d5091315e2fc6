//! Frame drawing: grid lines plus one glyph per occupied cell.

use tactix_engine::BOARD_SIZE;
use tracing::instrument;

use crate::config::GlyphAssignment;
use crate::engine::BoardSnapshot;
use crate::layout::GridLayout;
use crate::surface::{DrawSurface, SurfaceError};

/// Draws the board from a snapshot onto an injected surface.
///
/// Stateless apart from its layout: every invocation draws the full grid and
/// the glyphs for the snapshot it is handed, clearing nothing implicitly. An
/// all-empty snapshot (a just-reset board) draws the grid alone.
#[derive(Debug, Clone)]
pub struct Renderer {
    layout: GridLayout,
}

impl Renderer {
    /// Creates a renderer over the given layout.
    pub fn new(layout: GridLayout) -> Self {
        Self { layout }
    }

    /// The layout this renderer draws against.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Draws one frame: grid lines, then cell glyphs.
    #[instrument(skip_all)]
    pub fn render<S: DrawSurface>(
        &self,
        surface: &mut S,
        snapshot: &BoardSnapshot,
        glyphs: &GlyphAssignment,
    ) -> Result<(), SurfaceError> {
        self.draw_grid(surface)?;
        self.draw_marks(surface, snapshot, glyphs)
    }

    /// Draws the `(N+1) x (N+1)` line set bounding the cells.
    fn draw_grid<S: DrawSurface>(&self, surface: &mut S) -> Result<(), SurfaceError> {
        let extent = self.layout.extent();
        for i in 0..=BOARD_SIZE {
            let offset = self.layout.line_offset(i);
            surface.draw_line(offset, 0.0, offset, extent)?;
            surface.draw_line(0.0, offset, extent, offset)?;
        }
        Ok(())
    }

    /// Draws the assigned glyph centered in every occupied cell.
    fn draw_marks<S: DrawSurface>(
        &self,
        surface: &mut S,
        snapshot: &BoardSnapshot,
        glyphs: &GlyphAssignment,
    ) -> Result<(), SurfaceError> {
        for (pos, cell) in snapshot.iter() {
            if let Some(glyph) = glyphs.glyph_for(cell) {
                let (x, y) = self.layout.cell_center(pos);
                surface.draw_glyph(glyph, x, y)?;
            }
        }
        Ok(())
    }
}
