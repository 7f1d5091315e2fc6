//! The drawing-surface seam between the controller and a concrete frontend.
//!
//! The controller never touches a terminal or a window directly; it draws
//! through [`DrawSurface`], injected at construction. Primitives mirror what
//! the renderer actually needs: straight lines for the grid, one centered
//! glyph per mark, an explicit clear, and a present call ending the frame.

use derive_more::{Display, Error};
use derive_new::new;
use tracing::instrument;

/// Bounding geometry of the rendering surface in client coordinates.
///
/// `width`/`height` are the on-screen size, which may differ from the
/// surface's own pixel extent; the input mapper scales between the two.
#[derive(Debug, Clone, Copy, PartialEq, new)]
pub struct SurfaceGeometry {
    /// Left edge of the surface in client coordinates.
    pub left: f64,
    /// Top edge of the surface in client coordinates.
    pub top: f64,
    /// On-screen width in client units.
    pub width: f64,
    /// On-screen height in client units.
    pub height: f64,
}

/// Failure reported by a drawing surface or input source.
#[derive(Debug, Clone, Display, Error)]
#[display("Surface error: {} at {}:{}", message, file, line)]
pub struct SurfaceError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl SurfaceError {
    /// Creates a new surface error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// A 2D drawing surface the renderer paints each frame.
pub trait DrawSurface {
    /// Current bounding geometry, queried per click since the on-screen
    /// size can change between frames.
    fn geometry(&self) -> SurfaceGeometry;

    /// Wipes everything drawn so far.
    fn clear(&mut self) -> Result<(), SurfaceError>;

    /// Draws a straight line between two surface-pixel points.
    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<(), SurfaceError>;

    /// Draws a glyph centered at a surface-pixel point.
    fn draw_glyph(&mut self, glyph: char, x: f64, y: f64) -> Result<(), SurfaceError>;

    /// Ends the frame, making everything drawn since the last present
    /// visible.
    fn present(&mut self) -> Result<(), SurfaceError>;
}
