//! Pointer input: events, the input-source seam, and click-to-cell mapping.

use std::time::Duration;

use derive_new::new;
use tactix_engine::DifficultyLevel;
use tracing::{instrument, trace};

use crate::config::FirstMover;
use crate::layout::{GridLayout, GridPos};
use crate::surface::{SurfaceError, SurfaceGeometry};

/// A pointer click in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, new)]
pub struct PointerEvent {
    /// Horizontal client coordinate of the click.
    pub client_x: f64,
    /// Vertical client coordinate of the click.
    pub client_y: f64,
}

/// A discrete configuration change requested by a UI control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    /// Set the engine strength for future moves.
    SetDifficulty(DifficultyLevel),
    /// Exchange the two display symbols.
    SwapGlyphs,
    /// Set which side opens a new round.
    SetFirstMover(FirstMover),
    /// Restart the round under the current settings.
    NewRound,
}

/// One event delivered by an input source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A pointer click on the rendering surface.
    Click(PointerEvent),
    /// A configuration control change.
    Control(ControlEvent),
    /// A request to leave the game.
    Quit,
}

/// Source of user input events, injected into the controller alongside the
/// drawing surface.
pub trait InputSource {
    /// Waits up to `timeout` for the next event.
    ///
    /// Returning `None` on timeout is how the frame loop paces itself; the
    /// controller draws a frame after every poll either way.
    fn poll(&mut self, timeout: Duration) -> Result<Option<InputEvent>, SurfaceError>;
}

/// Maps a click to the cell under it.
///
/// Client coordinates are shifted into the surface's bounding box, scaled by
/// the surface-extent to on-screen-size ratio per axis, then bucketed by
/// cell pitch with both axes clamped into range. Total function: every
/// click, however far outside the surface, lands in some edge cell.
#[instrument(skip(geometry, layout))]
pub fn map_click(event: PointerEvent, geometry: &SurfaceGeometry, layout: &GridLayout) -> GridPos {
    let scale_x = layout.extent() / geometry.width;
    let scale_y = layout.extent() / geometry.height;
    let x = (event.client_x - geometry.left) * scale_x;
    let y = (event.client_y - geometry.top) * scale_y;
    let pos = layout.cell_at(x, y);
    trace!(x, y, row = pos.row, col = pos.col, "Click mapped");
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_geometry() -> SurfaceGeometry {
        // On-screen size equals the surface extent: scale factor one.
        SurfaceGeometry::new(0.0, 0.0, 304.0, 304.0)
    }

    #[test]
    fn test_click_in_first_cell() {
        let pos = map_click(
            PointerEvent::new(55.0, 55.0),
            &unit_geometry(),
            &GridLayout::default(),
        );
        assert_eq!(pos, GridPos::new(0, 0));
        assert_eq!(pos.index(), 0);
    }

    #[test]
    fn test_click_scales_with_bounding_box() {
        // Surface displayed at half size: client (55, 55) is deep into the
        // board, cell (1, 1).
        let geometry = SurfaceGeometry::new(0.0, 0.0, 152.0, 152.0);
        let pos = map_click(
            PointerEvent::new(55.0, 55.0),
            &geometry,
            &GridLayout::default(),
        );
        assert_eq!(pos, GridPos::new(1, 1));
    }

    #[test]
    fn test_click_respects_bounding_offset() {
        let geometry = SurfaceGeometry::new(100.0, 200.0, 304.0, 304.0);
        let pos = map_click(
            PointerEvent::new(155.0, 255.0),
            &geometry,
            &GridLayout::default(),
        );
        assert_eq!(pos, GridPos::new(0, 0));
    }

    #[test]
    fn test_every_click_maps_in_range() {
        let geometry = SurfaceGeometry::new(10.0, 10.0, 200.0, 120.0);
        let layout = GridLayout::default();
        for step_x in -5..25 {
            for step_y in -5..25 {
                let event = PointerEvent::new(step_x as f64 * 17.0, step_y as f64 * 11.0);
                let pos = map_click(event, &geometry, &layout);
                assert!(pos.row < tactix_engine::BOARD_SIZE);
                assert!(pos.col < tactix_engine::BOARD_SIZE);
            }
        }
    }

    #[test]
    fn test_clicks_beyond_edges_land_in_edge_cells() {
        let geometry = unit_geometry();
        let layout = GridLayout::default();
        assert_eq!(
            map_click(PointerEvent::new(-50.0, 150.0), &geometry, &layout),
            GridPos::new(1, 0)
        );
        assert_eq!(
            map_click(PointerEvent::new(500.0, 500.0), &geometry, &layout),
            GridPos::new(2, 2)
        );
    }
}
