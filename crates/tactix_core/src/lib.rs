//! tactix_core - the interactive controller for a grid board game.
//!
//! The controller owns turn flow and the round lifecycle; everything it
//! touches at the edges is injected: the board engine behind the
//! [`BoardEngine`] capability trait, the frontend behind [`DrawSurface`] and
//! [`InputSource`], and announcements behind [`Announcer`]. That keeps the
//! whole state machine runnable against recording fakes, with the terminal
//! frontend as just one concrete binding.
//!
//! # Architecture
//!
//! - [`GameController`] - turn alternation, click resolution, config
//!   transitions, and the cancellable frame loop.
//! - [`EngineClient`] - thin adapter over the engine capability interface;
//!   turns raw cell buffers into decoded [`BoardSnapshot`]s per frame.
//! - [`map_click`] - pure pointer-to-cell mapping with bounds clamping.
//! - [`Renderer`] - grid and glyph drawing from a snapshot.
//! - [`ConfigState`] - difficulty, glyph assignment, and first-mover
//!   toggles; reset policy stays with the controller.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod announce;
mod config;
mod controller;
mod engine;
mod input;
mod layout;
mod render;
mod run;
mod surface;

pub use announce::{Announcer, RoundOutcome};
pub use config::{ConfigState, FirstMover, GlyphAssignment};
pub use controller::{
    ClickOutcome, ControllerError, DEFAULT_FRAME_INTERVAL, GameController,
};
pub use engine::{BoardEngine, BoardSnapshot, EngineClient};
pub use input::{ControlEvent, InputEvent, InputSource, PointerEvent, map_click};
pub use layout::{CELL_PITCH, GridLayout, GridPos};
pub use render::Renderer;
pub use run::StopHandle;
pub use surface::{DrawSurface, SurfaceError, SurfaceGeometry};
