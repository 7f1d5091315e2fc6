//! The game controller: turn flow, click resolution, and the frame loop.

use std::time::Duration;

use derive_getters::Getters;
use tactix_engine::{EngineError, Player};
use tracing::{debug, info, instrument};

use crate::announce::{Announcer, RoundOutcome};
use crate::config::{ConfigState, FirstMover};
use crate::engine::{BoardEngine, EngineClient};
use crate::input::{ControlEvent, InputEvent, InputSource, PointerEvent, map_click};
use crate::layout::{GridLayout, GridPos};
use crate::render::Renderer;
use crate::run::StopHandle;
use crate::surface::{DrawSurface, SurfaceError};

/// Default pacing of the frame loop.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Error raised by the controller.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ControllerError {
    /// An engine capability call failed.
    #[display("engine call failed: {}", _0)]
    Engine(EngineError),
    /// The drawing surface or input source failed.
    #[display("surface failure: {}", _0)]
    Surface(SurfaceError),
}

/// What a single click amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The target cell was occupied; nothing changed.
    Rejected,
    /// A move pair (human then engine) was played and the round continues.
    Played(GridPos),
    /// The move pair finished the round; the board has been reset.
    RoundOver(RoundOutcome),
}

/// Single source of truth for turn flow and the round lifecycle.
///
/// Owns the engine client and the injected surface, input source, and
/// announcer, so it runs identically against a real frontend and against
/// recording fakes. One click resolves synchronously: validate, place the
/// human mark, hand the turn to the engine, re-check status. Rendering only
/// ever observes the board between those complete sequences.
#[derive(Debug, Getters)]
pub struct GameController<E, S, I, A> {
    #[getter(skip)]
    client: EngineClient<E>,
    #[getter(skip)]
    surface: S,
    #[getter(skip)]
    input: I,
    #[getter(skip)]
    announcer: A,
    #[getter(skip)]
    renderer: Renderer,
    /// Display and gameplay toggles.
    config: ConfigState,
    /// Whose mark the next move places; toggled by every accepted move.
    current_player: Player,
    /// Pacing of the frame loop.
    frame_interval: Duration,
}

impl<E, S, I, A> GameController<E, S, I, A>
where
    E: BoardEngine,
    S: DrawSurface,
    I: InputSource,
    A: Announcer,
{
    /// Creates a controller and starts the first round.
    ///
    /// Applies the configured difficulty, resets the board, and verifies the
    /// engine answers a snapshot before the loop ever runs; an engine that
    /// fails here aborts initialization with the underlying error.
    #[instrument(skip_all)]
    pub fn new(
        engine: E,
        surface: S,
        input: I,
        announcer: A,
        config: ConfigState,
    ) -> Result<Self, ControllerError> {
        let mut controller = Self {
            client: EngineClient::new(engine),
            surface,
            input,
            announcer,
            renderer: Renderer::new(GridLayout::default()),
            config,
            current_player: Player::One,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        };
        controller.client.set_difficulty(*controller.config.difficulty())?;
        controller.start_round()?;
        controller.client.snapshot()?;
        info!(
            difficulty = %controller.config.difficulty(),
            first_mover = controller.config.first_mover().label(),
            "Controller initialized"
        );
        Ok(controller)
    }

    /// Overrides the frame-loop pacing.
    pub fn set_frame_interval(&mut self, interval: Duration) {
        self.frame_interval = interval;
    }

    /// Resolves one click against the board.
    ///
    /// A click on an occupied cell is a silent no-op. Otherwise the human
    /// mark is written, the turn toggles, the engine plays for the opposing
    /// player, the turn toggles back, and the status decides whether the
    /// round ends. A finished round is announced and the board reset before
    /// this returns, so the controller always leaves ready for a click.
    #[instrument(skip(self))]
    pub fn handle_click(&mut self, event: PointerEvent) -> Result<ClickOutcome, ControllerError> {
        let geometry = self.surface.geometry();
        let pos = map_click(event, &geometry, self.renderer.layout());
        let index = pos.index();

        if !self.client.is_empty_cell(index)? {
            debug!(index, "Click on occupied cell ignored");
            return Ok(ClickOutcome::Rejected);
        }

        let mover = self.current_player;
        self.client.set_cell(index, mover)?;
        self.current_player = mover.opponent();
        debug!(index, mover = %mover, next = %self.current_player, "Human move accepted");

        self.engine_move()?;

        let status = self.client.game_status()?;
        if let Some(outcome) = RoundOutcome::from_status(status) {
            self.finish_round(outcome)?;
            return Ok(ClickOutcome::RoundOver(outcome));
        }
        Ok(ClickOutcome::Played(pos))
    }

    /// Applies a configuration control change.
    ///
    /// Difficulty reaches the engine without touching the board; a glyph
    /// swap redraws from a wiped surface; a first-mover change restarts the
    /// round under the new setting.
    #[instrument(skip(self))]
    pub fn handle_control(&mut self, control: ControlEvent) -> Result<(), ControllerError> {
        match control {
            ControlEvent::SetDifficulty(level) => {
                self.config.set_difficulty(level);
                self.client.set_difficulty(level)?;
            }
            ControlEvent::SwapGlyphs => {
                self.config.swap_glyphs();
                self.surface.clear()?;
            }
            ControlEvent::SetFirstMover(mover) => {
                self.config.set_first_mover(mover);
                self.start_round()?;
            }
            ControlEvent::NewRound => self.start_round()?,
        }
        Ok(())
    }

    /// Draws one frame from a fresh snapshot.
    #[instrument(skip(self))]
    pub fn render_frame(&mut self) -> Result<(), ControllerError> {
        let snapshot = self.client.snapshot()?;
        self.renderer
            .render(&mut self.surface, &snapshot, self.config.glyphs())?;
        self.surface.present()?;
        Ok(())
    }

    /// Runs the frame loop until a stop request or a quit input.
    ///
    /// Each iteration polls for at most one event, resolves it, and redraws
    /// from a fresh snapshot. The handle is re-checked before every frame,
    /// so teardown is bounded by one frame interval.
    #[instrument(skip_all)]
    pub fn run(&mut self, stop: &StopHandle) -> Result<(), ControllerError> {
        info!("Frame loop started");
        while !stop.is_stopped() {
            match self.input.poll(self.frame_interval)? {
                Some(InputEvent::Click(event)) => {
                    self.handle_click(event)?;
                }
                Some(InputEvent::Control(control)) => self.handle_control(control)?,
                Some(InputEvent::Quit) => {
                    info!("Quit input received");
                    break;
                }
                None => {}
            }
            self.render_frame()?;
        }
        info!("Frame loop ended");
        Ok(())
    }

    /// Restarts the round: empty board, wiped surface, human mark to move,
    /// and the engine's opening move when the AI goes first.
    #[instrument(skip(self))]
    fn start_round(&mut self) -> Result<(), ControllerError> {
        self.client.reset()?;
        self.surface.clear()?;
        self.current_player = Player::One;
        if *self.config.first_mover() == FirstMover::Ai {
            self.current_player = self.current_player.opponent();
            self.engine_move()?;
        }
        Ok(())
    }

    /// Requests one engine move for the current player and hands the turn
    /// back to the opposing side.
    fn engine_move(&mut self) -> Result<(), ControllerError> {
        let mover = self.current_player;
        self.client.make_next_valid_move(mover)?;
        self.current_player = mover.opponent();
        Ok(())
    }

    /// Announces a finished round and resets the board in place.
    ///
    /// The automatic reset never issues an opening move, whatever the
    /// first-mover setting: the next thing a frame sees is a fully empty
    /// board awaiting a click.
    #[instrument(skip(self))]
    fn finish_round(&mut self, outcome: RoundOutcome) -> Result<(), ControllerError> {
        info!(outcome = %outcome, "Round over");
        self.announcer.announce(outcome);
        self.client.reset()?;
        self.surface.clear()?;
        self.current_player = Player::One;
        Ok(())
    }
}
