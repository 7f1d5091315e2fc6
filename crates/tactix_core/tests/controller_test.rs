//! Controller state-machine tests against scripted and real engines.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use tactix_core::{
    Announcer, BoardEngine, ClickOutcome, ConfigState, ControlEvent, ControllerError,
    DrawSurface, FirstMover, GameController, GlyphAssignment, GridLayout, GridPos, InputEvent,
    InputSource, PointerEvent, RoundOutcome, StopHandle, SurfaceError, SurfaceGeometry,
};
use tactix_engine::{
    Board, CELL_COUNT, Cell, DifficultyLevel, EngineError, GameStatus, Player,
};

/// One scripted engine response to a move request.
#[derive(Debug, Clone, Copy)]
enum EnginePlay {
    /// Place the mover's mark at the index, then report the status.
    Place(usize, GameStatus),
    /// Play nothing, just report the status.
    Pass(GameStatus),
}

#[derive(Debug)]
struct ScriptState {
    cells: [u8; CELL_COUNT],
    status: GameStatus,
    plan: VecDeque<EnginePlay>,
    moves_for: Vec<Player>,
    difficulties: Vec<DifficultyLevel>,
    resets: usize,
}

/// Fully scripted engine: move requests consume a fixed plan, so tests
/// control every board transition.
#[derive(Debug, Clone)]
struct ScriptedEngine {
    inner: Rc<RefCell<ScriptState>>,
}

impl ScriptedEngine {
    fn with_plan(plan: &[EnginePlay]) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ScriptState {
                cells: [0; CELL_COUNT],
                status: GameStatus::InProgress,
                plan: plan.iter().copied().collect(),
                moves_for: Vec::new(),
                difficulties: Vec::new(),
                resets: 0,
            })),
        }
    }

    fn push_plan(&self, play: EnginePlay) {
        self.inner.borrow_mut().plan.push_back(play);
    }

    fn cells(&self) -> [u8; CELL_COUNT] {
        self.inner.borrow().cells
    }

    fn moves_for(&self) -> Vec<Player> {
        self.inner.borrow().moves_for.clone()
    }

    fn difficulties(&self) -> Vec<DifficultyLevel> {
        self.inner.borrow().difficulties.clone()
    }

    fn resets(&self) -> usize {
        self.inner.borrow().resets
    }
}

impl BoardEngine for ScriptedEngine {
    fn reset(&mut self) -> Result<(), EngineError> {
        let mut state = self.inner.borrow_mut();
        state.cells = [0; CELL_COUNT];
        state.status = GameStatus::InProgress;
        state.resets += 1;
        Ok(())
    }

    fn is_empty_cell(&self, index: usize) -> Result<bool, EngineError> {
        let state = self.inner.borrow();
        state
            .cells
            .get(index)
            .map(|byte| *byte == 0)
            .ok_or(EngineError::IndexOutOfBounds(index))
    }

    fn set_cell(&mut self, index: usize, player: Player) -> Result<(), EngineError> {
        let mut state = self.inner.borrow_mut();
        if index >= CELL_COUNT {
            return Err(EngineError::IndexOutOfBounds(index));
        }
        state.cells[index] = player.cell().to_byte();
        Ok(())
    }

    fn make_next_valid_move(&mut self, player: Player) -> Result<(), EngineError> {
        let mut state = self.inner.borrow_mut();
        state.moves_for.push(player);
        match state.plan.pop_front() {
            Some(EnginePlay::Place(index, status)) => {
                state.cells[index] = player.cell().to_byte();
                state.status = status;
            }
            Some(EnginePlay::Pass(status)) => state.status = status,
            None => {}
        }
        Ok(())
    }

    fn game_status(&self) -> Result<GameStatus, EngineError> {
        Ok(self.inner.borrow().status)
    }

    fn set_difficulty(&mut self, level: DifficultyLevel) -> Result<(), EngineError> {
        self.inner.borrow_mut().difficulties.push(level);
        Ok(())
    }

    fn raw_cells(&self) -> Result<[u8; CELL_COUNT], EngineError> {
        Ok(self.inner.borrow().cells)
    }
}

/// Engine whose every call fails; exercises the fatal startup path.
#[derive(Debug)]
struct FailingEngine;

impl BoardEngine for FailingEngine {
    fn reset(&mut self) -> Result<(), EngineError> {
        Err(EngineError::IndexOutOfBounds(0))
    }

    fn is_empty_cell(&self, index: usize) -> Result<bool, EngineError> {
        Err(EngineError::IndexOutOfBounds(index))
    }

    fn set_cell(&mut self, index: usize, _player: Player) -> Result<(), EngineError> {
        Err(EngineError::IndexOutOfBounds(index))
    }

    fn make_next_valid_move(&mut self, _player: Player) -> Result<(), EngineError> {
        Err(EngineError::IndexOutOfBounds(0))
    }

    fn game_status(&self) -> Result<GameStatus, EngineError> {
        Err(EngineError::IndexOutOfBounds(0))
    }

    fn set_difficulty(&mut self, _level: DifficultyLevel) -> Result<(), EngineError> {
        Err(EngineError::IndexOutOfBounds(0))
    }

    fn raw_cells(&self) -> Result<[u8; CELL_COUNT], EngineError> {
        Err(EngineError::IndexOutOfBounds(0))
    }
}

#[derive(Debug, Default)]
struct SurfaceLog {
    clears: usize,
    presents: usize,
    lines: usize,
    glyphs: Vec<(char, f64, f64)>,
}

/// Recording surface with a configurable on-screen size.
#[derive(Debug, Clone)]
struct FakeSurface {
    geometry: SurfaceGeometry,
    log: Rc<RefCell<SurfaceLog>>,
}

impl FakeSurface {
    fn unit() -> Self {
        Self::sized(304.0, 304.0)
    }

    fn sized(width: f64, height: f64) -> Self {
        Self {
            geometry: SurfaceGeometry::new(0.0, 0.0, width, height),
            log: Rc::new(RefCell::new(SurfaceLog::default())),
        }
    }

    fn clears(&self) -> usize {
        self.log.borrow().clears
    }

    fn presents(&self) -> usize {
        self.log.borrow().presents
    }
}

impl DrawSurface for FakeSurface {
    fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.log.borrow_mut().clears += 1;
        Ok(())
    }

    fn draw_line(&mut self, _x0: f64, _y0: f64, _x1: f64, _y1: f64) -> Result<(), SurfaceError> {
        self.log.borrow_mut().lines += 1;
        Ok(())
    }

    fn draw_glyph(&mut self, glyph: char, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.log.borrow_mut().glyphs.push((glyph, x, y));
        Ok(())
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        self.log.borrow_mut().presents += 1;
        Ok(())
    }
}

/// Input source that replays a fixed script, then quits.
#[derive(Debug)]
struct ScriptedInput {
    events: VecDeque<InputEvent>,
}

impl ScriptedInput {
    fn new(events: &[InputEvent]) -> Self {
        Self {
            events: events.iter().copied().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _timeout: Duration) -> Result<Option<InputEvent>, SurfaceError> {
        Ok(Some(self.events.pop_front().unwrap_or(InputEvent::Quit)))
    }
}

/// Input source that never produces an event.
#[derive(Debug)]
struct IdleInput;

impl InputSource for IdleInput {
    fn poll(&mut self, _timeout: Duration) -> Result<Option<InputEvent>, SurfaceError> {
        Ok(None)
    }
}

/// Announcer that records every outcome it is handed.
#[derive(Debug, Clone, Default)]
struct FakeAnnouncer {
    outcomes: Rc<RefCell<Vec<RoundOutcome>>>,
}

impl FakeAnnouncer {
    fn outcomes(&self) -> Vec<RoundOutcome> {
        self.outcomes.borrow().clone()
    }
}

impl Announcer for FakeAnnouncer {
    fn announce(&mut self, outcome: RoundOutcome) {
        self.outcomes.borrow_mut().push(outcome);
    }
}

/// Pointer event at the center of a cell under a 1:1 surface.
fn click_at(pos: GridPos) -> PointerEvent {
    let (x, y) = GridLayout::default().cell_center(pos);
    PointerEvent::new(x, y)
}

type ScriptedController =
    GameController<ScriptedEngine, FakeSurface, IdleInput, FakeAnnouncer>;

fn scripted_controller(
    plan: &[EnginePlay],
    config: ConfigState,
) -> (ScriptedController, ScriptedEngine, FakeSurface, FakeAnnouncer) {
    let engine = ScriptedEngine::with_plan(plan);
    let surface = FakeSurface::unit();
    let announcer = FakeAnnouncer::default();
    let controller = GameController::new(
        engine.clone(),
        surface.clone(),
        IdleInput,
        announcer.clone(),
        config,
    )
    .expect("controller construction");
    (controller, engine, surface, announcer)
}

#[test]
fn test_click_places_mark_and_requests_opposing_move() {
    let (mut controller, engine, _surface, _announcer) = scripted_controller(
        &[EnginePlay::Place(4, GameStatus::InProgress)],
        ConfigState::default(),
    );

    let outcome = controller.handle_click(PointerEvent::new(55.0, 55.0)).unwrap();
    assert_eq!(outcome, ClickOutcome::Played(GridPos::new(0, 0)));

    let cells = engine.cells();
    assert_eq!(cells[0], Cell::PlayerOne.to_byte());
    assert_eq!(cells[4], Cell::PlayerTwo.to_byte());
    // The engine was asked to move for the opposite of the clicker, and the
    // turn came back to player one afterwards.
    assert_eq!(engine.moves_for(), vec![Player::Two]);
    assert_eq!(*controller.current_player(), Player::One);
}

#[test]
fn test_click_on_occupied_cell_is_silent_no_op() {
    let (mut controller, engine, _surface, _announcer) = scripted_controller(
        &[EnginePlay::Place(4, GameStatus::InProgress)],
        ConfigState::default(),
    );

    controller.handle_click(click_at(GridPos::new(0, 0))).unwrap();
    let before = engine.cells();

    let outcome = controller.handle_click(click_at(GridPos::new(0, 0))).unwrap();
    assert_eq!(outcome, ClickOutcome::Rejected);
    assert_eq!(engine.cells(), before);
    assert_eq!(engine.moves_for().len(), 1);
    assert_eq!(*controller.current_player(), Player::One);
}

#[test]
fn test_click_scales_through_surface_geometry() {
    // The surface is displayed at half its pixel extent, so client (55, 55)
    // lands in the center cell.
    let engine = ScriptedEngine::with_plan(&[EnginePlay::Place(8, GameStatus::InProgress)]);
    let surface = FakeSurface::sized(152.0, 152.0);
    let mut controller = GameController::new(
        engine.clone(),
        surface,
        IdleInput,
        FakeAnnouncer::default(),
        ConfigState::default(),
    )
    .unwrap();

    let outcome = controller.handle_click(PointerEvent::new(55.0, 55.0)).unwrap();
    assert_eq!(outcome, ClickOutcome::Played(GridPos::new(1, 1)));
    assert_eq!(engine.cells()[4], Cell::PlayerOne.to_byte());
}

#[test]
fn test_losing_round_is_announced_and_reset() {
    let (mut controller, engine, surface, announcer) = scripted_controller(
        &[EnginePlay::Place(4, GameStatus::Computer)],
        ConfigState::default(),
    );
    let clears_before = surface.clears();

    let outcome = controller.handle_click(click_at(GridPos::new(0, 0))).unwrap();
    assert_eq!(outcome, ClickOutcome::RoundOver(RoundOutcome::ComputerWin));
    assert_eq!(announcer.outcomes(), vec![RoundOutcome::ComputerWin]);
    // Announce, then reset in place: empty board, wiped surface, human turn.
    assert_eq!(engine.cells(), [0u8; CELL_COUNT]);
    assert_eq!(surface.clears(), clears_before + 1);
    assert_eq!(*controller.current_player(), Player::One);
}

#[test]
fn test_draw_leaves_fully_empty_board() {
    let (mut controller, engine, _surface, announcer) = scripted_controller(
        &[EnginePlay::Pass(GameStatus::Draw)],
        ConfigState::default(),
    );

    let outcome = controller.handle_click(click_at(GridPos::new(1, 1))).unwrap();
    assert_eq!(outcome, ClickOutcome::RoundOver(RoundOutcome::Draw));
    assert_eq!(announcer.outcomes(), vec![RoundOutcome::Draw]);
    assert_eq!(engine.cells(), [0u8; CELL_COUNT]);
    assert_eq!(*controller.current_player(), Player::One);
}

#[test]
fn test_ai_first_mover_opens_with_one_mark() {
    let config = ConfigState::new(
        DifficultyLevel::default(),
        GlyphAssignment::default(),
        FirstMover::Ai,
    );
    let (controller, engine, _surface, _announcer) =
        scripted_controller(&[EnginePlay::Place(0, GameStatus::InProgress)], config);

    let cells = engine.cells();
    let occupied: Vec<usize> = (0..CELL_COUNT).filter(|i| cells[*i] != 0).collect();
    assert_eq!(occupied, vec![0]);
    assert_eq!(cells[0], Cell::PlayerTwo.to_byte());
    assert_eq!(engine.moves_for(), vec![Player::Two]);
    assert_eq!(*controller.current_player(), Player::One);
}

#[test]
fn test_first_mover_change_resets_and_replays_opening() {
    let (mut controller, engine, _surface, _announcer) = scripted_controller(
        &[EnginePlay::Place(4, GameStatus::InProgress)],
        ConfigState::default(),
    );
    controller.handle_click(click_at(GridPos::new(0, 0))).unwrap();
    assert_eq!(engine.cells()[0], Cell::PlayerOne.to_byte());

    engine.push_plan(EnginePlay::Place(8, GameStatus::InProgress));
    controller
        .handle_control(ControlEvent::SetFirstMover(FirstMover::Ai))
        .unwrap();

    let cells = engine.cells();
    let occupied: Vec<usize> = (0..CELL_COUNT).filter(|i| cells[*i] != 0).collect();
    assert_eq!(occupied, vec![8]);
    assert_eq!(cells[8], Cell::PlayerTwo.to_byte());
    assert_eq!(*controller.config().first_mover(), FirstMover::Ai);
}

#[test]
fn test_difficulty_change_reaches_engine_without_touching_cells() {
    let (mut controller, engine, _surface, _announcer) = scripted_controller(
        &[EnginePlay::Place(4, GameStatus::InProgress)],
        ConfigState::default(),
    );
    controller.handle_click(click_at(GridPos::new(0, 0))).unwrap();
    let before = engine.cells();

    controller
        .handle_control(ControlEvent::SetDifficulty(DifficultyLevel::Hard))
        .unwrap();
    assert_eq!(engine.cells(), before);
    assert!(engine.difficulties().contains(&DifficultyLevel::Hard));
    assert_eq!(*controller.config().difficulty(), DifficultyLevel::Hard);
    assert_eq!(engine.resets(), 1);
}

#[test]
fn test_glyph_swap_clears_surface_but_not_board() {
    let (mut controller, engine, surface, _announcer) = scripted_controller(
        &[EnginePlay::Place(4, GameStatus::InProgress)],
        ConfigState::default(),
    );
    controller.handle_click(click_at(GridPos::new(0, 0))).unwrap();
    let before = engine.cells();
    let clears_before = surface.clears();

    controller.handle_control(ControlEvent::SwapGlyphs).unwrap();
    assert_eq!(engine.cells(), before);
    assert_eq!(surface.clears(), clears_before + 1);
    assert_eq!(
        controller.config().glyphs().glyph_for(Cell::PlayerOne),
        Some('o')
    );
}

#[test]
fn test_run_loop_ends_on_quit_event() {
    let engine = ScriptedEngine::with_plan(&[EnginePlay::Place(4, GameStatus::InProgress)]);
    let surface = FakeSurface::unit();
    let input = ScriptedInput::new(&[
        InputEvent::Click(PointerEvent::new(55.0, 55.0)),
        InputEvent::Control(ControlEvent::SwapGlyphs),
        InputEvent::Quit,
    ]);
    let mut controller = GameController::new(
        engine.clone(),
        surface.clone(),
        input,
        FakeAnnouncer::default(),
        ConfigState::default(),
    )
    .unwrap();
    controller.set_frame_interval(Duration::from_millis(1));

    let stop = StopHandle::new();
    controller.run(&stop).unwrap();
    // One frame per handled event before the quit.
    assert_eq!(surface.presents(), 2);
    assert_eq!(engine.cells()[0], Cell::PlayerOne.to_byte());
}

#[test]
fn test_run_loop_honors_stop_handle() {
    let engine = ScriptedEngine::with_plan(&[]);
    let surface = FakeSurface::unit();
    let mut controller = GameController::new(
        engine,
        surface.clone(),
        IdleInput,
        FakeAnnouncer::default(),
        ConfigState::default(),
    )
    .unwrap();

    let stop = StopHandle::new();
    stop.stop();
    controller.run(&stop).unwrap();
    assert_eq!(surface.presents(), 0);
}

#[test]
fn test_engine_failure_aborts_initialization() {
    let result = GameController::new(
        FailingEngine,
        FakeSurface::unit(),
        IdleInput,
        FakeAnnouncer::default(),
        ConfigState::default(),
    );
    assert!(matches!(result, Err(ControllerError::Engine(_))));
}

#[test]
fn test_full_round_against_real_engine() {
    // Drive the bundled engine through the controller by clicking cell
    // centers until the round ends; whatever the engine plays, the round
    // finishes within the board and resets to empty.
    let surface = FakeSurface::unit();
    let announcer = FakeAnnouncer::default();
    let mut controller = GameController::new(
        Board::new(),
        surface,
        IdleInput,
        announcer.clone(),
        ConfigState::default(),
    )
    .unwrap();

    let mut finished = None;
    'rounds: for _attempt in 0..CELL_COUNT {
        for index in 0..CELL_COUNT {
            let pos = GridPos::new(index / 3, index % 3);
            match controller.handle_click(click_at(pos)).unwrap() {
                ClickOutcome::RoundOver(outcome) => {
                    finished = Some(outcome);
                    break 'rounds;
                }
                ClickOutcome::Played(_) | ClickOutcome::Rejected => {}
            }
        }
    }

    let outcome = finished.expect("a 3x3 round always terminates");
    assert_eq!(announcer.outcomes(), vec![outcome]);
    assert_eq!(*controller.current_player(), Player::One);
}
