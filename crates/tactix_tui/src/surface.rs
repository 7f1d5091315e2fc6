//! Terminal bindings for the controller seams.
//!
//! [`TerminalSurface`] paints the logical pixel space of the board onto a
//! ratatui canvas, [`TerminalInput`] turns crossterm events into controller
//! input, and [`StatusAnnouncer`] routes round announcements into the status
//! line. The canvas widget's screen rectangle doubles as the bounding
//! geometry, so terminal-cell clicks scale into logical pixels the same way
//! page clicks scale into a canvas.

use std::cell::RefCell;
use std::io::Stdout;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};
use tactix_core::{
    Announcer, ControlEvent, DrawSurface, FirstMover, GridLayout, InputEvent, InputSource,
    PointerEvent, RoundOutcome, SurfaceError, SurfaceGeometry,
};
use tactix_engine::DifficultyLevel;
use tracing::{debug, info, instrument};

/// Shared status-line state between the surface and the announcer.
pub type StatusLine = Rc<RefCell<Option<String>>>;

/// One buffered drawing primitive, replayed on present.
#[derive(Debug, Clone)]
enum Shape {
    Line { x0: f64, y0: f64, x1: f64, y1: f64 },
    Glyph { glyph: char, x: f64, y: f64 },
}

/// Ratatui-backed drawing surface.
///
/// Primitives accumulate per frame and are painted in one `terminal.draw`
/// call on present, with the vertical axis flipped into canvas orientation.
pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    shapes: Vec<Shape>,
    canvas_area: Option<Rect>,
    extent: f64,
    status: StatusLine,
}

impl TerminalSurface {
    /// Wraps a ready terminal, sharing `status` with the announcer.
    pub fn new(terminal: Terminal<CrosstermBackend<Stdout>>, status: StatusLine) -> Self {
        Self {
            terminal,
            shapes: Vec::new(),
            canvas_area: None,
            extent: GridLayout::default().extent(),
            status,
        }
    }

    /// Screen layout: board canvas, status line, help line.
    fn chunks(full: Rect) -> std::rc::Rc<[Rect]> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(9),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(full)
    }
}

impl DrawSurface for TerminalSurface {
    fn geometry(&self) -> SurfaceGeometry {
        match self.canvas_area {
            Some(area) => SurfaceGeometry::new(
                f64::from(area.x),
                f64::from(area.y),
                f64::from(area.width),
                f64::from(area.height),
            ),
            // Nothing rendered yet: pretend the surface fills its own
            // pixel space, a scale factor of one.
            None => SurfaceGeometry::new(0.0, 0.0, self.extent, self.extent),
        }
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.shapes.clear();
        self.terminal
            .clear()
            .map_err(|e| SurfaceError::new(format!("terminal clear failed: {}", e)))
    }

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<(), SurfaceError> {
        self.shapes.push(Shape::Line { x0, y0, x1, y1 });
        Ok(())
    }

    fn draw_glyph(&mut self, glyph: char, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.shapes.push(Shape::Glyph { glyph, x, y });
        Ok(())
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        let shapes = std::mem::take(&mut self.shapes);
        let status = self
            .status
            .borrow()
            .clone()
            .unwrap_or_else(|| "Round in progress - click a cell to move.".to_string());
        let extent = self.extent;

        let size = self
            .terminal
            .size()
            .map_err(|e| SurfaceError::new(format!("terminal size query failed: {}", e)))?;
        let chunks = Self::chunks(Rect::new(0, 0, size.width, size.height));
        self.canvas_area = Some(chunks[0]);

        self.terminal
            .draw(|frame| {
                let canvas = Canvas::default()
                    .marker(Marker::Braille)
                    .x_bounds([0.0, extent])
                    .y_bounds([0.0, extent])
                    .paint(|ctx| {
                        for shape in &shapes {
                            match shape {
                                Shape::Line { x0, y0, x1, y1 } => ctx.draw(&CanvasLine {
                                    x1: *x0,
                                    y1: extent - *y0,
                                    x2: *x1,
                                    y2: extent - *y1,
                                    color: Color::DarkGray,
                                }),
                                Shape::Glyph { glyph, x, y } => ctx.print(
                                    *x,
                                    extent - *y,
                                    ratatui::text::Line::styled(
                                        glyph.to_string(),
                                        Style::default()
                                            .fg(Color::Cyan)
                                            .add_modifier(Modifier::BOLD),
                                    ),
                                ),
                            }
                        }
                    });
                frame.render_widget(canvas, chunks[0]);

                let status = Paragraph::new(status.as_str())
                    .style(Style::default().fg(Color::Yellow))
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL).title("Status"));
                frame.render_widget(status, chunks[1]);

                let help = Paragraph::new(
                    "Click a cell to move | D: difficulty | S: swap symbols | F: first mover | R: new round | Q: quit",
                )
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
                frame.render_widget(help, chunks[2]);
            })
            .map_err(|e| SurfaceError::new(format!("terminal draw failed: {}", e)))?;
        Ok(())
    }
}

/// Crossterm-backed input source.
///
/// Holds the UI-side value of each control, the way the original page's
/// select elements did: cycling difficulty or toggling the first mover emits
/// the new concrete value for the controller to apply.
#[derive(Debug)]
pub struct TerminalInput {
    difficulty: DifficultyLevel,
    first_mover: FirstMover,
}

impl TerminalInput {
    /// Creates an input source seeded with the startup control values.
    pub fn new(difficulty: DifficultyLevel, first_mover: FirstMover) -> Self {
        Self {
            difficulty,
            first_mover,
        }
    }

    /// Maps a key press to an input event.
    fn translate_key(&mut self, key: KeyEvent) -> Option<InputEvent> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(InputEvent::Quit);
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(InputEvent::Quit),
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.difficulty = self.difficulty.cycle();
                debug!(level = %self.difficulty, "Difficulty control cycled");
                Some(InputEvent::Control(ControlEvent::SetDifficulty(
                    self.difficulty,
                )))
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                Some(InputEvent::Control(ControlEvent::SwapGlyphs))
            }
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.first_mover = self.first_mover.toggle();
                debug!(mover = self.first_mover.label(), "First-mover control toggled");
                Some(InputEvent::Control(ControlEvent::SetFirstMover(
                    self.first_mover,
                )))
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                Some(InputEvent::Control(ControlEvent::NewRound))
            }
            _ => None,
        }
    }

    /// Maps a mouse event to a click, in absolute terminal-cell coordinates.
    fn translate_mouse(mouse: MouseEvent) -> Option<InputEvent> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::Click(PointerEvent::new(
                f64::from(mouse.column),
                f64::from(mouse.row),
            ))),
            _ => None,
        }
    }
}

impl InputSource for TerminalInput {
    #[instrument(skip(self))]
    fn poll(&mut self, timeout: Duration) -> Result<Option<InputEvent>, SurfaceError> {
        if !event::poll(timeout)
            .map_err(|e| SurfaceError::new(format!("event poll failed: {}", e)))?
        {
            return Ok(None);
        }
        match event::read().map_err(|e| SurfaceError::new(format!("event read failed: {}", e)))? {
            Event::Key(key) => {
                // Crossterm fires both press and release.
                if key.kind == KeyEventKind::Release {
                    return Ok(None);
                }
                Ok(self.translate_key(key))
            }
            Event::Mouse(mouse) => Ok(Self::translate_mouse(mouse)),
            _ => Ok(None),
        }
    }
}

/// Announcer writing the round outcome into the shared status line.
#[derive(Debug, Clone)]
pub struct StatusAnnouncer {
    status: StatusLine,
}

impl StatusAnnouncer {
    /// Creates an announcer over the shared status line.
    pub fn new(status: StatusLine) -> Self {
        Self { status }
    }
}

impl Announcer for StatusAnnouncer {
    #[instrument(skip(self))]
    fn announce(&mut self, outcome: RoundOutcome) {
        info!(outcome = %outcome, "Announcing round outcome");
        *self.status.borrow_mut() = Some(format!("{} Starting a fresh round.", outcome.message()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        let mut input = TerminalInput::new(DifficultyLevel::Moderate, FirstMover::Human);
        assert_eq!(
            input.translate_key(press(KeyCode::Char('q'))),
            Some(InputEvent::Quit)
        );
        assert_eq!(input.translate_key(press(KeyCode::Esc)), Some(InputEvent::Quit));
        assert_eq!(
            input.translate_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputEvent::Quit)
        );
    }

    #[test]
    fn test_difficulty_key_cycles_levels() {
        let mut input = TerminalInput::new(DifficultyLevel::Moderate, FirstMover::Human);
        assert_eq!(
            input.translate_key(press(KeyCode::Char('d'))),
            Some(InputEvent::Control(ControlEvent::SetDifficulty(
                DifficultyLevel::Hard
            )))
        );
        assert_eq!(
            input.translate_key(press(KeyCode::Char('d'))),
            Some(InputEvent::Control(ControlEvent::SetDifficulty(
                DifficultyLevel::Easy
            )))
        );
    }

    #[test]
    fn test_first_mover_key_toggles() {
        let mut input = TerminalInput::new(DifficultyLevel::Moderate, FirstMover::Human);
        assert_eq!(
            input.translate_key(press(KeyCode::Char('f'))),
            Some(InputEvent::Control(ControlEvent::SetFirstMover(
                FirstMover::Ai
            )))
        );
        assert_eq!(
            input.translate_key(press(KeyCode::Char('f'))),
            Some(InputEvent::Control(ControlEvent::SetFirstMover(
                FirstMover::Human
            )))
        );
    }

    #[test]
    fn test_left_click_becomes_pointer_event() {
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 12,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            TerminalInput::translate_mouse(mouse),
            Some(InputEvent::Click(PointerEvent::new(12.0, 7.0)))
        );
    }

    #[test]
    fn test_other_mouse_activity_is_ignored() {
        let mouse = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 12,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(TerminalInput::translate_mouse(mouse), None);
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut input = TerminalInput::new(DifficultyLevel::Moderate, FirstMover::Human);
        assert_eq!(input.translate_key(press(KeyCode::Char('x'))), None);
        assert_eq!(input.translate_key(press(KeyCode::Enter)), None);
    }
}
