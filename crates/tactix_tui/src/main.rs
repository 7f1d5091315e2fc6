//! Terminal frontend for tactix.
//!
//! Wires the bundled board engine and the terminal bindings into the game
//! controller, then hands control to the frame loop until the player quits.

#![warn(missing_docs)]

mod display_config;
mod surface;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tactix_core::{GameController, StopHandle};
use tactix_engine::Board;
use tracing::{error, info};

use display_config::DisplayConfig;
use surface::{StatusAnnouncer, TerminalInput, TerminalSurface};

/// Play tactix in the terminal against the board engine.
#[derive(Parser, Debug)]
#[command(name = "tactix")]
#[command(about = "Grid board game with mouse input and an engine opponent", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the display configuration file.
    #[arg(short, long, default_value = "tactix.toml")]
    config: std::path::PathBuf,

    /// Log file path; the TUI keeps stdout clean.
    #[arg(long, default_value = "tactix_tui.log")]
    log_file: std::path::PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to file so tracing output never tears the alternate screen.
    let log_file = std::fs::File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!("Starting tactix TUI");

    let config = DisplayConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    let status = Rc::new(RefCell::new(None));
    let tui_surface = TerminalSurface::new(terminal, status.clone());
    let input = TerminalInput::new(*config.difficulty(), *config.first_mover());
    let announcer = StatusAnnouncer::new(status);

    let mut controller = match GameController::new(
        Board::new(),
        tui_surface,
        input,
        announcer,
        config.to_config_state(),
    ) {
        Ok(controller) => controller,
        Err(e) => {
            error!(error = %e, "Engine unavailable at startup");
            restore_terminal()?;
            return Err(anyhow::Error::new(e).context("Game initialization failed"));
        }
    };
    controller.set_frame_interval(config.frame_interval());

    let stop = StopHandle::new();
    let res = controller.run(&stop);

    restore_terminal()?;

    if let Err(err) = res {
        error!(error = %err, "Frame loop error");
        return Err(anyhow::Error::new(err).context("Frame loop failed"));
    }

    info!("tactix TUI exited cleanly");
    Ok(())
}

/// Returns the terminal to its normal state after the alternate screen.
fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    )?;
    Ok(())
}
