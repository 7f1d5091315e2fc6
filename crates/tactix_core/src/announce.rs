//! Terminal-state announcements, the one user-facing output besides the board.

use derive_more::Display;
use tactix_engine::GameStatus;

/// How a finished round ended, from the human's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RoundOutcome {
    /// The human side completed a line.
    #[display("human win")]
    HumanWin,
    /// The computer side completed a line.
    #[display("computer win")]
    ComputerWin,
    /// The board filled with no winner.
    #[display("draw")]
    Draw,
}

impl RoundOutcome {
    /// The outcome for a terminal status, `None` while the round is live.
    pub fn from_status(status: GameStatus) -> Option<Self> {
        match status {
            GameStatus::InProgress => None,
            GameStatus::Human => Some(RoundOutcome::HumanWin),
            GameStatus::Computer => Some(RoundOutcome::ComputerWin),
            GameStatus::Draw => Some(RoundOutcome::Draw),
        }
    }

    /// The announcement text shown to the player.
    pub fn message(self) -> &'static str {
        match self {
            RoundOutcome::HumanWin => "You are the winner!!",
            RoundOutcome::ComputerWin => "You lost!!",
            RoundOutcome::Draw => "Game is a draw!!",
        }
    }
}

/// Sink for round-over announcements, injected into the controller.
pub trait Announcer {
    /// Reports that the round just ended with `outcome`.
    fn announce(&mut self, outcome: RoundOutcome);
}
