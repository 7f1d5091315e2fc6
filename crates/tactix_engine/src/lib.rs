//! tactix_engine - the board engine behind the tactix controller.
//!
//! Owns the authoritative cell storage for one 3x3 round, selects computer
//! moves at three difficulty levels, and tracks the round status. Clients
//! drive it through a handful of entry points ([`Board::reset`],
//! [`Board::set_cell`], [`Board::make_next_valid_move`],
//! [`Board::set_difficulty`]) and observe cells only as a copied byte
//! buffer ([`Board::raw_cells`]).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod cell;
mod strategy;

pub use board::{BOARD_SIZE, Board, CELL_COUNT, EngineError};
pub use cell::{Cell, DifficultyLevel, GameStatus, Player};
