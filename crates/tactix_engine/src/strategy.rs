//! Move selection strategies, one per difficulty level.
//!
//! Strategies are pure functions over position sets: the mover's cells, the
//! opposing cells, and the empty cells, all as raw board indices. Storage
//! and status bookkeeping stay in [`Board`](crate::Board).

use std::collections::BTreeSet;

use rand::Rng;
use tracing::{debug, instrument};

use crate::board::CELL_COUNT;
use crate::cell::DifficultyLevel;

/// The eight winning lines of the 3x3 board, as raw indices.
pub(crate) const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Whether the given positions contain a complete winning line.
pub(crate) fn has_winning_line(positions: &BTreeSet<usize>) -> bool {
    WINNING_LINES
        .iter()
        .any(|line| line.iter().all(|index| positions.contains(index)))
}

/// Selects the next move for the configured difficulty.
///
/// `empty` must be non-empty; callers check for a full board first.
#[instrument(skip(own, opponent, empty), fields(level = %level, open = empty.len()))]
pub(crate) fn select_move(
    level: DifficultyLevel,
    own: &BTreeSet<usize>,
    opponent: &BTreeSet<usize>,
    empty: &BTreeSet<usize>,
) -> usize {
    let index = match level {
        DifficultyLevel::Easy => random_cell(empty),
        DifficultyLevel::Moderate => moderate_move(own, opponent, empty),
        DifficultyLevel::Hard => hard_move(own, opponent, empty),
    };
    debug!(index, "Move selected");
    index
}

/// Uniform random choice among the empty cells.
fn random_cell(empty: &BTreeSet<usize>) -> usize {
    let choices: Vec<usize> = empty.iter().copied().collect();
    choices[rand::thread_rng().gen_range(0..choices.len())]
}

/// Completes the mover's own winning line if one move away, otherwise blocks
/// the opponent's, otherwise plays a random empty cell.
fn moderate_move(
    own: &BTreeSet<usize>,
    opponent: &BTreeSet<usize>,
    empty: &BTreeSet<usize>,
) -> usize {
    for line in &WINNING_LINES {
        if let Some(index) = completing_cell(own, empty, line) {
            return index;
        }
    }
    for line in &WINNING_LINES {
        if let Some(index) = completing_cell(opponent, empty, line) {
            return index;
        }
    }
    random_cell(empty)
}

/// The single empty cell finishing `line` for `positions`, if the other two
/// cells of the line are already held.
fn completing_cell(
    positions: &BTreeSet<usize>,
    empty: &BTreeSet<usize>,
    line: &[usize; 3],
) -> Option<usize> {
    let held = line.iter().filter(|index| positions.contains(index)).count();
    let mut open = line.iter().copied().filter(|index| empty.contains(index));
    match (held, open.next(), open.next()) {
        (2, Some(index), None) => Some(index),
        _ => None,
    }
}

/// Minimax over the remaining cells, maximizing for the mover.
///
/// An empty board carries no information to search on, so the opening move
/// is random.
fn hard_move(
    own: &BTreeSet<usize>,
    opponent: &BTreeSet<usize>,
    empty: &BTreeSet<usize>,
) -> usize {
    if empty.len() == CELL_COUNT {
        return random_cell(empty);
    }

    let mut own_probe = own.clone();
    let mut opponent_probe = opponent.clone();
    let mut empty_probe = empty.clone();

    let mut best_score = i32::MIN;
    let mut best_index = None;
    for index in empty.iter().copied() {
        own_probe.insert(index);
        empty_probe.remove(&index);
        let score = minimax(&mut own_probe, &mut opponent_probe, &mut empty_probe, false);
        own_probe.remove(&index);
        empty_probe.insert(index);
        if score > best_score {
            best_score = score;
            best_index = Some(index);
        }
    }
    best_index.unwrap_or_else(|| random_cell(empty))
}

/// Scores the position for the maximizing side: +10 for a maximizer win,
/// -10 for a minimizer win, 0 for a draw.
fn minimax(
    own: &mut BTreeSet<usize>,
    opponent: &mut BTreeSet<usize>,
    empty: &mut BTreeSet<usize>,
    maximizing: bool,
) -> i32 {
    if has_winning_line(own) {
        return 10;
    }
    if has_winning_line(opponent) {
        return -10;
    }
    if empty.is_empty() {
        return 0;
    }

    let candidates: Vec<usize> = empty.iter().copied().collect();
    if maximizing {
        let mut best = i32::MIN;
        for index in candidates {
            own.insert(index);
            empty.remove(&index);
            best = best.max(minimax(own, opponent, empty, false));
            own.remove(&index);
            empty.insert(index);
        }
        best
    } else {
        let mut best = i32::MAX;
        for index in candidates {
            opponent.insert(index);
            empty.remove(&index);
            best = best.min(minimax(own, opponent, empty, true));
            opponent.remove(&index);
            empty.insert(index);
        }
        best
    }
}
