//! Move execution
//!
//! Advances a session by one player move: slide and merge every line, spawn a
//! tile if anything changed, then check for a terminal state.

use rand::Rng;

use super::merge::merge_line;
use super::spawn::spawn_random_tile;
use super::state::{CellHint, Direction, Session, Tile};
use crate::error::{EngineError, Result};

/// What happened to one line during a move
#[derive(Debug, Clone, Copy, Default)]
struct LineReport {
    moved: bool,
    gain: u64,
    reached_target: bool,
}

/// Execute a move in `direction`.
///
/// Returns whether any tile moved or merged. A move that changes nothing
/// spawns nothing. The winning move ends the game without spawning.
///
/// # Errors
///
/// `InvalidState` if the session is not valid, no longer running, or the
/// score would overflow; the session is not modified in those cases.
pub fn move_tiles<R: Rng + ?Sized>(
    session: &mut Session,
    direction: Direction,
    rng: &mut R,
) -> Result<bool> {
    if !session.is_valid {
        log::warn!("Move {direction} rejected: session not valid");
        return Err(EngineError::InvalidState("session is not valid"));
    }
    if !session.is_running {
        log::warn!("Move {direction} rejected: game is over");
        return Err(EngineError::InvalidState("session is not running"));
    }

    // Played on a copy so a failed move leaves the session untouched
    let mut next = session.clone();
    let moved = apply_move(&mut next, direction, rng)?;
    *session = next;
    Ok(moved)
}

fn apply_move<R: Rng + ?Sized>(
    session: &mut Session,
    direction: Direction,
    rng: &mut R,
) -> Result<bool> {
    session.last_score_increase = 0;
    session.clear_hints();

    let mut moved = false;
    let mut reached_target = false;
    for index in 0..session.size {
        let report = slide_line(session, direction, index);
        moved |= report.moved;
        reached_target |= report.reached_target;
        session.last_score_increase += report.gain;
    }
    session.score = session
        .score
        .checked_add(session.last_score_increase)
        .ok_or_else(|| {
            log::warn!("Move {direction} rejected: score overflow");
            EngineError::InvalidState("score would overflow")
        })?;

    log::debug!(
        "Move {direction}: moved={moved}, gain={}, score={}",
        session.last_score_increase,
        session.score
    );

    if reached_target {
        session.target_reached = true;
        session.is_running = false;
        log::info!("Target reached with score {}", session.score);
        return Ok(true);
    }

    if moved {
        spawn_random_tile(session, rng);
    }

    if session.grid.is_full() && !session.grid.has_adjacent_pair() {
        session.is_running = false;
        log::info!("No moves left, final score {}", session.score);
    }

    Ok(moved)
}

/// Slide and merge line `index`, writing the result back into the grid
fn slide_line(session: &mut Session, direction: Direction, index: usize) -> LineReport {
    let cells: Vec<(usize, usize)> = direction.line_cells(session.size, index).collect();
    let before: Vec<Tile> = cells.iter().map(|&(x, y)| session.grid.tile(x, y)).collect();

    let occupied: Vec<Tile> = before.iter().copied().filter(|t| !t.is_empty()).collect();
    let mut empties = before.iter().copied().filter(Tile::is_empty);
    let line = merge_line(&occupied);

    let mut moved = false;
    for (k, &(x, y)) in cells.iter().enumerate() {
        let tile = match line.tiles.get(k) {
            Some(&tile) => {
                if line.merged[k] {
                    session.set_hint(x, y, CellHint::Merged);
                }
                tile
            }
            // Cells vacated by a merge get a fresh identity
            None => match empties.next() {
                Some(empty) => empty,
                None => Tile::empty(session.next_tile_id()),
            },
        };
        if tile.value != before[k].value {
            moved = true;
        }
        session.grid.set(x, y, tile);
    }

    LineReport {
        moved,
        gain: line.gain,
        reached_target: line.reached_target,
    }
}

/// Whether any line would change if `direction` were played
pub(super) fn would_change(session: &Session, direction: Direction) -> bool {
    (0..session.size).any(|index| {
        let values: Vec<u32> = direction
            .line_cells(session.size, index)
            .map(|(x, y)| session.grid.value(x, y))
            .collect();
        let occupied: Vec<Tile> = values
            .iter()
            .filter(|&&v| v != 0)
            .map(|&value| Tile { value, id: 0 })
            .collect();
        let line = merge_line(&occupied);
        values
            .iter()
            .enumerate()
            .any(|(k, &v)| v != line.tiles.get(k).map(|t| t.value).unwrap_or(0))
    })
}
