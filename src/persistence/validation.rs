//! Structural checks applied before a stored session is adopted
//!
//! Only the shape is checked: board size, grid dimensions, tile values and
//! identity bookkeeping. Flags are trusted as stored; score and the identity
//! counter only need to leave headroom for further play.

use std::collections::HashSet;

use crate::consts::{MAX_SIZE, MAX_STORED_COUNTER, MAX_TILE_VALUE, MIN_SIZE};
use crate::error::{EngineError, Result};
use crate::sim::Session;

pub fn validate_session(session: &Session) -> Result<()> {
    let size = session.size();
    if !crate::is_valid_size(size) {
        return Err(EngineError::invalid_argument(format!(
            "stored board size {size} outside [{MIN_SIZE}, {MAX_SIZE}]"
        )));
    }

    if session.next_identity() > MAX_STORED_COUNTER {
        return Err(EngineError::invalid_argument(format!(
            "identity counter {} exceeds {MAX_STORED_COUNTER}",
            session.next_identity()
        )));
    }
    if session.score() > MAX_STORED_COUNTER {
        return Err(EngineError::invalid_argument(format!(
            "stored score {} exceeds {MAX_STORED_COUNTER}",
            session.score()
        )));
    }

    let rows = session.grid().rows();
    if rows.len() != size {
        return Err(EngineError::invalid_argument(format!(
            "grid has {} rows, expected {size}",
            rows.len()
        )));
    }

    let mut ids = HashSet::with_capacity(size * size);
    for (y, row) in rows.iter().enumerate() {
        if row.len() != size {
            return Err(EngineError::invalid_argument(format!(
                "grid row {y} has {} cells, expected {size}",
                row.len()
            )));
        }
        for (x, tile) in row.iter().enumerate() {
            if !crate::is_valid_tile_value(tile.value) || tile.value > MAX_TILE_VALUE {
                return Err(EngineError::invalid_argument(format!(
                    "cell ({x}, {y}) holds invalid value {}",
                    tile.value
                )));
            }
            if tile.id >= session.next_identity() {
                return Err(EngineError::invalid_argument(format!(
                    "cell ({x}, {y}) identity {} not below counter {}",
                    tile.id,
                    session.next_identity()
                )));
            }
            if !ids.insert(tile.id) {
                return Err(EngineError::invalid_argument(format!(
                    "duplicate tile identity {}",
                    tile.id
                )));
            }
        }
    }

    Ok(())
}
