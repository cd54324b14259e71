//! Single-line merge pass
//!
//! Input is a line's non-empty tiles ordered from the leading edge of the move.
//! Equal neighbours combine once per move: `[2, 2, 2, 2]` becomes `[4, 4]`,
//! never `[8]`. Pairs whose doubled value would overflow `u32` do not merge.

use super::state::Tile;
use crate::consts::TARGET_VALUE;

/// Result of merging one line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergedLine {
    /// Surviving tiles, leading edge first
    pub tiles: Vec<Tile>,
    /// Parallel to `tiles`: true where the tile was produced by a merge
    pub merged: Vec<bool>,
    /// Sum of the values produced by merges
    pub gain: u64,
    /// A merge produced the target value
    pub reached_target: bool,
}

impl MergedLine {
    /// Number of tiles consumed by merges
    pub fn merges(&self) -> usize {
        self.merged.iter().filter(|&&m| m).count()
    }
}

/// Merge a compacted line.
///
/// The surviving tile keeps the identity of the leading tile of each pair.
pub fn merge_line(tiles: &[Tile]) -> MergedLine {
    let mut line = MergedLine {
        tiles: Vec::with_capacity(tiles.len()),
        merged: Vec::with_capacity(tiles.len()),
        ..Default::default()
    };

    let mut cursor = 0;
    while cursor < tiles.len() {
        let tile = tiles[cursor];
        // A pair whose sum does not fit in `u32` stays apart
        let doubled = tiles
            .get(cursor + 1)
            .filter(|next| next.value == tile.value)
            .and_then(|_| tile.value.checked_mul(2));
        match doubled {
            Some(value) => {
                line.gain += u64::from(value);
                if value == TARGET_VALUE {
                    line.reached_target = true;
                }
                line.tiles.push(Tile { value, id: tile.id });
                line.merged.push(true);
                // Skip the consumed neighbour; the new value is not compared again
                cursor += 2;
            }
            _ => {
                line.tiles.push(tile);
                line.merged.push(false);
                cursor += 1;
            }
        }
    }

    line
}
