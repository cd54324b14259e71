//! Grid state and session snapshot types
//!
//! All state that must be persisted to continue a game lives here.
//! Coordinates are `(x, y)` with `x` the column and `y` the row, both in `[0, size)`.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{EngineError, Result};

/// Direction of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Cell coordinates of line `index`, ordered from the leading edge of the
    /// move toward the trailing edge.
    ///
    /// Left/right lines are rows, up/down lines are columns.
    pub fn line_cells(self, size: usize, index: usize) -> impl Iterator<Item = (usize, usize)> {
        (0..size).map(move |k| match self {
            Direction::Left => (k, index),
            Direction::Right => (size - 1 - k, index),
            Direction::Up => (index, k),
            Direction::Down => (index, size - 1 - k),
        })
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(EngineError::invalid_argument(format!(
                "unknown direction '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell: its value (0 = empty) plus a stable identity.
///
/// The identity only exists so a presentation layer can follow a tile across
/// moves; it has no gameplay meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tile {
    pub value: u32,
    pub id: u64,
}

impl Tile {
    pub fn empty(id: u64) -> Self {
        Self { value: 0, id }
    }

    pub fn is_empty(&self) -> bool {
        self.value == 0
    }
}

/// Why a cell changed in the most recent move (presentation hint only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellHint {
    #[default]
    None,
    Spawned,
    Merged,
}

/// How a finished session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The target value was formed by a merge
    Won,
    /// Board full with no merge available
    Lost,
}

/// Square matrix of tiles, stored as rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<Tile>>,
}

impl Grid {
    /// Build a `size × size` grid of empty tiles, drawing identities from `next_id`
    pub(crate) fn filled(size: usize, next_id: &mut u64) -> Self {
        let rows = (0..size)
            .map(|_| {
                (0..size)
                    .map(|_| {
                        let tile = Tile::empty(*next_id);
                        *next_id += 1;
                        tile
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub(crate) fn from_rows(rows: Vec<Vec<Tile>>) -> Self {
        Self { rows }
    }

    /// Number of rows (equal to the edge length for a well-formed grid)
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Tile> {
        self.rows.get(y).and_then(|row| row.get(x))
    }

    /// Value at `(x, y)`, 0 when out of bounds
    pub fn value(&self, x: usize, y: usize) -> u32 {
        self.get(x, y).map(|t| t.value).unwrap_or(0)
    }

    pub(crate) fn tile(&self, x: usize, y: usize) -> Tile {
        self.rows[y][x]
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, tile: Tile) {
        self.rows[y][x] = tile;
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.rows.iter().flatten()
    }

    /// Coordinates of empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for (y, row) in self.rows.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                if tile.is_empty() {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    pub fn empty_count(&self) -> usize {
        self.tiles().filter(|t| t.is_empty()).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles().filter(|t| !t.is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.tiles().all(|t| !t.is_empty())
    }

    /// True if two grid-adjacent cells (no wrapping) hold the same value and could merge
    pub fn has_adjacent_pair(&self) -> bool {
        let size = self.size();
        for y in 0..size {
            for x in 0..size {
                let value = self.value(x, y);
                // Empty cells and tiles too large to double never merge
                if value == 0 || value.checked_mul(2).is_none() {
                    continue;
                }
                if x + 1 < size && self.value(x + 1, y) == value {
                    return true;
                }
                if y + 1 < size && self.value(x, y + 1) == value {
                    return true;
                }
            }
        }
        false
    }

    pub fn max_value(&self) -> u32 {
        self.tiles().map(|t| t.value).max().unwrap_or(0)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_value().max(1).to_string().len();
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for (x, tile) in row.iter().enumerate() {
                if x > 0 {
                    f.write_str(" ")?;
                }
                if tile.is_empty() {
                    write!(f, "{:>width$}", ".")?;
                } else {
                    write!(f, "{:>width$}", tile.value)?;
                }
            }
        }
        Ok(())
    }
}

/// Complete game session (serializable snapshot)
///
/// `is_valid` is set once the session has been constructed or restored and
/// never reverts. `is_running` goes false exactly once, on win or loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Session {
    pub(super) size: usize,
    pub(super) grid: Grid,
    pub(super) score: u64,
    pub(super) is_running: bool,
    pub(super) is_valid: bool,
    pub(super) target_reached: bool,
    pub(super) last_score_increase: u64,
    pub(super) next_identity: u64,
    /// Per-cell hints for the latest construction or move (not persisted)
    #[serde(skip)]
    pub(super) hints: Vec<CellHint>,
}

impl Session {
    /// Start a fresh game on a `size × size` board with two spawned tiles.
    pub fn new_game<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self> {
        if !crate::is_valid_size(size) {
            log::warn!("Rejected board size {size}");
            return Err(EngineError::invalid_argument(format!(
                "board size must be in [{MIN_SIZE}, {MAX_SIZE}], got {size}"
            )));
        }

        let mut next_identity = 1;
        let grid = Grid::filled(size, &mut next_identity);
        let mut session = Self {
            size,
            grid,
            score: 0,
            is_running: true,
            is_valid: true,
            target_reached: false,
            last_score_increase: 0,
            next_identity,
            hints: vec![CellHint::None; size * size],
        };

        for index in rand::seq::index::sample(rng, size * size, INITIAL_TILES) {
            let value = super::spawn::random_tile_value(rng);
            session.spawn_at(index % size, index / size, value);
        }

        log::info!("New {size}x{size} game started");
        Ok(session)
    }

    /// Adopt a previously serialized snapshot.
    ///
    /// The snapshot must be structurally sound (see `persistence::validation`);
    /// its score and flags are otherwise trusted as stored.
    pub fn restore(snapshot: Session) -> Result<Self> {
        crate::persistence::validation::validate_session(&snapshot)?;

        let mut session = snapshot;
        session.is_valid = true;
        session.hints = vec![CellHint::None; session.size * session.size];

        log::info!(
            "Restored {}x{} game (score {}, running {})",
            session.size,
            session.size,
            session.score,
            session.is_running
        );
        Ok(session)
    }

    /// Assemble an unvalidated snapshot from stored parts (used by save migration)
    pub(crate) fn from_parts(
        size: usize,
        grid: Grid,
        score: u64,
        is_running: bool,
        target_reached: bool,
        last_score_increase: u64,
        next_identity: u64,
    ) -> Self {
        Self {
            size,
            grid,
            score,
            is_running,
            is_valid: false,
            target_reached,
            last_score_increase,
            next_identity,
            hints: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Sum of merge gains in the most recent move only
    pub fn last_score_increase(&self) -> u64 {
        self.last_score_increase
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn target_reached(&self) -> bool {
        self.target_reached
    }

    pub fn next_identity(&self) -> u64 {
        self.next_identity
    }

    /// Per-cell hints in row-major order
    pub fn hints(&self) -> &[CellHint] {
        &self.hints
    }

    pub fn hint(&self, x: usize, y: usize) -> CellHint {
        if x >= self.size {
            return CellHint::None;
        }
        self.hints
            .get(y * self.size + x)
            .copied()
            .unwrap_or_default()
    }

    /// `None` while running, otherwise how the game ended
    pub fn outcome(&self) -> Option<Outcome> {
        if self.is_running {
            None
        } else if self.target_reached {
            Some(Outcome::Won)
        } else {
            Some(Outcome::Lost)
        }
    }

    pub fn max_tile(&self) -> u32 {
        self.grid.max_value()
    }

    pub fn empty_count(&self) -> usize {
        self.grid.empty_count()
    }

    /// Whether moving in `direction` would change the board (does not mutate)
    pub fn can_move(&self, direction: Direction) -> bool {
        super::tick::would_change(self, direction)
    }

    /// Directions that would currently change the board
    pub fn legal_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.can_move(d))
            .collect()
    }

    /// Allocate a new tile identity
    pub(super) fn next_tile_id(&mut self) -> u64 {
        let id = self.next_identity;
        self.next_identity += 1;
        id
    }

    /// Place a freshly spawned tile at `(x, y)`
    pub(super) fn spawn_at(&mut self, x: usize, y: usize, value: u32) {
        let id = self.next_tile_id();
        self.grid.set(x, y, Tile { value, id });
        self.set_hint(x, y, CellHint::Spawned);
    }

    pub(super) fn set_hint(&mut self, x: usize, y: usize, hint: CellHint) {
        let index = y * self.size + x;
        if let Some(slot) = self.hints.get_mut(index) {
            *slot = hint;
        }
    }

    pub(super) fn clear_hints(&mut self) {
        self.hints.clear();
        self.hints.resize(self.size * self.size, CellHint::None);
    }
}
