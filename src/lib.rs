//! Tile Merge - rules engine for a 2048-style sliding tile puzzle
//!
//! Core modules:
//! - `sim`: Grid state, move/merge algorithm, spawning, terminal detection
//! - `engine`: Session bundled with its injected random source
//! - `persistence`: Versioned save format with strict validation
//! - `highscores`: Best score leaderboard
//! - `settings`: Host configuration
//!
//! The engine is headless and holds no process-wide state. Every operation
//! acts on a `Session` owned by the caller.

pub mod engine;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use engine::GridEngine;
pub use error::{EngineError, Result};
pub use highscores::HighScores;
pub use settings::Settings;
pub use sim::{CellHint, Direction, Grid, Outcome, Session, Tile};

/// Game configuration constants
pub mod consts {
    /// Smallest supported board edge
    pub const MIN_SIZE: usize = 3;
    /// Largest supported board edge
    pub const MAX_SIZE: usize = 8;
    /// Board edge used when the host does not choose one
    pub const DEFAULT_SIZE: usize = 4;

    /// Tile value that wins the game when formed by a merge
    pub const TARGET_VALUE: u32 = 2048;
    /// Largest tile value accepted from a stored session
    pub const MAX_TILE_VALUE: u32 = 1 << 30;
    /// Largest score or identity counter accepted from a stored session.
    /// Leaves room for far more moves than any game can play.
    pub const MAX_STORED_COUNTER: u64 = 1 << 62;

    /// Probability that a spawned tile is a 2 (otherwise 4)
    pub const SPAWN_TWO_PROBABILITY: f64 = 0.8;
    /// Number of tiles placed on a fresh board
    pub const INITIAL_TILES: usize = 2;

    /// Current save envelope version
    pub const SAVE_VERSION: u32 = 1;
}

/// Returns true if `size` is a supported board edge
#[inline]
pub fn is_valid_size(size: usize) -> bool {
    (consts::MIN_SIZE..=consts::MAX_SIZE).contains(&size)
}

/// Returns true if `value` may appear in a cell (0 or a power of two >= 2)
#[inline]
pub fn is_valid_tile_value(value: u32) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}
