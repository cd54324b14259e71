//! Deterministic rules engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Randomness only through the injected `Rng`
//! - Stable iteration order (row-major)
//! - No rendering, storage, or platform dependencies

pub mod merge;
pub mod spawn;
pub mod state;
pub mod tick;

pub use merge::{MergedLine, merge_line};
pub use spawn::{random_tile_value, spawn_random_tile};
pub use state::{CellHint, Direction, Grid, Outcome, Session, Tile};
pub use tick::move_tiles;
