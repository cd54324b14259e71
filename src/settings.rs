//! Host configuration
//!
//! Stored separately from game saves; parsed from JSON by the host.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SIZE, MAX_SIZE, MIN_SIZE};
use crate::error::{EngineError, Result};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Board edge for new games
    pub board_size: usize,
    /// Fixed RNG seed; a fresh one is drawn per game when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_SIZE,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse and validate settings
    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !crate::is_valid_size(self.board_size) {
            return Err(EngineError::invalid_argument(format!(
                "board_size must be in [{MIN_SIZE}, {MAX_SIZE}], got {}",
                self.board_size
            )));
        }
        Ok(())
    }

    /// Parse settings, falling back to defaults on any problem
    pub fn load_or_default(text: &str) -> Self {
        match Self::from_json(text) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(err) => {
                log::warn!("Using default settings ({err})");
                Self::default()
            }
        }
    }

    /// Seed for the next game: the configured one, or a fresh random value
    pub fn game_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
