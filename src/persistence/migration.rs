//! Migration of the legacy flat save
//!
//! Older hosts stored the raw game record: a `field` of plain values with no
//! tile identities and no version marker. Identities are assigned in
//! row-major order on the way in.

use serde::Deserialize;

use crate::error::{EngineError, Result};
use crate::sim::{Grid, Session, Tile};

/// Legacy save record, as written before versioning
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LegacySave {
    pub field: Vec<Vec<u32>>,
    pub size: usize,
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub last_score_increase: u64,
    pub is_game_running: bool,
    #[serde(default)]
    pub is_game_valid: bool,
    #[serde(rename = "is2048Reached", default)]
    pub is_2048_reached: bool,
}

impl LegacySave {
    /// Convert into a validated session
    pub fn migrate(self) -> Result<Session> {
        if !self.is_game_valid {
            log::warn!("Legacy save marked invalid, migrating anyway");
        }
        if self.field.len() != self.size {
            return Err(EngineError::invalid_argument(format!(
                "legacy field has {} rows, expected {}",
                self.field.len(),
                self.size
            )));
        }

        let mut next_identity = 1;
        let rows = self
            .field
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|value| {
                        let tile = Tile {
                            value,
                            id: next_identity,
                        };
                        next_identity += 1;
                        tile
                    })
                    .collect()
            })
            .collect();

        let snapshot = Session::from_parts(
            self.size,
            Grid::from_rows(rows),
            self.score,
            self.is_game_running,
            self.is_2048_reached,
            self.last_score_increase,
            next_identity,
        );
        log::info!("Migrating legacy {}x{} save", self.size, self.size);
        Session::restore(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = r#"{
        "field": [[2, 0, 0, 0], [0, 4, 0, 0], [0, 0, 8, 0], [0, 0, 0, 16]],
        "isGameRunning": true,
        "isGameValid": true,
        "is2048Reached": false,
        "lastScoreIncrease": 8,
        "score": 120,
        "size": 4
    }"#;

    #[test]
    fn test_migrates_values_and_flags() {
        let legacy: LegacySave = serde_json::from_str(LEGACY).unwrap();
        let session = legacy.migrate().unwrap();

        assert_eq!(session.size(), 4);
        assert_eq!(session.score(), 120);
        assert_eq!(session.last_score_increase(), 8);
        assert!(session.is_running());
        assert!(session.is_valid());
        assert_eq!(session.grid().value(0, 0), 2);
        assert_eq!(session.grid().value(3, 3), 16);
        assert_eq!(session.next_identity(), 17);
    }

    #[test]
    fn test_rejects_ragged_field() {
        let json = r#"{"field": [[2, 0, 0], [0, 0]], "size": 3, "isGameRunning": true}"#;
        let legacy: LegacySave = serde_json::from_str(json).unwrap();
        assert!(matches!(legacy.migrate(), Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        let json = r#"{"field": [], "size": 3, "isGameRunning": true, "extra": 1}"#;
        assert!(serde_json::from_str::<LegacySave>(json).is_err());
    }
}
