//! Versioned save envelope

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::migration::LegacySave;
use crate::consts::SAVE_VERSION;
use crate::error::{EngineError, Result};
use crate::sim::Session;

/// Stored form of a session: `{"version": 1, "session": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveEnvelope {
    pub version: u32,
    pub session: Session,
}

/// Serialize a session into the current save format
pub fn encode(session: &Session) -> Result<String> {
    let envelope = SaveEnvelope {
        version: SAVE_VERSION,
        session: session.clone(),
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Serialize a session the host should keep.
///
/// Finished sessions return `None`: the host clears its slot instead of
/// storing a game that cannot be continued.
pub fn encode_for_host(session: &Session) -> Result<Option<String>> {
    if !session.is_running() {
        return Ok(None);
    }
    encode(session).map(Some)
}

/// Parse and validate a stored session.
///
/// Accepts the versioned envelope, a bare session snapshot, or a legacy flat
/// save. Anything else is `InvalidArgument`.
pub fn decode(text: &str) -> Result<Session> {
    let value: Value = serde_json::from_str(text)?;
    let Some(object) = value.as_object() else {
        log::warn!("Rejected save payload: not a JSON object");
        return Err(EngineError::invalid_argument("save payload must be a JSON object"));
    };

    if let Some(version) = object.get("version") {
        let version = version.as_u64();
        if version != Some(u64::from(SAVE_VERSION)) {
            log::warn!("Rejected save with version {version:?}");
            return Err(EngineError::invalid_argument(format!(
                "unsupported save version {version:?}"
            )));
        }
        let envelope: SaveEnvelope = serde_json::from_value(value)?;
        return Session::restore(envelope.session);
    }

    if object.contains_key("field") {
        let legacy: LegacySave = serde_json::from_value(value)?;
        return legacy.migrate();
    }

    let snapshot: Session = serde_json::from_value(value)?;
    Session::restore(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{CellHint, Direction, move_tiles};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn played_session(seed: u64, moves: usize) -> Session {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut session = Session::new_game(4, &mut rng).unwrap();
        for i in 0..moves {
            if !session.is_running() {
                break;
            }
            move_tiles(&mut session, Direction::ALL[i % 4], &mut rng).unwrap();
        }
        session
    }

    #[test]
    fn test_encode_writes_version() {
        let session = played_session(1, 5);
        let text = encode(&session).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["version"], 1);
        let stored = &value["session"];
        assert_eq!(stored["size"], 4);
        assert!(stored["isRunning"].is_boolean());
        assert!(stored["isValid"].is_boolean());
        assert!(stored["targetReached"].is_boolean());
        assert!(stored["lastScoreIncrease"].is_u64());
        assert!(stored["nextIdentity"].is_u64());
        assert_eq!(stored["grid"].as_array().unwrap().len(), 4);
        assert!(stored.get("hints").is_none());
    }

    #[test]
    fn test_decode_round_trip() {
        let session = played_session(2, 12);
        let restored = decode(&encode(&session).unwrap()).unwrap();

        assert_eq!(restored.grid(), session.grid());
        assert_eq!(restored.score(), session.score());
        assert_eq!(restored.last_score_increase(), session.last_score_increase());
        assert_eq!(restored.is_running(), session.is_running());
        assert_eq!(restored.target_reached(), session.target_reached());
        assert_eq!(restored.next_identity(), session.next_identity());
        assert!(restored.is_valid());
        assert!(restored.hints().iter().all(|&h| h == CellHint::None));
    }

    #[test]
    fn test_decode_bare_snapshot() {
        let session = played_session(3, 3);
        let bare = serde_json::to_string(&session).unwrap();
        let restored = decode(&bare).unwrap();
        assert_eq!(restored.grid(), session.grid());
    }

    #[test]
    fn test_decode_marks_valid() {
        let session = played_session(4, 2);
        let mut value: Value = serde_json::to_value(&session).unwrap();
        value["isValid"] = Value::Bool(false);
        let restored = decode(&value.to_string()).unwrap();
        assert!(restored.is_valid());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        for text in [
            "",
            "not json",
            "[1, 2, 3]",
            "42",
            r#"{"version": 2, "session": {}}"#,
            r#"{"version": "one", "session": {}}"#,
            r#"{"version": 1, "session": {"size": 4}}"#,
            r#"{"size": 4, "grid": []}"#,
            r#"{"unrelated": true}"#,
        ] {
            assert!(
                matches!(decode(text), Err(EngineError::InvalidArgument(_))),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn test_decode_rejects_unknown_session_fields() {
        let session = played_session(5, 1);
        let mut value: Value = serde_json::to_value(&session).unwrap();
        value["cheat"] = Value::Bool(true);
        assert!(decode(&value.to_string()).is_err());
    }

    #[test]
    fn test_decode_rejects_exhausted_counters() {
        let session = played_session(7, 3);
        let mut value: Value = serde_json::to_value(&session).unwrap();
        value["nextIdentity"] = Value::from(u64::MAX);
        assert!(matches!(
            decode(&value.to_string()),
            Err(EngineError::InvalidArgument(_))
        ));

        let mut value: Value = serde_json::to_value(&session).unwrap();
        value["score"] = Value::from(u64::MAX - 1);
        assert!(decode(&value.to_string()).is_err());
    }

    #[test]
    fn test_decode_large_tiles_play_without_overflow() {
        let top = 1u32 << 30;
        let session = played_session(8, 0);
        let mut value: Value = serde_json::to_value(&session).unwrap();
        for x in 0..4 {
            value["grid"][0][x]["value"] = Value::from(top);
        }
        let mut restored = decode(&value.to_string()).unwrap();
        let mut rng = Pcg32::seed_from_u64(8);

        for _ in 0..3 {
            if !restored.is_running() {
                break;
            }
            move_tiles(&mut restored, Direction::Left, &mut rng).unwrap();
        }
        assert_eq!(restored.grid().value(0, 0), top * 2);
        assert_eq!(restored.grid().value(1, 0), top * 2);
    }

    #[test]
    fn test_decode_legacy_save() {
        let legacy = r#"{"field":[[2,0,0],[0,0,0],[0,0,4]],"isGameRunning":true,
            "isGameValid":true,"is2048Reached":false,"lastScoreIncrease":0,"score":0,"size":3}"#;
        let session = decode(legacy).unwrap();
        assert_eq!(session.size(), 3);
        assert_eq!(session.grid().value(2, 2), 4);
    }

    #[test]
    fn test_encode_for_host_skips_finished() {
        let running = played_session(6, 1);
        assert!(encode_for_host(&running).unwrap().is_some());

        let mut value: Value = serde_json::to_value(&running).unwrap();
        value["isRunning"] = Value::Bool(false);
        let finished = decode(&value.to_string()).unwrap();
        assert_eq!(encode_for_host(&finished).unwrap(), None);
    }

    proptest! {
        #[test]
        fn restored_session_plays_identically(seed in any::<u64>(), moves in 0usize..30) {
            let session = played_session(seed, moves);
            let restored = decode(&encode(&session).unwrap()).unwrap();
            prop_assert_eq!(restored.grid(), session.grid());
            prop_assert_eq!(restored.score(), session.score());

            if session.is_running() {
                let mut a = session.clone();
                let mut b = restored;
                let mut rng_a = Pcg32::seed_from_u64(seed ^ 0xABCD);
                let mut rng_b = Pcg32::seed_from_u64(seed ^ 0xABCD);
                let dir = Direction::ALL[(seed % 4) as usize];
                let ra = move_tiles(&mut a, dir, &mut rng_a);
                let rb = move_tiles(&mut b, dir, &mut rng_b);
                prop_assert_eq!(ra, rb);
                prop_assert_eq!(a.grid(), b.grid());
                prop_assert_eq!(a.next_identity(), b.next_identity());
            }
        }
    }
}
