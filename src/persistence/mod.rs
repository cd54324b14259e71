//! Save/load of game sessions
//!
//! Features:
//! - Versioned JSON envelope
//! - Strict schema checks on restore
//! - Migration of the legacy flat save format
//!
//! Only the encoding lives here; where the text is stored is up to the host.

pub mod envelope;
pub mod migration;
pub mod validation;

pub use envelope::{SaveEnvelope, decode, encode, encode_for_host};
pub use migration::LegacySave;
pub use validation::validate_session;
