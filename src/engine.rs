//! Session bundled with its random source
//!
//! `GridEngine` is the handle a host keeps for one game: it owns the `Session`
//! and the injected `Rng` used for spawning. Any `Rng` works; `Pcg32` is the
//! default so seeded games are reproducible.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::Result;
use crate::persistence;
use crate::sim::{self, Direction, Session};

#[derive(Debug, Clone)]
pub struct GridEngine<R = Pcg32> {
    session: Session,
    rng: R,
}

impl GridEngine<Pcg32> {
    /// New game driven by a `Pcg32` seeded with `seed`
    pub fn from_seed(size: usize, seed: u64) -> Result<Self> {
        log::info!("Game initialized with seed: {seed}");
        Self::new_game(size, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> GridEngine<R> {
    pub fn new_game(size: usize, mut rng: R) -> Result<Self> {
        let session = Session::new_game(size, &mut rng)?;
        Ok(Self { session, rng })
    }

    /// Restore from stored text (see `persistence::decode`)
    pub fn restore_game(text: &str, rng: R) -> Result<Self> {
        let session = persistence::decode(text)?;
        Ok(Self { session, rng })
    }

    /// Restore from an already parsed snapshot
    pub fn restore_session(snapshot: Session, rng: R) -> Result<Self> {
        let session = Session::restore(snapshot)?;
        Ok(Self { session, rng })
    }

    /// Play one move; see `sim::move_tiles`
    pub fn move_tiles(&mut self, direction: Direction) -> Result<bool> {
        sim::move_tiles(&mut self.session, direction, &mut self.rng)
    }

    /// Read-only view of the current session
    pub fn snapshot(&self) -> &Session {
        &self.session
    }

    /// Current session in the versioned save format
    pub fn serialize(&self) -> Result<String> {
        persistence::encode(&self.session)
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    pub fn into_session(self) -> Session {
        self.session
    }
}
