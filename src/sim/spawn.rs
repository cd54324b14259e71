//! Random tile spawning

use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::Session;
use crate::consts::SPAWN_TWO_PROBABILITY;

/// Value for a new tile: 2 with probability 0.8, otherwise 4
pub fn random_tile_value<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    if rng.random_bool(SPAWN_TWO_PROBABILITY) {
        2
    } else {
        4
    }
}

/// Place one new tile on a uniformly chosen empty cell.
///
/// Returns the chosen cell, or `None` if the board is full.
pub fn spawn_random_tile<R: Rng + ?Sized>(
    session: &mut Session,
    rng: &mut R,
) -> Option<(usize, usize)> {
    let empties = session.grid().empty_cells();
    let &(x, y) = empties.choose(rng)?;
    let value = random_tile_value(rng);
    session.spawn_at(x, y, value);
    log::trace!("Spawned {value} at ({x}, {y})");
    Some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::CellHint;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_tile_value_distribution() {
        let mut rng = Pcg32::seed_from_u64(42);
        let samples = 10_000;
        let twos = (0..samples)
            .filter(|_| random_tile_value(&mut rng) == 2)
            .count();
        let ratio = twos as f64 / samples as f64;
        assert!((0.77..0.83).contains(&ratio), "ratio of twos was {ratio}");
    }

    #[test]
    fn test_spawn_fills_an_empty_cell() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut session = Session::new_game(4, &mut rng).unwrap();
        session.clear_hints();
        let before_id = session.next_identity();

        let (x, y) = spawn_random_tile(&mut session, &mut rng).unwrap();

        let tile = session.grid().get(x, y).copied().unwrap();
        assert!(tile.value == 2 || tile.value == 4);
        assert_eq!(tile.id, before_id);
        assert_eq!(session.next_identity(), before_id + 1);
        assert_eq!(session.hint(x, y), CellHint::Spawned);
        assert_eq!(session.grid().occupied_count(), 3);
    }

    #[test]
    fn test_spawn_on_full_board_is_none() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut session = Session::new_game(3, &mut rng).unwrap();
        while spawn_random_tile(&mut session, &mut rng).is_some() {}

        assert!(session.grid().is_full());
        assert_eq!(spawn_random_tile(&mut session, &mut rng), None);
    }

    #[test]
    fn test_spawn_reaches_every_empty_cell() {
        let mut rng = Pcg32::seed_from_u64(9);
        let base = Session::new_game(3, &mut rng).unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let mut session = base.clone();
            if let Some(cell) = spawn_random_tile(&mut session, &mut rng) {
                seen.insert(cell);
            }
        }
        assert_eq!(seen.len(), base.empty_count());
    }
}
