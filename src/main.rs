//! Tile Merge headless demo
//!
//! Plays one game with random legal moves and prints the final board.
//! Usage: `tile-merge [settings.json]`

fn main() {
    use rand::SeedableRng;
    use rand::seq::IndexedRandom;
    use rand_pcg::Pcg32;
    use tile_merge::{GridEngine, HighScores, Outcome, Settings};

    env_logger::init();
    log::info!("Tile Merge starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(text) => Settings::load_or_default(&text),
            Err(err) => {
                log::warn!("Could not read {path}: {err}");
                Settings::default()
            }
        },
        None => Settings::default(),
    };

    let seed = settings.game_seed();
    let mut engine = match GridEngine::from_seed(settings.board_size, seed) {
        Ok(engine) => engine,
        Err(err) => {
            log::error!("Could not start game: {err}");
            std::process::exit(1);
        }
    };

    // Move choice uses its own stream so the board sequence depends only on `seed`
    let mut chooser = Pcg32::seed_from_u64(seed.rotate_left(32));
    let mut moves = 0u32;
    while engine.is_running() {
        let legal = engine.snapshot().legal_directions();
        let Some(&direction) = legal.choose(&mut chooser) else {
            break;
        };
        if let Err(err) = engine.move_tiles(direction) {
            log::error!("Move failed: {err}");
            break;
        }
        moves += 1;
    }

    let session = engine.snapshot();
    let outcome = match session.outcome() {
        Some(Outcome::Won) => "won",
        Some(Outcome::Lost) => "lost",
        None => "unfinished",
    };
    println!("{}", session.grid());
    println!(
        "Game {outcome} after {moves} moves: score {}, best tile {}",
        session.score(),
        session.max_tile()
    );

    let mut scores = HighScores::new();
    if let Some(rank) = scores.record(session) {
        println!("Leaderboard rank: {rank}");
    }
}
