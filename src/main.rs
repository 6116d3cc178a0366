//! Safe Crossing entry point
//!
//! Native builds run a headless session driven by a simple autopilot and print
//! the final snapshot. The web build drives `Game` from the page instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use safe_crossing::GameConfig;
    use safe_crossing::consts::*;
    use safe_crossing::highscores::HighScores;
    use safe_crossing::persistence::{FileScoreStore, MemoryScoreStore, ScoreStore};
    use safe_crossing::predictor::{DifficultyPredictor, OfflinePredictor, RulePredictor};
    use safe_crossing::sim::crossing::road_band;
    use safe_crossing::sim::{
        Game, GameEvent, LightPhase, MoveDirection, Snapshot, TickInput, is_in_crosswalk, tick,
    };

    #[derive(Parser, Debug)]
    #[command(name = "safe-crossing", about = "Headless Safe Crossing session")]
    struct Cli {
        /// JSON session config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Simulated seconds to run
        #[arg(long, default_value_t = 60)]
        seconds: u64,

        /// Let the predictor drive difficulty
        #[arg(long)]
        ai: bool,

        /// RNG seed (overrides the config)
        #[arg(long)]
        seed: Option<u64>,

        /// Mirror the score to this file
        #[arg(long)]
        score_file: Option<PathBuf>,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();

        let mut config = match &cli.config {
            Some(path) => GameConfig::load_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => GameConfig::load(),
        };
        if cli.seed.is_some() {
            config.seed = cli.seed;
        }
        config.ai_mode |= cli.ai;

        let predictor: Box<dyn DifficultyPredictor> = if config.ai_mode {
            Box::new(RulePredictor)
        } else {
            Box::new(OfflinePredictor)
        };
        let store: Box<dyn ScoreStore> = match &cli.score_file {
            Some(path) => Box::new(FileScoreStore::new(path.clone())),
            None => Box::new(MemoryScoreStore::new()),
        };

        log::info!("Safe Crossing (native) starting...");
        let mut game = Game::with_parts(config, predictor, store, Box::new(HighScores::load()))
            .context("starting session")?;

        let ticks = cli.seconds * 1000 / MOVE_INTERVAL_MS;
        let mut crossings = 0u32;
        let mut faults = 0u32;
        for _ in 0..ticks {
            let input = TickInput {
                moves: autopilot(&game.snapshot(), game.config().viewport_height)
                    .into_iter()
                    .collect(),
                ..TickInput::default()
            };
            tick(&mut game, &input, MOVE_INTERVAL_MS);

            for event in game.drain_events() {
                match event {
                    GameEvent::Crossed { .. } => crossings += 1,
                    GameEvent::LifeLost { .. } => faults += 1,
                    _ => {}
                }
            }
            if game.session().game_over {
                break;
            }
        }

        let snapshot = game.snapshot();
        log::info!(
            "Finished at {}ms: score {}, tier {}, {} crossings, {} lives lost",
            snapshot.time_ms,
            snapshot.score,
            snapshot.difficulty,
            crossings,
            faults
        );
        let json = serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?;
        println!("{}", json);
        Ok(())
    }

    /// Walk to the crosswalk, then cross only while the light is red
    fn autopilot(snap: &Snapshot, viewport_height: f32) -> Option<MoveDirection> {
        if snap.player.returning || snap.paused || snap.game_over {
            return None;
        }

        let target_x = snap.crosswalk_center_x - PLAYER_SIZE / 2.0;
        let dx = target_x - snap.player.pos.x;
        if !is_in_crosswalk(snap.player.pos.x + PLAYER_SIZE / 2.0, snap.crosswalk_center_x)
            || dx.abs() >= PLAYER_STEP
        {
            return Some(if dx < 0.0 {
                MoveDirection::Left
            } else {
                MoveDirection::Right
            });
        }

        let (top, bottom) = road_band(viewport_height, snap.lane_count);
        let y = snap.player.pos.y;
        let in_band = y >= top && y <= bottom;
        // Only enter the road with enough red left to get across
        let entering = y > bottom && y - PLAYER_STEP <= bottom;
        let red = snap.light_phase == LightPhase::Red;
        if in_band && !red {
            return None;
        }
        if entering && (!red || snap.light_remaining_ms < 1000) {
            return None;
        }
        Some(MoveDirection::Up)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The page owns the loop on the web
}
