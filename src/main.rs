//! Invasion headless driver
//!
//! Runs one scripted session against the simulation core and records the
//! result on the leaderboard. Usage:
//!
//! ```text
//! invasion [difficulty.json] [highscores.json] [seed]
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use invasion::consts::*;
use invasion::sim::{
    Faction, GameEvent, GamePhase, GameState, Invasion, TickInput, Viewport, ViewportBounds, tick,
};
use invasion::{DifficultyConfig, ScoreKeeper, SimError};

/// Ten simulated minutes
const MAX_TICKS: u64 = 50 * 60 * 10;
const DEFAULT_SCORES: &str = "invasion_highscores.json";
const MAX_LISTED: usize = 5;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Invasion (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let scores_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORES));
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or_else(clock_seed);

    match run(config_path.as_deref(), &scores_path, seed) {
        Ok(keeper) => {
            println!(
                "Final score {} (high score {}), levels cleared {}",
                keeper.score, keeper.high_score, keeper.levels_cleared
            );
            for (i, entry) in keeper.leaderboard.top(MAX_LISTED).iter().enumerate() {
                println!("{:>2}. {:<12} {:>8}", i + 1, entry.name, entry.score);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Session aborted: {e}");
            ExitCode::FAILURE
        }
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn run(config_path: Option<&Path>, scores_path: &Path, seed: u64) -> Result<ScoreKeeper, SimError> {
    let config = match config_path {
        Some(path) => DifficultyConfig::load(path)?,
        None => DifficultyConfig::default(),
    };
    let provider = ViewportBounds::new(Viewport::default());
    let mut state = GameState::new(config, &provider, seed)?;
    let mut keeper = ScoreKeeper::with_file("autopilot", scores_path);
    log::info!("Session seed {seed}");

    while state.time_ticks < MAX_TICKS {
        let input = autopilot(&state);
        let events = tick(&mut state, &input, &mut keeper)?;
        for event in &events {
            match event {
                GameEvent::LevelCleared { level } => {
                    log::info!("Cleared level {level} with {} points", keeper.score)
                }
                GameEvent::ShipHit { lives_left } => log::info!("Ship hit, {lives_left} left"),
                _ => log::trace!("{event:?}"),
            }
        }
        if state.current_phase() == GamePhase::GameOver {
            return Ok(keeper);
        }
    }

    // Out of time: quit through the pause menu so the score is recorded
    let pause = TickInput {
        pause: true,
        ..Default::default()
    };
    while state.current_phase() != GamePhase::GameOver {
        tick(&mut state, &pause, &mut keeper)?;
    }
    Ok(keeper)
}

/// Track the lowest living alien and keep the trigger down
fn autopilot(state: &GameState) -> TickInput {
    let target = state
        .formation
        .living()
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|a| a.pos.x)
        .unwrap_or(0.0);

    // Sidestep hostile shots that are about to land
    let threatened = state.projectiles.iter().any(|p| {
        p.faction == Faction::Hostile
            && (p.pos.x - state.ship.pos.x).abs() < SHIP_HALF_WIDTH * 2.0
            && p.pos.y - state.ship.pos.y < 1.5
    });
    let dx = if threatened {
        if state.ship.pos.x > 0.0 { -1.0 } else { 1.0 }
    } else {
        target - state.ship.pos.x
    };

    TickInput {
        axis: (dx * SHIP_SPEED_REDUCER).clamp(-1.0, 1.0),
        fire: true,
        pause: false,
    }
}
