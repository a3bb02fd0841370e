//! Headless runner: loads a map and ruleset, plays a scripted run and logs the outcome.
//!
//! Usage: `pacman-sim [MAP.json] [RULES.json] [TICKS]`

use anyhow::{Context, Result};
use pacman_sim::asset;
use pacman_sim::formatter;
use pacman_sim::game::state::GameStatus;
use pacman_sim::game::{Simulation, SimulationOptions};
use pacman_sim::map::builder::Map;
use pacman_sim::map::direction::Direction;
use pacman_sim::rules::Ruleset;
use tracing::info;

const DEFAULT_TICKS: u64 = 600;

fn main() -> Result<()> {
    formatter::init_tracing("info").context("Could not install the tracing subscriber")?;

    let mut args = std::env::args().skip(1);
    let map = match args.next() {
        Some(path) => {
            let json = asset::read_to_string(&path).with_context(|| format!("Could not read map {path}"))?;
            Map::from_json(&json).with_context(|| format!("Invalid map {path}"))?
        }
        None => Map::from_legacy(&Default::default()).context("Built-in layout failed to load")?,
    };
    let rules = match args.next() {
        Some(path) => {
            let json = asset::read_to_string(&path).with_context(|| format!("Could not read rules {path}"))?;
            Ruleset::from_json(&json).with_context(|| format!("Invalid rules {path}"))?
        }
        None => Ruleset::default(),
    };
    let ticks = match args.next() {
        Some(value) => value.parse().with_context(|| format!("Invalid tick count {value}"))?,
        None => DEFAULT_TICKS,
    };

    let step_ms = rules.step_ms();
    let mut simulation = Simulation::new(map, rules, SimulationOptions::default());
    simulation.start();

    // Sweep the maze by cycling through the directions every few tiles.
    for tick in 0..ticks {
        let direction = Direction::DIRECTIONS[(tick / 8 % 4) as usize];
        simulation.push_direction(direction);
        for event in simulation.advance(step_ms) {
            info!(?event, "Event");
        }
        if simulation.state().status != GameStatus::Running {
            break;
        }
    }

    let snapshot = simulation.snapshot();
    info!(
        status = simulation.state().status.as_ref(),
        score = snapshot.player.score,
        lives = snapshot.player.lives,
        pellets = snapshot.pellets_remaining,
        "Run finished"
    );
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
