#![allow(dead_code)]

use glam::IVec2;
use pacman_sim::{
    events::{GameEvent, TickInput},
    game::{
        state::{GameState, GameStatus},
        tick, SimulationOptions,
    },
    map::{builder::Map, direction::Direction},
    rules::Ruleset,
};

/// Rules with round numbers: 100 ms steps and one tile per tick for everyone.
pub fn test_rules() -> Ruleset {
    Ruleset {
        tick_rate: 10.0,
        pellet_score: 5.0,
        power_pellet_score: 25.0,
        ghost_score: 200.0,
        power_mode_duration_ms: 3000.0,
        player_speed: 1.0,
        ghost_speed: 1.0,
        ..Ruleset::default()
    }
}

pub fn map(layout: &[&str]) -> Map {
    Map::from_layout(layout).unwrap()
}

/// A fresh state for `map` that is already running.
pub fn running_state(map: &Map, rules: &Ruleset) -> GameState {
    let mut state = GameState::new(map, rules);
    state.status = GameStatus::Running;
    state
}

pub fn step(state: &mut GameState, map: &Map, rules: &Ruleset, direction: Option<Direction>) -> Vec<GameEvent> {
    let input = TickInput {
        direction,
        tilt: None,
    };
    tick(state, map, rules, SimulationOptions::default(), &input)
}

pub fn at(x: i32, y: i32) -> IVec2 {
    IVec2::new(x, y)
}
