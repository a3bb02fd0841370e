//! Tile-level collision, scoring and the power timer.

use tracing::{debug, info};

use crate::constants::MapTile;
use crate::events::GameEvent;
use crate::game::state::{GameState, GameStatus, GhostMode};
use crate::map::builder::Map;
use crate::rules::Ruleset;

/// Runs the power timer and ghost mode timers down by `elapsed_ms`.
///
/// Frightened ghosts whose timer runs out return to their base mode. Eyes standing on their spawn
/// revive once the power timer is no longer active.
pub fn decay_timers(state: &mut GameState, rules: &Ruleset, elapsed_ms: f64, events: &mut Vec<GameEvent>) {
    if state.power_remaining_ms > 0.0 {
        state.power_remaining_ms = (state.power_remaining_ms - elapsed_ms).max(0.0);
        if state.power_remaining_ms == 0.0 {
            state.player.powered_up_until = None;
            debug!("Power mode expired");
            events.push(GameEvent::PowerExpired);
        }
    }

    let powered = state.is_powered();
    for ghost in &mut state.ghosts {
        match ghost.mode {
            GhostMode::Frightened => {
                ghost.frightened_timer = (ghost.frightened_timer - elapsed_ms).max(0.0);
                if ghost.frightened_timer == 0.0 {
                    debug!(ghost = %ghost.id, mode = ghost.base_mode.as_ref(), "Ghost no longer frightened");
                    ghost.set_mode(ghost.base_mode, rules);
                }
            }
            GhostMode::Eyes if !powered && ghost.tile() == ghost.spawn => {
                debug!(ghost = %ghost.id, mode = ghost.base_mode.as_ref(), "Ghost revived");
                ghost.set_mode(ghost.base_mode, rules);
                events.push(GameEvent::GhostRevived {
                    ghost: ghost.id.clone(),
                    mode: ghost.base_mode,
                });
            }
            _ => {}
        }
    }
}

/// Eats whatever pellet sits on the player's tile.
///
/// A power pellet scores `power_pellet_score` in place of the regular pellet score, starts or
/// refreshes the power timer and frightens every ghost that is not already eyes.
pub fn consume_pellet(state: &mut GameState, rules: &Ruleset, events: &mut Vec<GameEvent>) {
    let tile_position = state.player.tile();
    let Some(tile) = state.tiles.get(tile_position) else {
        return;
    };

    match tile {
        MapTile::Pellet => {
            state.player.score += rules.pellet_score;
            events.push(GameEvent::PelletEaten {
                position: tile_position,
                score: rules.pellet_score,
            });
        }
        MapTile::PowerPellet => {
            state.player.score += rules.power_pellet_score;
            events.push(GameEvent::PowerPelletEaten {
                position: tile_position,
                score: rules.power_pellet_score,
            });

            if rules.power_mode_duration_ms > 0.0 {
                state.power_remaining_ms = rules.power_mode_duration_ms;
                state.player.powered_up_until = Some(state.clock_ms + rules.power_mode_duration_ms);
                for ghost in &mut state.ghosts {
                    ghost.frighten(rules.power_mode_duration_ms, rules);
                }
            }
            debug!(
                frightened = state.ghosts.iter().filter(|g| g.mode == GhostMode::Frightened).count(),
                "Power pellet eaten"
            );
        }
        MapTile::Empty | MapTile::Wall => return,
    }

    state.tiles.set(tile_position, MapTile::Empty);
    state.pellets_remaining = state.pellets_remaining.saturating_sub(1);
}

/// Resolves every ghost sharing the player's tile.
///
/// Eyes are ignored. While powered the player captures the ghost; otherwise the player loses a
/// life and respawns. The player's tile is re-read for every ghost, so ghosts left behind by a
/// respawn no longer count. Stops as soon as the run is lost.
pub fn resolve_ghost_overlaps(state: &mut GameState, map: &Map, rules: &Ruleset, events: &mut Vec<GameEvent>) {
    for index in 0..state.ghosts.len() {
        let ghost = &state.ghosts[index];
        if ghost.mode == GhostMode::Eyes || ghost.tile() != state.player.tile() {
            continue;
        }

        if state.is_powered() {
            let ghost = &mut state.ghosts[index];
            ghost.capture(rules);
            state.player.score += rules.ghost_score;
            debug!(ghost = %ghost.id, score = state.player.score, "Ghost captured");
            events.push(GameEvent::GhostCaptured {
                ghost: ghost.id.clone(),
                score: rules.ghost_score,
            });
            continue;
        }

        state.player.lives = state.player.lives.saturating_sub(1);
        state.player.respawn(map.player_spawn());
        debug!(ghost = %ghost.id, lives = state.player.lives, "Life lost");
        events.push(GameEvent::LifeLost {
            lives_remaining: state.player.lives,
        });

        if state.player.lives == 0 {
            if let Some(previous) = state.set_status(GameStatus::Lost) {
                info!(score = state.player.score, tick = state.tick, "Run lost");
                events.push(GameEvent::StatusChanged {
                    from: previous,
                    to: GameStatus::Lost,
                });
            }
            return;
        }
    }
}
