//! Movement resolvers.
//!
//! The discrete resolver moves whole tiles and is used for ghosts and, by default, the player.
//! The continuous resolver integrates a velocity and advances in short, wall-checked sub-steps.

use glam::{IVec2, Vec2};
use tracing::trace;

use crate::constants::{MAX_SUB_STEP, SUB_STEP_EPSILON};
use crate::game::state::PlayerState;
use crate::map::direction::Direction;
use crate::map::grid::TileGrid;

/// Whether a one-tile step from `position` in `direction` stays on a walkable tile.
pub fn can_move(tiles: &TileGrid, position: IVec2, direction: Direction) -> bool {
    !tiles.is_blocked(position + direction.as_ivec2())
}

/// The outcome of one discrete step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub position: IVec2,
    pub direction: Option<Direction>,
    pub moved: bool,
}

/// Resolves one discrete step.
///
/// `desired` wins when it is open; otherwise the entity carries on along `facing`. When both are
/// blocked the entity stays put and keeps its facing.
pub fn step_discrete(tiles: &TileGrid, position: IVec2, facing: Option<Direction>, desired: Option<Direction>) -> Step {
    let open = [desired, facing]
        .into_iter()
        .flatten()
        .find(|&direction| can_move(tiles, position, direction));

    match open {
        Some(direction) => Step {
            position: position + direction.as_ivec2(),
            direction: Some(direction),
            moved: true,
        },
        None => Step {
            position,
            direction: facing,
            moved: false,
        },
    }
}

/// Moves the player one tile with the discrete resolver, buffering `desired` as the pending turn.
pub fn move_player_discrete(player: &mut PlayerState, tiles: &TileGrid, desired: Option<Direction>) -> bool {
    let step = step_discrete(tiles, player.tile(), player.direction, desired);
    player.pending_direction = desired;
    player.direction = step.direction;
    if step.moved {
        player.position = step.position.as_vec2();
        trace!(x = step.position.x, y = step.position.y, "Player stepped");
    }
    step.moved
}

/// Spends a movement budget in whole tiles.
///
/// `speed` tiles are added to `budget`, then `step` runs once per whole tile. A step that does not
/// move ends the loop and drops the remaining budget, so stationary entities never bank movement.
pub fn spend_budget(budget: &mut f32, speed: f32, mut step: impl FnMut() -> bool) {
    *budget += speed;
    while *budget >= 1.0 {
        if !step() {
            *budget = 0.0;
            return;
        }
        *budget -= 1.0;
    }
}

/// Advances `position` along one axis by `movement`, in sub-steps of at most [`MAX_SUB_STEP`].
///
/// Stops before the first sub-step whose rounded tile is a wall or off the grid.
fn resolve_axis(tiles: &TileGrid, position: Vec2, movement: f32, horizontal: bool) -> Vec2 {
    let mut next = position;
    let mut remaining = movement;
    let sign = movement.signum();

    while remaining.abs() > SUB_STEP_EPSILON {
        let step = remaining.abs().min(MAX_SUB_STEP) * sign;
        let candidate = if horizontal {
            Vec2::new(next.x + step, next.y)
        } else {
            Vec2::new(next.x, next.y + step)
        };
        if tiles.is_blocked(candidate.round().as_ivec2()) {
            break;
        }
        next = candidate;
        remaining -= step;
    }
    next
}

/// Integrates the player's velocity from `acceleration` and moves it for `dt_ms`.
///
/// Each velocity component is clamped to `max_speed` (tiles per second). The x axis is resolved
/// before the y axis, and a blocked axis zeroes its velocity component.
pub fn integrate_continuous(
    player: &mut PlayerState,
    tiles: &TileGrid,
    acceleration: Vec2,
    gain: f32,
    max_speed: f32,
    dt_ms: f64,
) {
    let velocity = (player.velocity + acceleration * gain).clamp(Vec2::splat(-max_speed), Vec2::splat(max_speed));
    let dt = (dt_ms / 1000.0) as f32;
    let displacement = velocity * dt;

    let after_x = resolve_axis(tiles, player.position, displacement.x, true);
    let after_y = resolve_axis(tiles, after_x, displacement.y, false);

    let mut velocity = velocity;
    if (after_x.x - player.position.x - displacement.x).abs() > SUB_STEP_EPSILON {
        velocity.x = 0.0;
    }
    if (after_y.y - after_x.y - displacement.y).abs() > SUB_STEP_EPSILON {
        velocity.y = 0.0;
    }

    player.position = after_y;
    player.velocity = velocity;
    if let Some(direction) = Direction::dominant(velocity) {
        player.direction = Some(direction);
    }
}
