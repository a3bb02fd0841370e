use glam::IVec2;
use tracing::{trace, warn};

use crate::game::state::{GhostState, PlayerState};
use crate::map::builder::Map;
use crate::map::direction::Direction;
use crate::map::grid::TileGrid;
use crate::map::pathfinding::next_step_direction_avoiding;
use crate::systems::movement::{spend_budget, step_discrete};
use crate::systems::targeting::target_for;

/// Picks a ghost's next direction: toward its mode's target, never straight back the way it came
/// unless that is the only way out.
///
/// Returns `None` when the ghost has reached its target, the target is unreachable, or the ghost is
/// boxed in. The ghost then holds position.
pub fn choose_direction(ghost: &GhostState, player: &PlayerState, map: &Map, ghosts: &[GhostState]) -> Option<Direction> {
    let size = IVec2::new(map.width() as i32, map.height() as i32);
    let target = target_for(ghost, player, ghosts, size);
    let reverse = ghost.direction.map(Direction::opposite);

    let direction = next_step_direction_avoiding(ghost.position, target.as_vec2(), map.graph(), reverse);

    if direction.is_none() {
        let stuck = map
            .graph()
            .node_at(ghost.tile())
            .is_some_and(|node| map.graph().neighbors(node).is_empty());
        if stuck {
            warn!(ghost = %ghost.id, x = ghost.position.x, y = ghost.position.y, "Ghost stuck with no available directions");
        }
    } else if direction == reverse {
        trace!(ghost = %ghost.id, direction = ?direction, "Ghost forced to reverse direction");
    }

    direction
}

/// Moves one ghost for a tick, re-planning at every tile.
pub fn move_ghost(index: usize, ghosts: &mut [GhostState], player: &PlayerState, map: &Map, tiles: &TileGrid) {
    let speed = ghosts[index].speed;
    let mut budget = ghosts[index].move_budget;

    spend_budget(&mut budget, speed, || {
        let Some(direction) = choose_direction(&ghosts[index], player, map, ghosts) else {
            return false;
        };
        let ghost = &mut ghosts[index];
        let step = step_discrete(tiles, ghost.tile(), None, Some(direction));
        if step.moved {
            ghost.position = step.position.as_vec2();
            ghost.direction = step.direction;
            trace!(ghost = %ghost.id, direction = direction.as_ref(), x = step.position.x, y = step.position.y, "Ghost stepped");
        }
        step.moved
    });

    ghosts[index].move_budget = budget;
}
