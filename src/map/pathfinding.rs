//! Next-step queries against the precomputed walkable graph.
//!
//! Every query snaps its endpoints to the nearest walkable node first, so fractional and
//! off-grid positions are accepted. Queries never allocate and never fail: anything degenerate
//! yields `None`.

use glam::Vec2;
use tracing::trace;

use super::direction::Direction;
use super::graph::{NodeId, WalkableGraph};

/// Snaps both endpoints, returning `None` if they coincide or the graph is empty.
fn snap_endpoints(start: Vec2, target: Vec2, graph: &WalkableGraph) -> Option<(NodeId, NodeId)> {
    let start = graph.nearest_walkable(start)?;
    let target = graph.nearest_walkable(target)?;
    (start != target).then_some((start, target))
}

/// The first direction to take along a shortest path from `start` to `target`.
///
/// Ties between equally short paths are broken in [`Direction::DIRECTIONS`] order. Returns `None`
/// when `start` and `target` snap to the same node or when `target` is unreachable.
pub fn next_step_direction(start: Vec2, target: Vec2, graph: &WalkableGraph) -> Option<Direction> {
    next_step_direction_avoiding(start, target, graph, None)
}

/// Like [`next_step_direction`], but never picks `avoid` unless it is the only way out of
/// `start`.
pub fn next_step_direction_avoiding(
    start: Vec2,
    target: Vec2,
    graph: &WalkableGraph,
    avoid: Option<Direction>,
) -> Option<Direction> {
    let (start, target) = snap_endpoints(start, target, graph)?;
    graph.distance(start, target)?;

    let mut best: Option<(Direction, u32)> = None;
    let mut avoided = None;
    for (direction, neighbor) in graph.neighbor_directions(start) {
        if Some(direction) == avoid {
            avoided = Some(direction);
            continue;
        }
        let Some(distance) = graph.distance(neighbor, target) else {
            continue;
        };
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((direction, distance));
        }
    }

    match best {
        Some((direction, _)) => Some(direction),
        None => {
            if let Some(direction) = avoided {
                trace!(direction = direction.as_ref(), "Dead end, reversing");
            }
            avoided
        }
    }
}

/// Hop distance between the nodes nearest to `a` and `b`, or `None` if they are not connected.
pub fn distance_between(a: Vec2, b: Vec2, graph: &WalkableGraph) -> Option<u32> {
    let a = graph.nearest_walkable(a)?;
    let b = graph.nearest_walkable(b)?;
    graph.distance(a, b)
}
