use glam::{IVec2, Vec2};
use pathfinding::prelude::dijkstra_all;
use smallvec::SmallVec;
use tracing::debug;

use super::direction::Direction;
use super::grid::TileGrid;

/// A unique identifier for a walkable node: its index in the graph's walkable-node enumeration.
///
/// Nodes are enumerated in row-major order, so the id order matches the grid scan order.
pub type NodeId = usize;

/// Distance matrix entry for node pairs with no connecting path.
const UNREACHABLE: u32 = u32::MAX;

/// The walkable tiles of a map as an undirected, unweighted 4-connected graph.
///
/// All-pairs hop distances are precomputed when the graph is built so that a pathfinding query
/// during a tick costs a neighbour scan instead of a search.
#[derive(Debug, Clone)]
pub struct WalkableGraph {
    width: usize,
    height: usize,
    /// Row-major cell index to node id. `None` for walls.
    cell_to_node: Vec<Option<NodeId>>,
    /// Node id to grid position.
    nodes: Vec<IVec2>,
    /// Neighbours of each node, in [`Direction::DIRECTIONS`] order.
    adjacency: Vec<SmallVec<[NodeId; 4]>>,
    /// Dense `nodes x nodes` hop counts.
    distances: Vec<Vec<u32>>,
}

impl WalkableGraph {
    /// Builds the adjacency lists and the all-pairs distance table for `grid`.
    pub fn build(grid: &TileGrid) -> Self {
        let span = tracing::debug_span!("build_graph", width = grid.width(), height = grid.height());
        let _enter = span.enter();

        let mut cell_to_node = vec![None; grid.width() * grid.height()];
        let mut nodes = Vec::new();
        for (position, tile) in grid.iter() {
            if tile.is_walkable() {
                if let Some(index) = grid.index_of(position) {
                    cell_to_node[index] = Some(nodes.len());
                    nodes.push(position);
                }
            }
        }

        let adjacency: Vec<SmallVec<[NodeId; 4]>> = nodes
            .iter()
            .map(|&position| {
                Direction::DIRECTIONS
                    .iter()
                    .filter_map(|direction| {
                        let neighbor = position + direction.as_ivec2();
                        grid.index_of(neighbor).and_then(|index| cell_to_node[index])
                    })
                    .collect()
            })
            .collect();

        let distances = (0..nodes.len())
            .map(|start| {
                let mut row = vec![UNREACHABLE; nodes.len()];
                row[start] = 0;
                let reached = dijkstra_all(&start, |&node: &NodeId| {
                    adjacency[node]
                        .iter()
                        .map(|&neighbor| (neighbor, 1u32))
                        .collect::<SmallVec<[(NodeId, u32); 4]>>()
                });
                for (node, (_, hops)) in reached {
                    row[node] = hops;
                }
                row
            })
            .collect();

        debug!(nodes = nodes.len(), "Walkable graph built");

        Self {
            width: grid.width(),
            height: grid.height(),
            cell_to_node,
            nodes,
            adjacency,
            distances,
        }
    }

    /// Total number of walkable nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every walkable position, in node id order.
    pub fn walkable_nodes(&self) -> &[IVec2] {
        &self.nodes
    }

    /// The node sitting exactly on `position`, if that tile is walkable.
    pub fn node_at(&self, position: IVec2) -> Option<NodeId> {
        if position.x < 0 || position.y < 0 || position.x as usize >= self.width {
            return None;
        }
        let index = position.y as usize * self.width + position.x as usize;
        self.cell_to_node.get(index).copied().flatten()
    }

    /// Grid position of a node.
    pub fn position(&self, node: NodeId) -> Option<IVec2> {
        self.nodes.get(node).copied()
    }

    /// Neighbours of `node`, in scan order. Empty for unknown nodes.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.adjacency.get(node).map(|n| n.as_slice()).unwrap_or(&[])
    }

    /// Neighbours of `node` paired with the direction that reaches them.
    pub fn neighbor_directions(&self, node: NodeId) -> impl Iterator<Item = (Direction, NodeId)> + '_ {
        let origin = self.position(node);
        self.neighbors(node).iter().filter_map(move |&neighbor| {
            let delta = self.nodes[neighbor] - origin?;
            Direction::from_delta(delta).map(|direction| (direction, neighbor))
        })
    }

    /// Hop count between two nodes, or `None` when no path connects them.
    pub fn distance(&self, from: NodeId, to: NodeId) -> Option<u32> {
        self.distances
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .filter(|&hops| hops != UNREACHABLE)
    }

    /// The walkable node closest to `point` by Manhattan distance.
    ///
    /// `point` is rounded to the nearest tile and clamped onto the grid first. Ties go to the node
    /// that comes first in [`WalkableGraph::walkable_nodes`]. Returns `None` only for a graph with no nodes.
    pub fn nearest_walkable(&self, point: Vec2) -> Option<NodeId> {
        let snapped = self.clamp(point.round().as_ivec2());
        if let Some(node) = self.node_at(snapped) {
            return Some(node);
        }

        let mut best: Option<(NodeId, i32)> = None;
        for (node, position) in self.nodes.iter().enumerate() {
            let distance = (*position - snapped).abs().element_sum();
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((node, distance));
            }
        }
        best.map(|(node, _)| node)
    }

    fn clamp(&self, position: IVec2) -> IVec2 {
        let max = IVec2::new(self.width.max(1) as i32 - 1, self.height.max(1) as i32 - 1);
        position.clamp(IVec2::ZERO, max)
    }
}
