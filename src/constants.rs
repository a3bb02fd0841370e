//! This module contains all the constants used by the simulation.

use serde::Serialize;
use strum_macros::AsRefStr;

/// An enum representing the different types of tiles on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MapTile {
    /// An empty, walkable tile.
    Empty,
    /// A wall tile.
    Wall,
    /// A regular pellet.
    Pellet,
    /// A power pellet.
    PowerPellet,
}

impl MapTile {
    /// Decodes a tile from the numeric codes used by the JSON map asset.
    pub fn from_code(code: u8) -> Option<MapTile> {
        match code {
            0 => Some(MapTile::Empty),
            1 => Some(MapTile::Wall),
            2 => Some(MapTile::Pellet),
            3 => Some(MapTile::PowerPellet),
            _ => None,
        }
    }

    /// Returns the numeric code of this tile in the JSON map asset.
    pub const fn code(self) -> u8 {
        match self {
            MapTile::Empty => 0,
            MapTile::Wall => 1,
            MapTile::Pellet => 2,
            MapTile::PowerPellet => 3,
        }
    }

    pub const fn is_walkable(self) -> bool {
        !matches!(self, MapTile::Wall)
    }

    /// Whether this tile holds something the player can consume.
    pub const fn is_pellet(self) -> bool {
        matches!(self, MapTile::Pellet | MapTile::PowerPellet)
    }
}

/// The default on-screen size of a tile, in pixels. Only passed through to renderers.
pub const DEFAULT_TILE_SIZE: u32 = 24;

/// Lives the player starts a run with when the ruleset does not say otherwise.
pub const DEFAULT_STARTING_LIVES: u32 = 3;

/// Default player speed, in tiles per tick.
pub const DEFAULT_PLAYER_SPEED: f32 = 1.0;
/// Default ghost speed, in tiles per tick.
pub const DEFAULT_GHOST_SPEED: f32 = 0.9;
/// Multiplier applied to a ghost's speed while it is frightened.
pub const DEFAULT_FRIGHTENED_SPEED_FACTOR: f32 = 0.8;
/// Frightened ghosts never drop below this speed, in tiles per tick.
pub const MIN_FRIGHTENED_SPEED: f32 = 0.2;
/// Multiplier applied to a ghost's speed while it returns home as eyes.
pub const DEFAULT_EYES_SPEED_FACTOR: f32 = 2.0;
/// Default top speed of the continuous movement model, in tiles per second.
pub const DEFAULT_MAX_PLAYER_SPEED: f32 = 1.0;
/// Per-tick velocity gain of the continuous model is `tickRate * this`.
pub const DEFAULT_ACCELERATION_PER_TICK_RATE: f32 = 0.002;

/// Largest displacement, in tiles, applied per collision-checked sub-step.
pub const MAX_SUB_STEP: f32 = 0.5;
/// Remaining displacement below this is considered consumed.
pub const SUB_STEP_EPSILON: f32 = 1e-6;

/// Ghost targeting tuning.
pub mod targeting {
    /// How far ahead of the player the ambusher aims.
    pub const AMBUSH_TILES_AHEAD: i32 = 4;
    /// How far ahead of the player the flanker's reference point sits.
    pub const FLANK_TILES_AHEAD: i32 = 2;
    /// The opportunist gives up the chase once it is this close (Manhattan) to the player.
    pub const OPPORTUNIST_FLEE_DISTANCE: i32 = 8;
}

/// Identities handed to ghosts in spawn order.
pub const GHOST_IDS: [&str; 4] = ["blinky", "pinky", "inky", "clyde"];

/// The layout used when a legacy map asset does not provide one.
pub const DEFAULT_LAYOUT: [&str; 6] = [
    "##########",
    "#........#",
    "#.####...#",
    "#.#P..G..#",
    "#........#",
    "##########",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_codes_round_trip() {
        for tile in [MapTile::Empty, MapTile::Wall, MapTile::Pellet, MapTile::PowerPellet] {
            assert_eq!(MapTile::from_code(tile.code()), Some(tile));
        }
        assert_eq!(MapTile::from_code(4), None);
    }

    #[test]
    fn test_tile_predicates() {
        assert!(!MapTile::Wall.is_walkable());
        assert!(MapTile::Empty.is_walkable());
        assert!(MapTile::PowerPellet.is_pellet());
        assert!(!MapTile::Empty.is_pellet());
    }

    #[test]
    fn test_tile_names() {
        assert_eq!(MapTile::PowerPellet.as_ref(), "power-pellet");
        assert_eq!(MapTile::Wall.as_ref(), "wall");
    }

    #[test]
    fn test_default_layout_is_rectangular() {
        let width = DEFAULT_LAYOUT[0].len();
        assert!(DEFAULT_LAYOUT.iter().all(|row| row.len() == width));
        assert_eq!(DEFAULT_LAYOUT.iter().filter(|row| row.contains('P')).count(), 1);
    }
}
