//! Map construction and validation.

use glam::{IVec2, Vec2};
use tracing::{debug, info};

use crate::asset::{AnyMapAsset, LegacyMapAsset, MapAsset, Point};
use crate::constants::{MapTile, DEFAULT_LAYOUT, DEFAULT_TILE_SIZE};
use crate::error::{GameResult, MapError};
use crate::map::graph::WalkableGraph;
use crate::map::grid::TileGrid;
use crate::map::parser::LayoutParser;

/// Identifier given to legacy maps, which carry no metadata of their own.
const LEGACY_ID: &str = "legacy";

/// A validated map: the pristine tile grid, its walkable graph and the spawn points.
///
/// Immutable once built. Pellets eaten during a run are tracked on a copy of the grid owned by
/// the game state.
#[derive(Debug, Clone)]
pub struct Map {
    id: String,
    version: String,
    tile_size: u32,
    tiles: TileGrid,
    graph: WalkableGraph,
    pellet_count: usize,
    player_spawn: IVec2,
    ghost_spawns: Vec<IVec2>,
}

impl Map {
    /// Loads a map from JSON, accepting both the canonical and the legacy ASCII shape.
    pub fn from_json(json: &str) -> GameResult<Map> {
        match AnyMapAsset::from_json(json)? {
            AnyMapAsset::Canonical(raw) => Map::from_asset(&raw),
            AnyMapAsset::Legacy(raw) => Map::from_legacy(&raw),
        }
    }

    /// Validates a canonical map asset.
    ///
    /// # Errors
    ///
    /// Returns an error if metadata is missing, the dimensions are not positive, the tile grid is
    /// empty, non-rectangular or disagrees with the declared size, a tile code is unknown, no tile
    /// is walkable, or an explicit spawn sits on a wall or off the grid.
    pub fn from_asset(raw: &MapAsset) -> GameResult<Map> {
        let id = raw.id.clone().ok_or(MapError::MissingField("id"))?;
        let version = raw.version.clone().ok_or(MapError::MissingField("version"))?;
        let width = raw.width.ok_or(MapError::MissingField("width"))?;
        let height = raw.height.ok_or(MapError::MissingField("height"))?;
        if width <= 0 || height <= 0 {
            return Err(MapError::InvalidDimensions { width, height }.into());
        }

        let codes = raw.tiles.as_ref().ok_or(MapError::MissingField("tiles"))?;
        if codes.is_empty() {
            return Err(MapError::EmptyTiles.into());
        }
        if codes.len() != height as usize {
            return Err(MapError::HeightMismatch {
                expected: height as usize,
                found: codes.len(),
            }
            .into());
        }

        let mut rows = Vec::with_capacity(codes.len());
        for (y, row) in codes.iter().enumerate() {
            if row.len() != width as usize {
                return Err(MapError::NonRectangular {
                    row: y,
                    expected: width as usize,
                    found: row.len(),
                }
                .into());
            }
            let tiles = row
                .iter()
                .enumerate()
                .map(|(x, &code)| {
                    u8::try_from(code)
                        .ok()
                        .and_then(MapTile::from_code)
                        .ok_or(MapError::UnknownTileCode { code, x, y })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(tiles);
        }

        let grid = TileGrid::from_rows(rows)?;
        let player_spawn = raw
            .player_spawn
            .map(|point| validate_spawn(&grid, "Player", point))
            .transpose()?;
        let ghost_spawns = raw
            .ghost_spawns
            .iter()
            .flatten()
            .map(|&point| validate_spawn(&grid, "Ghost", point))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Map::build(
            id,
            version,
            raw.tile_size.unwrap_or(DEFAULT_TILE_SIZE),
            grid,
            player_spawn,
            ghost_spawns,
        )?)
    }

    /// Builds a map from a legacy ASCII asset, falling back to the built-in layout.
    pub fn from_legacy(raw: &LegacyMapAsset) -> GameResult<Map> {
        let parser = match &raw.legend {
            Some(legend) => LayoutParser::with_legend(legend)?,
            None => LayoutParser::default(),
        };
        let parsed = match raw.layout.as_deref() {
            Some(layout) if !layout.is_empty() => parser.parse_layout(layout)?,
            _ => parser.parse_layout(&DEFAULT_LAYOUT)?,
        };

        let grid = TileGrid::from_rows(parsed.rows)?;
        let id = raw.id.clone().unwrap_or_else(|| LEGACY_ID.to_string());
        Ok(Map::build(
            id,
            LEGACY_ID.to_string(),
            raw.tile_size.unwrap_or(DEFAULT_TILE_SIZE),
            grid,
            parsed.player_spawn,
            parsed.ghost_spawns,
        )?)
    }

    /// Builds a map from an ASCII layout using the built-in legend.
    pub fn from_layout<S: AsRef<str>>(layout: &[S]) -> GameResult<Map> {
        let parsed = LayoutParser::default().parse_layout(layout)?;
        let grid = TileGrid::from_rows(parsed.rows)?;
        Ok(Map::build(
            LEGACY_ID.to_string(),
            LEGACY_ID.to_string(),
            DEFAULT_TILE_SIZE,
            grid,
            parsed.player_spawn,
            parsed.ghost_spawns,
        )?)
    }

    fn build(
        id: String,
        version: String,
        tile_size: u32,
        tiles: TileGrid,
        player_spawn: Option<IVec2>,
        ghost_spawns: Vec<IVec2>,
    ) -> Result<Map, MapError> {
        let graph = WalkableGraph::build(&tiles);
        if graph.node_count() == 0 {
            return Err(MapError::NoWalkableTiles);
        }

        let player_spawn = match player_spawn {
            Some(spawn) => spawn,
            None => {
                let center = tiles.clamp(tiles.size() / 2);
                let spawn = graph
                    .nearest_walkable(center.as_vec2())
                    .and_then(|node| graph.position(node))
                    .ok_or(MapError::NoWalkableTiles)?;
                debug!(x = spawn.x, y = spawn.y, "No player spawn given, using the grid centre");
                spawn
            }
        };

        let ghost_spawns = if ghost_spawns.is_empty() {
            let adjacent: Vec<IVec2> = graph
                .node_at(player_spawn)
                .map(|node| {
                    graph
                        .neighbors(node)
                        .iter()
                        .take(2)
                        .filter_map(|&neighbor| graph.position(neighbor))
                        .collect()
                })
                .unwrap_or_default();
            debug!(count = adjacent.len().max(1), "No ghost spawns given, placing ghosts beside the player");
            if adjacent.is_empty() {
                vec![player_spawn]
            } else {
                adjacent
            }
        } else {
            ghost_spawns
        };

        let pellet_count = tiles.pellet_count();
        info!(
            id = %id,
            width = tiles.width(),
            height = tiles.height(),
            pellets = pellet_count,
            ghosts = ghost_spawns.len(),
            "Map loaded"
        );

        Ok(Map {
            id,
            version,
            tile_size,
            tiles,
            graph,
            pellet_count,
            player_spawn,
            ghost_spawns,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Tile size in pixels, passed through to renderers.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn width(&self) -> usize {
        self.tiles.width()
    }

    pub fn height(&self) -> usize {
        self.tiles.height()
    }

    /// The tile grid as loaded, before any pellet was eaten.
    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    pub fn graph(&self) -> &WalkableGraph {
        &self.graph
    }

    /// Pellets and power pellets on the map at load time.
    pub fn pellet_count(&self) -> usize {
        self.pellet_count
    }

    pub fn player_spawn(&self) -> IVec2 {
        self.player_spawn
    }

    pub fn ghost_spawns(&self) -> &[IVec2] {
        &self.ghost_spawns
    }
}

fn validate_spawn(grid: &TileGrid, what: &'static str, point: Point) -> Result<IVec2, MapError> {
    let invalid = |reason| MapError::InvalidSpawn {
        what,
        x: point.x,
        y: point.y,
        reason,
    };
    if !point.x.is_finite() || !point.y.is_finite() {
        return Err(invalid("not a finite position"));
    }

    let tile = Vec2::from(point).round().as_ivec2();
    match grid.get(tile) {
        None => Err(invalid("outside the grid")),
        Some(MapTile::Wall) => Err(invalid("on a wall")),
        Some(_) => Ok(tile),
    }
}
