use glam::IVec2;
use serde::Serialize;

use crate::constants::MapTile;
use crate::error::MapError;

/// A rectangular, row-major grid of tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<MapTile>,
}

impl TileGrid {
    /// Builds a grid from rows, rejecting empty or ragged input.
    pub fn from_rows(rows: Vec<Vec<MapTile>>) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(MapError::EmptyTiles);
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(MapError::NonRectangular {
                    row: row_index,
                    expected: width,
                    found: row.len(),
                });
            }
            tiles.extend(row);
        }

        Ok(Self { width, height, tiles })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }

    pub fn in_bounds(&self, position: IVec2) -> bool {
        position.x >= 0 && position.y >= 0 && (position.x as usize) < self.width && (position.y as usize) < self.height
    }

    /// Row-major index of `position`, if it lies on the grid.
    pub fn index_of(&self, position: IVec2) -> Option<usize> {
        self.in_bounds(position)
            .then(|| position.y as usize * self.width + position.x as usize)
    }

    /// Inverse of [`TileGrid::index_of`].
    pub fn position_of(&self, index: usize) -> IVec2 {
        IVec2::new((index % self.width) as i32, (index / self.width) as i32)
    }

    pub fn get(&self, position: IVec2) -> Option<MapTile> {
        self.index_of(position).map(|index| self.tiles[index])
    }

    /// Overwrites a tile. Positions off the grid are ignored.
    pub fn set(&mut self, position: IVec2, tile: MapTile) {
        if let Some(index) = self.index_of(position) {
            self.tiles[index] = tile;
        }
    }

    /// Whether `position` blocks movement. Everything off the grid counts as a wall.
    pub fn is_blocked(&self, position: IVec2) -> bool {
        !self.get(position).is_some_and(MapTile::is_walkable)
    }

    /// Number of pellet and power-pellet tiles.
    pub fn pellet_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_pellet()).count()
    }

    /// Iterates over every tile with its position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, MapTile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| (self.position_of(index), *tile))
    }

    /// Clamps a position onto the grid.
    pub fn clamp(&self, position: IVec2) -> IVec2 {
        position.clamp(IVec2::ZERO, self.size() - IVec2::ONE)
    }
}
