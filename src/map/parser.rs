//! Parsing of legacy ASCII layouts into tile rows and spawn points.

use std::collections::HashMap;

use glam::IVec2;
use serde::Deserialize;
use strum_macros::{AsRefStr, EnumString};
use tracing::debug;

use crate::constants::MapTile;
use crate::error::ParseError;

/// What a layout character stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LegendSymbol {
    Wall,
    Empty,
    Pellet,
    PowerPellet,
    /// The player's spawn point, on top of a pellet.
    Player,
    /// A ghost spawn point, on top of a pellet.
    Ghost,
}

impl LegendSymbol {
    /// The tile left on the grid under this symbol.
    pub const fn tile(self) -> MapTile {
        match self {
            LegendSymbol::Wall => MapTile::Wall,
            LegendSymbol::Empty => MapTile::Empty,
            LegendSymbol::Pellet | LegendSymbol::Player | LegendSymbol::Ghost => MapTile::Pellet,
            LegendSymbol::PowerPellet => MapTile::PowerPellet,
        }
    }
}

/// The result of parsing a layout.
#[derive(Debug)]
pub struct ParsedLayout {
    /// Tile rows, top to bottom.
    pub rows: Vec<Vec<MapTile>>,
    /// The last player symbol found, if any.
    pub player_spawn: Option<IVec2>,
    /// Every ghost symbol, in scan order.
    pub ghost_spawns: Vec<IVec2>,
}

/// Parser for converting ASCII layouts into structured map data.
#[derive(Debug, Clone)]
pub struct LayoutParser {
    legend: HashMap<char, LegendSymbol>,
}

impl Default for LayoutParser {
    fn default() -> Self {
        let legend = [
            ('#', LegendSymbol::Wall),
            ('.', LegendSymbol::Pellet),
            ('o', LegendSymbol::PowerPellet),
            ('O', LegendSymbol::PowerPellet),
            (' ', LegendSymbol::Empty),
            ('P', LegendSymbol::Player),
            ('G', LegendSymbol::Ghost),
        ]
        .into_iter()
        .collect();
        Self { legend }
    }
}

impl LayoutParser {
    /// Creates a parser whose built-in legend is overridden, per character, by `overrides`.
    ///
    /// # Errors
    ///
    /// Returns an error if a legend key is not exactly one character long.
    pub fn with_legend(overrides: &HashMap<String, LegendSymbol>) -> Result<Self, ParseError> {
        let mut parser = Self::default();
        for (key, symbol) in overrides {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(character), None) => {
                    parser.legend.insert(character, *symbol);
                }
                _ => return Err(ParseError::InvalidLegendKey(key.clone())),
            }
        }
        Ok(parser)
    }

    /// Parses a single character into a legend symbol.
    pub fn parse_character(&self, c: char) -> Result<LegendSymbol, ParseError> {
        self.legend.get(&c).copied().ok_or(ParseError::UnknownCharacter(c))
    }

    /// Parses a layout into tile rows and spawn points.
    ///
    /// Characters missing from the legend become empty tiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is empty or its rows differ in length.
    pub fn parse_layout<S: AsRef<str>>(&self, layout: &[S]) -> Result<ParsedLayout, ParseError> {
        let width = layout.first().map(|row| row.as_ref().chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(ParseError::EmptyLayout);
        }

        let mut rows = Vec::with_capacity(layout.len());
        let mut player_spawn = None;
        let mut ghost_spawns = Vec::new();

        for (y, line) in layout.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(ParseError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }

            let mut row = Vec::with_capacity(width);
            for (x, character) in line.chars().enumerate() {
                let position = IVec2::new(x as i32, y as i32);
                let symbol = self.parse_character(character).unwrap_or_else(|_| {
                    debug!(?character, x, y, "Unknown layout character, treating as empty");
                    LegendSymbol::Empty
                });
                match symbol {
                    LegendSymbol::Player => player_spawn = Some(position),
                    LegendSymbol::Ghost => ghost_spawns.push(position),
                    _ => {}
                }
                row.push(symbol.tile());
            }
            rows.push(row);
        }

        Ok(ParsedLayout {
            rows,
            player_spawn,
            ghost_spawns,
        })
    }
}
