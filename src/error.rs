//! Centralized error types for the simulation core.
//!
//! Only loading can fail. Once a map and ruleset have been validated, ticking is infallible:
//! degenerate conditions (unreachable targets, boxed-in ghosts) degrade to "hold position".

use std::io;

/// Main error type for the simulation core.
///
/// This is the primary error type that should be used in public APIs.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Ruleset error: {0}")]
    Rules(#[from] RulesError),

    #[error("Sprite atlas error: {0}")]
    Atlas(#[from] AtlasError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Error type for the legacy ASCII layout parser.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in layout: {0:?}")]
    UnknownCharacter(char),
    #[error("Legend key must be a single character, found {0:?}")]
    InvalidLegendKey(String),
    #[error("Layout row {row} has length {found}, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("Layout is empty")]
    EmptyLayout,
}

/// Errors raised while validating a map definition.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MapError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid map dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("Tile grid is empty")]
    EmptyTiles,

    #[error("Tile grid has {found} rows, expected {expected}")]
    HeightMismatch { expected: usize, found: usize },

    #[error("Tile row {row} has {found} columns, expected {expected}")]
    NonRectangular { row: usize, expected: usize, found: usize },

    #[error("Unknown tile code {code} at ({x}, {y})")]
    UnknownTileCode { code: i64, x: usize, y: usize },

    #[error("Map has no walkable tiles")]
    NoWalkableTiles,

    #[error("{what} spawn ({x}, {y}) is {reason}")]
    InvalidSpawn { what: &'static str, x: f32, y: f32, reason: &'static str },
}

/// Errors raised while validating a ruleset.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RulesError {
    #[error("Missing required rules field: {0}")]
    MissingField(&'static str),

    #[error("Invalid rules value for {field}: {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("Invalid rules value for {field}: {value} ({reason})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Errors raised while validating a sprite atlas.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AtlasError {
    #[error("Sprite atlas version must not be empty")]
    MissingVersion,

    #[error("Sprite {0:?} has a frame with a non-finite or negative component")]
    InvalidFrame(String),
}

/// Result type for loading operations.
pub type GameResult<T> = Result<T, GameError>;
