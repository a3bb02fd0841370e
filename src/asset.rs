//! Serde schemas for the JSON assets the simulation is loaded from.
//!
//! These are raw shapes only. Validation happens where the assets are turned into
//! [`Map`](crate::map::builder::Map), [`Ruleset`](crate::rules::Ruleset) and [`SpriteAtlas`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AtlasError, GameResult};
use crate::map::parser::LegendSymbol;

/// A 2D point as written in assets: `{"x": .., "y": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Point> for Vec2 {
    fn from(point: Point) -> Self {
        Vec2::new(point.x, point.y)
    }
}

/// The canonical map asset.
///
/// Required fields are optional here so that a missing one is reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapAsset {
    pub id: Option<String>,
    pub version: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub tile_size: Option<u32>,
    /// Tile codes, `tiles[y][x]`.
    pub tiles: Option<Vec<Vec<i64>>>,
    pub player_spawn: Option<Point>,
    pub ghost_spawns: Option<Vec<Point>>,
}

/// The legacy ASCII map asset. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LegacyMapAsset {
    pub id: Option<String>,
    pub layout: Option<Vec<String>>,
    pub legend: Option<HashMap<String, LegendSymbol>>,
    pub tile_size: Option<u32>,
}

/// Keys only the canonical map shape carries.
const CANONICAL_KEYS: [&str; 6] = ["tiles", "width", "height", "version", "playerSpawn", "ghostSpawns"];

/// Either map asset shape.
#[derive(Debug, Clone)]
pub enum AnyMapAsset {
    Legacy(LegacyMapAsset),
    Canonical(MapAsset),
}

impl AnyMapAsset {
    /// Detects the shape of a map asset and deserializes it as that shape.
    ///
    /// An object with a `layout` or `legend` key, or with none of the canonical keys, is a legacy
    /// asset. Anything else is canonical. Errors come from the detected shape alone.
    pub fn from_json(json: &str) -> GameResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let canonical = value.as_object().is_some_and(|object| {
            !object.contains_key("layout")
                && !object.contains_key("legend")
                && CANONICAL_KEYS.iter().any(|key| object.contains_key(*key))
        });

        if canonical {
            Ok(AnyMapAsset::Canonical(serde_json::from_value(value)?))
        } else {
            Ok(AnyMapAsset::Legacy(serde_json::from_value(value)?))
        }
    }
}

/// The ruleset asset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesAsset {
    pub tick_rate: Option<f64>,
    pub pellet_score: Option<f64>,
    pub power_pellet_score: Option<f64>,
    pub ghost_score: Option<f64>,
    pub power_mode_duration_ms: Option<f64>,
    pub player_speed: Option<f64>,
    pub ghost_speed: Option<f64>,
    pub frightened_speed_factor: Option<f64>,
    pub eyes_speed_factor: Option<f64>,
    pub starting_lives: Option<f64>,
    pub max_player_speed: Option<f64>,
    pub player_acceleration: Option<f64>,
}

/// A single frame of a sprite atlas.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SpriteFrame {
    /// `[x, y, width, height]` within the atlas image.
    pub frame: [f32; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Point>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSpriteAtlas {
    version: Option<String>,
    #[serde(default)]
    base_path: String,
    #[serde(default)]
    sprites: HashMap<String, SpriteFrame>,
}

/// Sprite metadata for renderers. The simulation only looks frames up by sprite id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteAtlas {
    pub version: String,
    pub base_path: String,
    pub sprites: HashMap<String, SpriteFrame>,
}

impl SpriteAtlas {
    /// Parses and validates a sprite atlas.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, a missing or empty `version`, or a frame with a negative or
    /// non-finite component.
    pub fn from_json(json: &str) -> GameResult<Self> {
        let raw: RawSpriteAtlas = serde_json::from_str(json)?;

        let version = raw.version.filter(|v| !v.is_empty()).ok_or(AtlasError::MissingVersion)?;
        if let Some((name, _)) = raw
            .sprites
            .iter()
            .find(|(_, sprite)| sprite.frame.iter().any(|c| !c.is_finite() || *c < 0.0))
        {
            return Err(AtlasError::InvalidFrame(name.clone()).into());
        }

        debug!(version = %version, sprites = raw.sprites.len(), "Sprite atlas loaded");
        Ok(Self {
            version,
            base_path: raw.base_path,
            sprites: raw.sprites,
        })
    }

    pub fn frame(&self, sprite_id: &str) -> Option<&SpriteFrame> {
        self.sprites.get(sprite_id)
    }
}

/// Deserializes any asset schema from a JSON string.
pub fn from_json<T: DeserializeOwned>(json: &str) -> GameResult<T> {
    Ok(serde_json::from_str(json)?)
}

/// Reads a file into a string.
pub fn read_to_string(path: impl AsRef<Path>) -> GameResult<String> {
    Ok(fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    #[test]
    fn test_atlas_requires_version() {
        let result = SpriteAtlas::from_json(r#"{"basePath": "sprites/", "sprites": {}}"#);
        assert!(matches!(result, Err(GameError::Atlas(AtlasError::MissingVersion))));

        let result = SpriteAtlas::from_json(r#"{"version": ""}"#);
        assert!(matches!(result, Err(GameError::Atlas(AtlasError::MissingVersion))));
    }

    #[test]
    fn test_atlas_rejects_negative_frame() {
        let result = SpriteAtlas::from_json(r#"{"version": "1", "sprites": {"player": {"frame": [0, 0, -1, 8]}}}"#);
        assert!(matches!(result, Err(GameError::Atlas(AtlasError::InvalidFrame(name))) if name == "player"));
    }

    #[test]
    fn test_atlas_frame_lookup() {
        let atlas = SpriteAtlas::from_json(
            r#"{"version": "1", "basePath": "s/", "sprites": {"blinky": {"frame": [0, 16, 16, 16], "anchor": {"x": 0.5, "y": 0.5}}}}"#,
        )
        .unwrap();
        let frame = atlas.frame("blinky").unwrap();
        assert_eq!(frame.frame, [0.0, 16.0, 16.0, 16.0]);
        assert_eq!(frame.anchor.map(Vec2::from), Some(Vec2::splat(0.5)));
        assert!(atlas.frame("pinky").is_none());
    }

    #[test]
    fn test_any_map_asset_shapes() {
        let legacy = AnyMapAsset::from_json(r##"{"layout": ["#P "], "legend": {"P": "player"}}"##).unwrap();
        assert!(matches!(legacy, AnyMapAsset::Legacy(_)));
        assert!(matches!(AnyMapAsset::from_json("{}").unwrap(), AnyMapAsset::Legacy(_)));

        let canonical =
            AnyMapAsset::from_json(r#"{"id": "m", "version": "1", "width": 1, "height": 1, "tiles": [[0]]}"#).unwrap();
        assert!(matches!(canonical, AnyMapAsset::Canonical(_)));
    }

    #[test]
    fn test_any_map_asset_keeps_shape_errors() {
        let error = AnyMapAsset::from_json(r#"{"id": "m", "version": "1", "width": "ten", "height": 1, "tiles": [[0]]}"#)
            .unwrap_err();
        assert!(matches!(error, GameError::Json(_)));
        assert!(error.to_string().contains("invalid type"), "{error}");

        let error = AnyMapAsset::from_json(r#"{"layout": ["P"], "colour": "red"}"#).unwrap_err();
        assert!(error.to_string().contains("unknown field"), "{error}");
    }
}
