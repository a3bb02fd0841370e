//! Render-agnostic output: state snapshots and render command batches.

use glam::{IVec2, Vec2};
use serde::Serialize;

use crate::asset::SpriteAtlas;
use crate::constants::MapTile;
use crate::game::state::{GameState, GameStatus, GhostState, PlayerState};
use crate::map::builder::Map;
use crate::systems::targeting::target_for;

/// Sprite id used for the player. Ghost sprites use the ghost id.
pub const PLAYER_SPRITE_ID: &str = "player";

/// A copy of the moving parts of the state at a point in simulation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub player: PlayerState,
    pub ghosts: Vec<GhostState>,
    pub pellets_remaining: usize,
    pub timestamp_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RenderCommand {
    Tile {
        position: IVec2,
        tile: MapTile,
    },
    #[serde(rename_all = "camelCase")]
    Sprite {
        position: Vec2,
        sprite_id: String,
        /// The atlas frame for `sprite_id`, when an atlas with that sprite was supplied.
        #[serde(skip_serializing_if = "Option::is_none")]
        frame: Option<[f32; 4]>,
    },
    Overlay {
        text: String,
        position: Vec2,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: f64,
    pub lives: u32,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderBatch {
    pub camera: Vec2,
    pub commands: Vec<RenderCommand>,
    pub hud: Hud,
}

pub fn snapshot(state: &GameState) -> Snapshot {
    Snapshot {
        player: state.player.clone(),
        ghosts: state.ghosts.clone(),
        pellets_remaining: state.pellets_remaining,
        timestamp_ms: state.clock_ms,
    }
}

/// Builds the draw list for the current state.
///
/// Tiles come first, then the player, then ghosts, then overlays. The atlas is optional and only
/// used to attach frames to sprite commands.
pub fn render_batch(state: &GameState, map: &Map, atlas: Option<&SpriteAtlas>) -> RenderBatch {
    let frame = |sprite_id: &str| atlas.and_then(|atlas| atlas.frame(sprite_id)).map(|sprite| sprite.frame);

    let mut commands: Vec<RenderCommand> = state
        .tiles
        .iter()
        .filter(|(_, tile)| *tile != MapTile::Empty)
        .map(|(position, tile)| RenderCommand::Tile { position, tile })
        .collect();

    commands.push(RenderCommand::Sprite {
        position: state.player.position,
        sprite_id: PLAYER_SPRITE_ID.to_string(),
        frame: frame(PLAYER_SPRITE_ID),
    });
    commands.extend(state.ghosts.iter().map(|ghost| RenderCommand::Sprite {
        position: ghost.position,
        sprite_id: ghost.id.clone(),
        frame: frame(&ghost.id),
    }));

    let center = Vec2::new(map.width() as f32, map.height() as f32) / 2.0;
    let banner = match state.status {
        GameStatus::Paused => Some("PAUSED"),
        GameStatus::Won => Some("YOU WIN"),
        GameStatus::Lost => Some("GAME OVER"),
        GameStatus::Idle | GameStatus::Running => None,
    };
    if let Some(text) = banner {
        commands.push(RenderCommand::Overlay {
            text: text.to_string(),
            position: center,
        });
    }

    if state.debug {
        let size = IVec2::new(map.width() as i32, map.height() as i32);
        commands.extend(state.ghosts.iter().map(|ghost| {
            let target = target_for(ghost, &state.player, &state.ghosts, size);
            RenderCommand::Overlay {
                text: format!("{} {} -> ({}, {})", ghost.id, ghost.mode.as_ref(), target.x, target.y),
                position: ghost.position,
            }
        }));
        commands.push(RenderCommand::Overlay {
            text: format!("tick {} pellets {}", state.tick, state.pellets_remaining),
            position: Vec2::ZERO,
        });
    }

    RenderBatch {
        camera: state.player.position,
        commands,
        hud: Hud {
            score: state.player.score,
            lives: state.player.lives,
            level: map.id().to_string(),
        },
    }
}
