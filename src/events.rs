//! Values crossing the simulation boundary: player intent in, gameplay events out.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

use crate::game::state::{GameStatus, GhostMode};
use crate::map::direction::Direction;

/// A tilt sample. Filtering and dead zones are applied before it reaches the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TiltInput {
    pub raw: Vec2,
    pub normalized: Vec2,
    pub timestamp_ms: f64,
}

impl TiltInput {
    pub fn new(normalized: Vec2, timestamp_ms: f64) -> Self {
        Self {
            raw: normalized,
            normalized,
            timestamp_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ButtonKind {
    Pause,
    Restart,
    DebugToggle,
}

/// A button press. Each press is consumed once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonInput {
    #[serde(rename = "type")]
    pub kind: ButtonKind,
    pub timestamp_ms: f64,
}

/// The intent available to a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickInput {
    /// An explicit direction request, taking priority over tilt.
    pub direction: Option<Direction>,
    pub tilt: Option<TiltInput>,
}

impl TickInput {
    pub fn direction(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            tilt: None,
        }
    }

    pub fn tilt(tilt: TiltInput) -> Self {
        Self {
            direction: None,
            tilt: Some(tilt),
        }
    }

    /// The direction this input asks for, if any: the explicit request, else the dominant tilt axis.
    pub fn desired_direction(&self) -> Option<Direction> {
        self.direction
            .or_else(|| self.tilt.and_then(|tilt| Direction::dominant(tilt.normalized)))
    }

    /// The acceleration vector fed to the continuous movement model.
    pub fn acceleration(&self) -> Vec2 {
        match (self.direction, self.tilt) {
            (Some(direction), _) => direction.as_vec2(),
            (None, Some(tilt)) if tilt.normalized.is_finite() => tilt.normalized,
            _ => Vec2::ZERO,
        }
    }
}

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameEvent {
    PelletEaten { position: IVec2, score: f64 },
    PowerPelletEaten { position: IVec2, score: f64 },
    GhostCaptured { ghost: String, score: f64 },
    LifeLost { lives_remaining: u32 },
    PowerExpired,
    GhostRevived { ghost: String, mode: GhostMode },
    StatusChanged { from: GameStatus, to: GameStatus },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_explicit_direction_beats_tilt() {
        let input = TickInput {
            direction: Some(Direction::Up),
            tilt: Some(TiltInput::new(Vec2::new(1.0, 0.0), 0.0)),
        };
        assert_eq!(input.desired_direction(), Some(Direction::Up));
        assert_eq!(input.acceleration(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_tilt_dominant_axis() {
        let input = TickInput::tilt(TiltInput::new(Vec2::new(-0.2, 0.7), 0.0));
        assert_eq!(input.desired_direction(), Some(Direction::Down));
        assert_eq!(TickInput::default().desired_direction(), None);
    }

    #[test]
    fn test_button_names() {
        assert_eq!(ButtonKind::from_str("debug-toggle"), Ok(ButtonKind::DebugToggle));
        let button: ButtonInput = serde_json::from_str(r#"{"type": "pause", "timestampMs": 12}"#).unwrap();
        assert_eq!(button.kind, ButtonKind::Pause);
    }
}
