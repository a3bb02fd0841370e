//! Validated gameplay configuration.

use tracing::debug;

use crate::asset::{self, RulesAsset};
use crate::constants::{
    DEFAULT_ACCELERATION_PER_TICK_RATE, DEFAULT_EYES_SPEED_FACTOR, DEFAULT_FRIGHTENED_SPEED_FACTOR, DEFAULT_GHOST_SPEED,
    DEFAULT_MAX_PLAYER_SPEED, DEFAULT_PLAYER_SPEED, DEFAULT_STARTING_LIVES, MIN_FRIGHTENED_SPEED,
};
use crate::error::{GameResult, RulesError};

/// Scoring, timing and speed settings. Loaded once and never mutated.
///
/// Speeds are in tiles per tick, except [`Ruleset::max_player_speed`] which belongs to the
/// continuous movement model and is in tiles per second.
#[derive(Debug, Clone, PartialEq)]
pub struct Ruleset {
    pub tick_rate: f64,
    pub pellet_score: f64,
    pub power_pellet_score: f64,
    pub ghost_score: f64,
    pub power_mode_duration_ms: f64,
    pub player_speed: f32,
    pub ghost_speed: f32,
    pub frightened_speed_factor: f32,
    pub eyes_speed_factor: f32,
    pub starting_lives: u32,
    pub max_player_speed: f32,
    pub player_acceleration: f32,
}

impl Default for Ruleset {
    fn default() -> Self {
        let tick_rate = 60.0;
        Self {
            tick_rate,
            pellet_score: 10.0,
            power_pellet_score: 50.0,
            ghost_score: 200.0,
            power_mode_duration_ms: 6000.0,
            player_speed: DEFAULT_PLAYER_SPEED,
            ghost_speed: DEFAULT_GHOST_SPEED,
            frightened_speed_factor: DEFAULT_FRIGHTENED_SPEED_FACTOR,
            eyes_speed_factor: DEFAULT_EYES_SPEED_FACTOR,
            starting_lives: DEFAULT_STARTING_LIVES,
            max_player_speed: DEFAULT_MAX_PLAYER_SPEED,
            player_acceleration: DEFAULT_ACCELERATION_PER_TICK_RATE * tick_rate as f32,
        }
    }
}

impl Ruleset {
    /// Parses and validates a ruleset from JSON.
    pub fn from_json(json: &str) -> GameResult<Self> {
        let raw: RulesAsset = asset::from_json(json)?;
        Ok(Self::from_asset(&raw)?)
    }

    /// Validates a raw ruleset asset.
    ///
    /// # Errors
    ///
    /// Fails if a required field is missing, any field is not finite, or a value is out of range.
    pub fn from_asset(raw: &RulesAsset) -> Result<Self, RulesError> {
        let tick_rate = required("tickRate", raw.tick_rate)?;
        if tick_rate <= 0.0 {
            return Err(out_of_range("tickRate", tick_rate, "must be positive"));
        }

        let rules = Self {
            tick_rate,
            pellet_score: required("pelletScore", raw.pellet_score)?,
            power_pellet_score: required("powerPelletScore", raw.power_pellet_score)?,
            ghost_score: required("ghostScore", raw.ghost_score)?,
            power_mode_duration_ms: non_negative("powerModeDurationMs", required("powerModeDurationMs", raw.power_mode_duration_ms)?)?,
            player_speed: speed("playerSpeed", raw.player_speed, DEFAULT_PLAYER_SPEED)?,
            ghost_speed: speed("ghostSpeed", raw.ghost_speed, DEFAULT_GHOST_SPEED)?,
            frightened_speed_factor: speed("frightenedSpeedFactor", raw.frightened_speed_factor, DEFAULT_FRIGHTENED_SPEED_FACTOR)?,
            eyes_speed_factor: speed("eyesSpeedFactor", raw.eyes_speed_factor, DEFAULT_EYES_SPEED_FACTOR)?,
            starting_lives: lives(raw.starting_lives)?,
            max_player_speed: speed("maxPlayerSpeed", raw.max_player_speed, DEFAULT_MAX_PLAYER_SPEED)?,
            player_acceleration: speed(
                "playerAcceleration",
                raw.player_acceleration,
                DEFAULT_ACCELERATION_PER_TICK_RATE * tick_rate as f32,
            )?,
        };

        debug!(tick_rate = rules.tick_rate, lives = rules.starting_lives, "Ruleset loaded");
        Ok(rules)
    }

    /// Length of one simulation step, in milliseconds.
    pub fn step_ms(&self) -> f64 {
        1000.0 / self.tick_rate
    }

    /// Speed of a frightened ghost, in tiles per tick.
    pub fn frightened_ghost_speed(&self) -> f32 {
        (self.ghost_speed * self.frightened_speed_factor).max(MIN_FRIGHTENED_SPEED)
    }

    /// Speed of a ghost returning home as eyes, in tiles per tick.
    pub fn eyes_ghost_speed(&self) -> f32 {
        self.ghost_speed * self.eyes_speed_factor
    }
}

fn out_of_range(field: &'static str, value: f64, reason: &'static str) -> RulesError {
    RulesError::OutOfRange { field, value, reason }
}

fn required(field: &'static str, value: Option<f64>) -> Result<f64, RulesError> {
    let value = value.ok_or(RulesError::MissingField(field))?;
    if !value.is_finite() {
        return Err(RulesError::NotFinite { field, value });
    }
    Ok(value)
}

fn non_negative(field: &'static str, value: f64) -> Result<f64, RulesError> {
    if value < 0.0 {
        return Err(out_of_range(field, value, "must not be negative"));
    }
    Ok(value)
}

fn whole_number(field: &'static str, value: f64) -> Result<u32, RulesError> {
    let value = non_negative(field, value)?;
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(out_of_range(field, value, "must be a whole number"));
    }
    Ok(value as u32)
}

fn speed(field: &'static str, value: Option<f64>, default: f32) -> Result<f32, RulesError> {
    match value {
        None => Ok(default),
        Some(value) => Ok(non_negative(field, required(field, Some(value))?)? as f32),
    }
}

fn lives(value: Option<f64>) -> Result<u32, RulesError> {
    let Some(value) = value else {
        return Ok(DEFAULT_STARTING_LIVES);
    };
    let lives = whole_number("startingLives", required("startingLives", Some(value))?)?;
    if lives == 0 {
        return Err(out_of_range("startingLives", value, "must be at least 1"));
    }
    Ok(lives)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RulesAsset {
        RulesAsset {
            tick_rate: Some(30.0),
            pellet_score: Some(5.0),
            power_pellet_score: Some(25.0),
            ghost_score: Some(200.0),
            power_mode_duration_ms: Some(3000.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_fill_optional_fields() {
        let rules = Ruleset::from_asset(&base()).unwrap();
        assert_eq!(rules.starting_lives, DEFAULT_STARTING_LIVES);
        assert_eq!(rules.player_speed, DEFAULT_PLAYER_SPEED);
        assert!((rules.player_acceleration - 0.06).abs() < 1e-6);
        assert!((rules.step_ms() - 1000.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_required_field() {
        let raw = RulesAsset {
            ghost_score: None,
            ..base()
        };
        assert_eq!(Ruleset::from_asset(&raw), Err(RulesError::MissingField("ghostScore")));
    }

    #[test]
    fn test_rejects_non_finite() {
        let raw = RulesAsset {
            pellet_score: Some(f64::NAN),
            ..base()
        };
        assert!(matches!(
            Ruleset::from_asset(&raw),
            Err(RulesError::NotFinite { field: "pelletScore", .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let zero_rate = RulesAsset {
            tick_rate: Some(0.0),
            ..base()
        };
        assert!(matches!(
            Ruleset::from_asset(&zero_rate),
            Err(RulesError::OutOfRange { field: "tickRate", .. })
        ));

        let no_lives = RulesAsset {
            starting_lives: Some(0.0),
            ..base()
        };
        assert!(matches!(
            Ruleset::from_asset(&no_lives),
            Err(RulesError::OutOfRange { field: "startingLives", .. })
        ));

        let negative_speed = RulesAsset {
            ghost_speed: Some(-1.0),
            ..base()
        };
        assert!(matches!(
            Ruleset::from_asset(&negative_speed),
            Err(RulesError::OutOfRange { field: "ghostSpeed", .. })
        ));
    }

    #[test]
    fn test_scores_accept_any_finite_number() {
        let raw = RulesAsset {
            pellet_score: Some(2.5),
            ghost_score: Some(-100.0),
            ..base()
        };
        let rules = Ruleset::from_asset(&raw).unwrap();
        assert_eq!(rules.pellet_score, 2.5);
        assert_eq!(rules.ghost_score, -100.0);

        let fractional_lives = RulesAsset {
            starting_lives: Some(2.5),
            ..base()
        };
        assert!(matches!(
            Ruleset::from_asset(&fractional_lives),
            Err(RulesError::OutOfRange { field: "startingLives", .. })
        ));
    }

    #[test]
    fn test_frightened_speed_floor() {
        let rules = Ruleset {
            ghost_speed: 0.1,
            ..Ruleset::default()
        };
        assert_eq!(rules.frightened_ghost_speed(), MIN_FRIGHTENED_SPEED);
        assert!((rules.eyes_ghost_speed() - 0.2).abs() < 1e-6);
    }
}
