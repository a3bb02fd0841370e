use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;

/// The four cardinal directions.
///
/// "No direction" is expressed as `Option<Direction>::None` throughout the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Serialize, Deserialize)]
#[repr(usize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The four cardinal directions, in the fixed scan order used for every tie-break.
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Returns the opposite direction. Constant time.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the unit grid offset of this direction. `y` grows downward.
    pub const fn as_ivec2(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn as_vec2(self) -> Vec2 {
        self.as_ivec2().as_vec2()
    }

    /// Returns the direction as a usize (0-3), matching [`Direction::DIRECTIONS`].
    pub const fn as_usize(self) -> usize {
        self as usize
    }

    /// Converts a unit grid offset back into a direction.
    pub fn from_delta(delta: IVec2) -> Option<Direction> {
        Self::DIRECTIONS.into_iter().find(|d| d.as_ivec2() == delta)
    }

    /// Picks the direction of the dominant axis of `vector`.
    ///
    /// Ties between axes go to the horizontal one. A zero vector has no direction.
    pub fn dominant(vector: Vec2) -> Option<Direction> {
        if vector.x == 0.0 && vector.y == 0.0 || !vector.is_finite() {
            return None;
        }
        if vector.x.abs() >= vector.y.abs() {
            Some(if vector.x > 0.0 { Direction::Right } else { Direction::Left })
        } else {
            Some(if vector.y > 0.0 { Direction::Down } else { Direction::Up })
        }
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        dir.as_ivec2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite() {
        for direction in Direction::DIRECTIONS {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_eq!(direction.as_ivec2() + direction.opposite().as_ivec2(), IVec2::ZERO);
        }
    }

    #[test]
    fn test_from_delta() {
        assert_eq!(Direction::from_delta(IVec2::new(1, 0)), Some(Direction::Right));
        assert_eq!(Direction::from_delta(IVec2::new(0, -1)), Some(Direction::Up));
        assert_eq!(Direction::from_delta(IVec2::new(1, 1)), None);
        assert_eq!(Direction::from_delta(IVec2::ZERO), None);
    }

    #[test]
    fn test_as_usize_matches_scan_order() {
        for (index, direction) in Direction::DIRECTIONS.iter().enumerate() {
            assert_eq!(direction.as_usize(), index);
        }
    }

    #[test]
    fn test_dominant_axis() {
        assert_eq!(Direction::dominant(Vec2::new(0.3, -0.9)), Some(Direction::Up));
        assert_eq!(Direction::dominant(Vec2::new(-0.5, 0.5)), Some(Direction::Left));
        assert_eq!(Direction::dominant(Vec2::new(0.0, 0.2)), Some(Direction::Down));
        assert_eq!(Direction::dominant(Vec2::ZERO), None);
        assert_eq!(Direction::dominant(Vec2::new(f32::NAN, 1.0)), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(Direction::Left.as_ref(), "left");
    }
}
