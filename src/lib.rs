//! Deterministic tick simulation core for a tilt-controlled Pac-Man.

pub mod asset;
pub mod constants;
pub mod error;
pub mod events;
pub mod formatter;
pub mod game;
pub mod map;
pub mod rules;
pub mod systems;
