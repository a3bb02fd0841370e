//! The per-tick systems the tick engine runs, plus output construction.

pub mod collision;
pub mod ghost;
pub mod movement;
pub mod render;
pub mod targeting;
