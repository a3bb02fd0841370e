//! Per-personality ghost targeting.

use glam::IVec2;
use serde::Serialize;
use strum_macros::{AsRefStr, EnumString};

use crate::constants::targeting::{AMBUSH_TILES_AHEAD, FLANK_TILES_AHEAD, OPPORTUNIST_FLEE_DISTANCE};
use crate::game::state::{GhostMode, GhostState, PlayerState};

/// The fixed set of ghost targeting strategies, keyed by ghost identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    /// Lead pursuer: heads straight for the player.
    Blinky,
    /// Ambusher: aims ahead of the player.
    Pinky,
    /// Flanker: works off the lead pursuer's position.
    Inky,
    /// Opportunist: chases from afar, retreats up close.
    Clyde,
}

impl Personality {
    /// Looks up the strategy for a ghost identity. Unknown identities get the lead pursuer.
    pub fn from_id(id: &str) -> Personality {
        id.parse().unwrap_or(Personality::Blinky)
    }

    /// This personality's home corner on a grid of `size` tiles.
    pub fn scatter_target(self, size: IVec2) -> IVec2 {
        let max = size - IVec2::ONE;
        match self {
            Personality::Blinky => IVec2::new(max.x, 0),
            Personality::Pinky => IVec2::ZERO,
            Personality::Inky => max,
            Personality::Clyde => IVec2::new(0, max.y),
        }
    }

    /// Where this personality heads while chasing.
    ///
    /// `lead` is the lead pursuer's tile, if one is on the board.
    pub fn chase_target(self, ghost: &GhostState, player: &PlayerState, lead: Option<IVec2>, size: IVec2) -> IVec2 {
        let player_tile = player.tile();
        let facing = player.direction.map(|d| d.as_ivec2()).unwrap_or(IVec2::ZERO);

        let target = match self {
            Personality::Blinky => player_tile,
            Personality::Pinky => player_tile + facing * AMBUSH_TILES_AHEAD,
            Personality::Inky => {
                let pivot = player_tile + facing * FLANK_TILES_AHEAD;
                let origin = lead.unwrap_or(player_tile);
                origin + (pivot - origin) * 2
            }
            Personality::Clyde => {
                let distance = (ghost.tile() - player_tile).abs().element_sum();
                if distance > OPPORTUNIST_FLEE_DISTANCE {
                    player_tile
                } else {
                    self.scatter_target(size)
                }
            }
        };
        clamp_to_grid(target, size)
    }
}

/// Where a frightened ghost runs: away from the player, twice as far as it already is.
pub fn frightened_target(ghost: &GhostState, player: &PlayerState, size: IVec2) -> IVec2 {
    let ghost_tile = ghost.tile();
    clamp_to_grid(ghost_tile * 2 - player.tile(), size)
}

/// Resolves a ghost's current target tile from its mode.
pub fn target_for(ghost: &GhostState, player: &PlayerState, ghosts: &[GhostState], size: IVec2) -> IVec2 {
    match ghost.mode {
        GhostMode::Chase => {
            let lead = ghosts
                .iter()
                .find(|other| other.personality == Personality::Blinky)
                .map(GhostState::tile);
            ghost.personality.chase_target(ghost, player, lead, size)
        }
        GhostMode::Scatter => ghost.personality.scatter_target(size),
        GhostMode::Frightened => frightened_target(ghost, player, size),
        GhostMode::Eyes => ghost.spawn,
    }
}

fn clamp_to_grid(position: IVec2, size: IVec2) -> IVec2 {
    position.clamp(IVec2::ZERO, (size - IVec2::ONE).max(IVec2::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        assert_eq!(Personality::from_id("pinky"), Personality::Pinky);
        assert_eq!(Personality::from_id("CLYDE"), Personality::Clyde);
        assert_eq!(Personality::from_id("sue"), Personality::Blinky);
    }

    #[test]
    fn test_scatter_corners_are_distinct() {
        let size = IVec2::new(10, 6);
        let corners = [
            Personality::Blinky.scatter_target(size),
            Personality::Pinky.scatter_target(size),
            Personality::Inky.scatter_target(size),
            Personality::Clyde.scatter_target(size),
        ];
        assert_eq!(corners, [IVec2::new(9, 0), IVec2::ZERO, IVec2::new(9, 5), IVec2::new(0, 5)]);
    }
}
