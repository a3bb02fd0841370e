//! Simulation state: the player, the ghosts and the run bookkeeping.

use glam::{IVec2, Vec2};
use serde::Serialize;
use strum_macros::AsRefStr;
use tracing::debug;

use crate::constants::GHOST_IDS;
use crate::map::builder::Map;
use crate::map::direction::Direction;
use crate::map::grid::TileGrid;
use crate::rules::Ruleset;
use crate::systems::targeting::Personality;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GhostMode {
    Scatter,
    Chase,
    /// Vulnerable and fleeing while the power timer runs.
    Frightened,
    /// Captured, heading home. Cannot be captured again until revived.
    Eyes,
}

impl GhostMode {
    /// Whether this is one of the modes a ghost falls back to after frightened or eyes.
    pub const fn is_base(self) -> bool {
        matches!(self, GhostMode::Scatter | GhostMode::Chase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GameStatus {
    Idle,
    Running,
    Paused,
    Won,
    Lost,
}

impl GameStatus {
    /// Won and lost runs accept no further input until restarted.
    pub const fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub position: Vec2,
    pub direction: Option<Direction>,
    /// The last requested turn, applied as soon as it is no longer blocked.
    pub pending_direction: Option<Direction>,
    /// Tiles per tick.
    pub speed: f32,
    /// Tiles per second. Only the continuous movement model uses it.
    pub velocity: Vec2,
    pub lives: u32,
    pub score: f64,
    /// Simulation time at which the active power-up ends.
    pub powered_up_until: Option<f64>,
    #[serde(skip)]
    pub move_budget: f32,
}

impl PlayerState {
    pub fn new(spawn: IVec2, rules: &Ruleset) -> Self {
        Self {
            position: spawn.as_vec2(),
            direction: None,
            pending_direction: None,
            speed: rules.player_speed,
            velocity: Vec2::ZERO,
            lives: rules.starting_lives,
            score: 0.0,
            powered_up_until: None,
            move_budget: 0.0,
        }
    }

    /// The tile the player occupies.
    pub fn tile(&self) -> IVec2 {
        self.position.round().as_ivec2()
    }

    /// Puts the player back on `spawn`, at rest.
    pub fn respawn(&mut self, spawn: IVec2) {
        self.position = spawn.as_vec2();
        self.velocity = Vec2::ZERO;
        self.direction = None;
        self.pending_direction = None;
        self.move_budget = 0.0;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostState {
    pub id: String,
    pub personality: Personality,
    pub position: Vec2,
    pub spawn: IVec2,
    pub direction: Option<Direction>,
    pub mode: GhostMode,
    /// The scatter or chase mode this ghost returns to.
    pub base_mode: GhostMode,
    /// Milliseconds of frightened mode left. Positive exactly when the ghost is frightened.
    pub frightened_timer: f64,
    /// Tiles per tick in the current mode.
    pub speed: f32,
    #[serde(skip)]
    pub move_budget: f32,
}

impl GhostState {
    /// Creates the ghost for spawn slot `index`. Identities cycle through [`GHOST_IDS`].
    pub fn new(index: usize, spawn: IVec2, base_mode: GhostMode, rules: &Ruleset) -> Self {
        let id = GHOST_IDS[index % GHOST_IDS.len()];
        Self {
            id: id.to_string(),
            personality: Personality::from_id(id),
            position: spawn.as_vec2(),
            spawn,
            direction: None,
            mode: base_mode,
            base_mode,
            frightened_timer: 0.0,
            speed: rules.ghost_speed,
            move_budget: 0.0,
        }
    }

    pub fn tile(&self) -> IVec2 {
        self.position.round().as_ivec2()
    }

    /// Switches mode, keeping the frightened timer and speed consistent with it.
    pub fn set_mode(&mut self, mode: GhostMode, rules: &Ruleset) {
        self.mode = mode;
        self.speed = match mode {
            GhostMode::Scatter | GhostMode::Chase => rules.ghost_speed,
            GhostMode::Frightened => rules.frightened_ghost_speed(),
            GhostMode::Eyes => rules.eyes_ghost_speed(),
        };
        if mode != GhostMode::Frightened {
            self.frightened_timer = 0.0;
        }
    }

    /// Frightens the ghost for `duration_ms`. Eyes are unaffected.
    pub fn frighten(&mut self, duration_ms: f64, rules: &Ruleset) {
        if self.mode == GhostMode::Eyes || duration_ms <= 0.0 {
            return;
        }
        self.set_mode(GhostMode::Frightened, rules);
        self.frightened_timer = duration_ms;
    }

    /// Turns the ghost into eyes, back on its spawn tile.
    pub fn capture(&mut self, rules: &Ruleset) {
        self.set_mode(GhostMode::Eyes, rules);
        self.position = self.spawn.as_vec2();
        self.direction = None;
        self.move_budget = 0.0;
    }
}

/// Everything a run mutates between ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub player: PlayerState,
    pub ghosts: Vec<GhostState>,
    /// Working copy of the map's tiles. Eaten pellets become empty here.
    #[serde(skip)]
    pub tiles: TileGrid,
    pub pellets_remaining: usize,
    /// Milliseconds of power mode left. Zero when the player is not powered.
    pub power_remaining_ms: f64,
    /// Simulation time, advanced by one step per tick.
    pub clock_ms: f64,
    pub tick: u64,
    pub status: GameStatus,
    pub debug: bool,
}

impl GameState {
    /// Fresh state for `map`, waiting to be started.
    pub fn new(map: &Map, rules: &Ruleset) -> Self {
        let ghosts = map
            .ghost_spawns()
            .iter()
            .enumerate()
            .map(|(index, &spawn)| GhostState::new(index, spawn, GhostMode::Chase, rules))
            .collect();

        Self {
            player: PlayerState::new(map.player_spawn(), rules),
            ghosts,
            tiles: map.tiles().clone(),
            pellets_remaining: map.pellet_count(),
            power_remaining_ms: 0.0,
            clock_ms: 0.0,
            tick: 0,
            status: GameStatus::Idle,
            debug: false,
        }
    }

    pub fn is_powered(&self) -> bool {
        self.power_remaining_ms > 0.0
    }

    pub fn ghost(&self, id: &str) -> Option<&GhostState> {
        self.ghosts.iter().find(|ghost| ghost.id.eq_ignore_ascii_case(id))
    }

    /// Changes the scatter/chase mode every ghost falls back to.
    ///
    /// Ghosts currently scattering or chasing switch immediately. Frightened ghosts and eyes pick
    /// the new mode up when they revert. Modes other than scatter and chase are ignored.
    pub fn set_base_mode(&mut self, mode: GhostMode, rules: &Ruleset) {
        if !mode.is_base() {
            return;
        }
        debug!(mode = mode.as_ref(), "Ghost base mode changed");
        for ghost in &mut self.ghosts {
            ghost.base_mode = mode;
            if ghost.mode.is_base() && ghost.mode != mode {
                ghost.set_mode(mode, rules);
            }
        }
    }

    /// Moves the run to `status`, returning the old status if it changed.
    pub fn set_status(&mut self, status: GameStatus) -> Option<GameStatus> {
        let previous = self.status;
        if previous == status {
            return None;
        }
        self.status = status;
        Some(previous)
    }
}
