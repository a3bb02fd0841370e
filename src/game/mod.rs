//! The tick engine and the caller-owned simulation handle.

use tracing::{debug, info, trace};

use crate::asset::SpriteAtlas;
use crate::events::{ButtonInput, ButtonKind, GameEvent, TickInput, TiltInput};
use crate::formatter;
use crate::map::builder::Map;
use crate::map::direction::Direction;
use crate::rules::Ruleset;
use crate::systems::collision::{consume_pellet, decay_timers, resolve_ghost_overlaps};
use crate::systems::ghost::move_ghost;
use crate::systems::movement::{integrate_continuous, move_player_discrete, spend_budget};
use crate::systems::render::{self, RenderBatch, Snapshot};

pub mod state;

use state::{GameState, GameStatus, GhostMode};

/// How the player moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementModel {
    /// Whole tiles, with buffered turns.
    #[default]
    Discrete,
    /// Tilt-driven velocity with wall-checked sub-steps.
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimulationOptions {
    pub movement: MovementModel,
}

/// Advances `state` by one fixed step.
///
/// Order: timers, player, ghosts, pellets, ghost overlaps, end of run. Does nothing unless the run
/// is [`GameStatus::Running`]. Returns the events the step produced.
pub fn tick(state: &mut GameState, map: &Map, rules: &Ruleset, options: SimulationOptions, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.status != GameStatus::Running {
        return events;
    }

    let step_ms = rules.step_ms();
    state.tick += 1;
    state.clock_ms += step_ms;
    formatter::set_tick_count(state.tick);

    decay_timers(state, rules, step_ms, &mut events);

    let desired = input.desired_direction().or(state.player.pending_direction);
    match options.movement {
        MovementModel::Discrete => {
            let player = &mut state.player;
            let tiles = &state.tiles;
            let mut budget = player.move_budget;
            spend_budget(&mut budget, player.speed, || move_player_discrete(player, tiles, desired));
            player.move_budget = budget;
            // A turn requested on a tick without a step still has to be buffered.
            player.pending_direction = desired;
        }
        MovementModel::Continuous => {
            integrate_continuous(
                &mut state.player,
                &state.tiles,
                input.acceleration(),
                rules.player_acceleration,
                rules.max_player_speed,
                step_ms,
            );
            state.player.pending_direction = desired;
        }
    }

    for index in 0..state.ghosts.len() {
        move_ghost(index, &mut state.ghosts, &state.player, map, &state.tiles);
    }

    consume_pellet(state, rules, &mut events);
    resolve_ghost_overlaps(state, map, rules, &mut events);

    if state.status == GameStatus::Running && state.pellets_remaining == 0 {
        if let Some(previous) = state.set_status(GameStatus::Won) {
            info!(score = state.player.score, tick = state.tick, "Run won");
            events.push(GameEvent::StatusChanged {
                from: previous,
                to: GameStatus::Won,
            });
        }
    }

    trace!(events = events.len(), "Tick complete");
    events
}

/// A running simulation: the map and rules it was loaded with, its state, and the latest input.
///
/// Owned by the caller and driven through [`Simulation::advance`]. Ticks run at a fixed step of
/// `1000 / tick_rate` milliseconds regardless of how time is fed in.
#[derive(Debug)]
pub struct Simulation {
    map: Map,
    rules: Ruleset,
    options: SimulationOptions,
    atlas: Option<SpriteAtlas>,
    state: GameState,
    accumulator_ms: f64,
    direction: Option<Direction>,
    tilt: Option<TiltInput>,
    buttons: Vec<ButtonInput>,
}

impl Simulation {
    pub fn new(map: Map, rules: Ruleset, options: SimulationOptions) -> Self {
        let state = GameState::new(&map, &rules);
        Self {
            map,
            rules,
            options,
            atlas: None,
            state,
            accumulator_ms: 0.0,
            direction: None,
            tilt: None,
            buttons: Vec::new(),
        }
    }

    /// Attaches sprite metadata used to annotate render batches.
    pub fn with_atlas(mut self, atlas: SpriteAtlas) -> Self {
        self.atlas = Some(atlas);
        self
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Moves an idle run to running.
    pub fn start(&mut self) -> Vec<GameEvent> {
        if self.state.status != GameStatus::Idle {
            return Vec::new();
        }
        info!(map = %self.map.id(), "Simulation started");
        self.change_status(GameStatus::Running).into_iter().collect()
    }

    /// Requests a direction for the next tick. Consumed by that tick.
    pub fn push_direction(&mut self, direction: Direction) {
        self.direction = Some(direction);
    }

    /// Replaces the latest tilt sample. Stays in effect until replaced or cleared.
    pub fn push_tilt(&mut self, tilt: TiltInput) {
        self.tilt = Some(tilt);
    }

    pub fn clear_tilt(&mut self) {
        self.tilt = None;
    }

    /// Queues a button press for the next call to [`Simulation::advance`] or [`Simulation::step`].
    pub fn push_button(&mut self, button: ButtonInput) {
        self.buttons.push(button);
    }

    /// Sets the scatter/chase mode ghosts fall back to.
    pub fn set_base_mode(&mut self, mode: GhostMode) {
        self.state.set_base_mode(mode, &self.rules);
    }

    /// Feeds `elapsed_ms` of wall-clock time, running one tick per whole fixed step.
    ///
    /// Queued buttons are handled first. Time fed in while the run is not running is dropped.
    /// Zero, negative, or non-finite deltas are ignored and leave banked time untouched.
    pub fn advance(&mut self, elapsed_ms: f64) -> Vec<GameEvent> {
        let mut events = self.handle_buttons();
        if self.state.status != GameStatus::Running {
            self.accumulator_ms = 0.0;
            return events;
        }
        if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return events;
        }

        let step_ms = self.rules.step_ms();
        self.accumulator_ms += elapsed_ms;
        while self.accumulator_ms >= step_ms {
            self.accumulator_ms -= step_ms;
            events.extend(self.run_tick());
            if self.state.status != GameStatus::Running {
                self.accumulator_ms = 0.0;
                break;
            }
        }
        events
    }

    /// Handles queued buttons and runs exactly one tick.
    pub fn step(&mut self) -> Vec<GameEvent> {
        let mut events = self.handle_buttons();
        events.extend(self.run_tick());
        events
    }

    pub fn snapshot(&self) -> Snapshot {
        render::snapshot(&self.state)
    }

    pub fn render_batch(&self) -> RenderBatch {
        render::render_batch(&self.state, &self.map, self.atlas.as_ref())
    }

    fn run_tick(&mut self) -> Vec<GameEvent> {
        let input = TickInput {
            direction: self.direction.take(),
            tilt: self.tilt,
        };
        tick(&mut self.state, &self.map, &self.rules, self.options, &input)
    }

    fn handle_buttons(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for button in std::mem::take(&mut self.buttons) {
            match button.kind {
                ButtonKind::Pause => {
                    let next = match self.state.status {
                        GameStatus::Running => GameStatus::Paused,
                        GameStatus::Paused => GameStatus::Running,
                        _ => continue,
                    };
                    debug!(status = next.as_ref(), "Pause toggled");
                    events.extend(self.change_status(next));
                }
                ButtonKind::Restart => {
                    let previous = self.state.status;
                    let debug = self.state.debug;
                    self.state = GameState::new(&self.map, &self.rules);
                    self.state.debug = debug;
                    self.state.status = GameStatus::Running;
                    self.accumulator_ms = 0.0;
                    self.direction = None;
                    formatter::set_tick_count(0);
                    info!(map = %self.map.id(), "Simulation reset");
                    if previous != GameStatus::Running {
                        events.push(GameEvent::StatusChanged {
                            from: previous,
                            to: GameStatus::Running,
                        });
                    }
                }
                ButtonKind::DebugToggle => {
                    self.state.debug = !self.state.debug;
                    debug!(enabled = self.state.debug, "Debug overlay toggled");
                }
            }
        }
        events
    }

    fn change_status(&mut self, status: GameStatus) -> Option<GameEvent> {
        self.state
            .set_status(status)
            .map(|from| GameEvent::StatusChanged { from, to: status })
    }
}
