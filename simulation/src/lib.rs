#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation engine that owns the world and wires the pure systems around it.
//!
//! Adapters drive a [`Simulation`] with fixed time steps and player commands
//! and read back [`FrameSnapshot`]s; they never touch the world directly.

use std::{mem, time::Duration};

use grid_defence_core::{
    Command, CommandError, Event, FrameSnapshot, PlayerCommand, Rules, TurretTarget,
};
use grid_defence_system_builder::Builder;
pub use grid_defence_system_builder::BuilderInput;
use grid_defence_system_spawning::{Config as SpawningConfig, Spawning};
use grid_defence_system_turret_combat::TurretCombat;
use grid_defence_system_turret_targeting::TurretTargeting;
use grid_defence_world::{self as world, query, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

/// Parameters used to construct a simulation.
#[derive(Clone, Debug, Default)]
pub struct SimulationConfig {
    seed: u64,
    rules: Rules,
    viewport: Option<(f32, f32)>,
}

impl SimulationConfig {
    /// Creates a configuration with default rules and the provided RNG seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Replaces the rules governing the world.
    #[must_use]
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Lays the grid out for a viewport of the provided size in pixels.
    #[must_use]
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Some((width, height));
        self
    }

    /// Seed feeding the spawn RNG.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Simulation engine instance. One per game; restart by building a new one.
#[derive(Debug)]
pub struct Simulation<R = ChaCha8Rng> {
    world: World,
    builder: Builder,
    spawning: Spawning<R>,
    targeting: TurretTargeting,
    combat: TurretCombat,
    targets: Vec<TurretTarget>,
    builder_events: Vec<Event>,
    journal: Vec<Event>,
}

impl Simulation<ChaCha8Rng> {
    /// Creates a simulation whose spawn RNG is seeded from the configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, CommandError> {
        let spawning = SpawningConfig::from_rules(config.seed, &config.rules.waves);
        Self::with_spawning(config, Spawning::new(spawning))
    }
}

impl<R: Rng> Simulation<R> {
    /// Creates a simulation drawing spawn decisions from the provided RNG.
    pub fn with_rng(config: SimulationConfig, rng: R) -> Result<Self, CommandError> {
        let spawning = SpawningConfig::from_rules(config.seed, &config.rules.waves);
        Self::with_spawning(config, Spawning::with_rng(spawning, rng))
    }

    fn with_spawning(config: SimulationConfig, spawning: Spawning<R>) -> Result<Self, CommandError> {
        let mut simulation = Self {
            world: World::with_rules(config.rules),
            builder: Builder::new(),
            spawning,
            targeting: TurretTargeting::new(),
            combat: TurretCombat::new(),
            targets: Vec::new(),
            builder_events: Vec::new(),
            journal: Vec::new(),
        };
        if let Some((width, height)) = config.viewport {
            simulation.resize(width, height)?;
        }

        let layout = query::layout(&simulation.world);
        info!(
            seed = config.seed,
            columns = layout.columns(),
            rows = layout.rows(),
            "{}",
            query::welcome_banner(&simulation.world)
        );
        Ok(simulation)
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Advances the simulation by one fixed time step.
    ///
    /// The world ticks first; spawn requests are resolved, then turrets pick
    /// targets, turn and fire against the post-tick state.
    pub fn step(&mut self, dt: Duration) {
        let mut events = Vec::new();
        if let Err(error) = world::apply(&mut self.world, Command::Tick { dt }, &mut events) {
            trace!(?error, "tick rejected");
        }
        self.dispatch(events);
        self.engage();
    }

    /// Executes a player command, returning the rejection reason on failure.
    pub fn execute(&mut self, command: PlayerCommand) -> Result<(), CommandError> {
        let mut events = Vec::new();
        let result = world::apply(&mut self.world, command.into(), &mut events);
        if let Err(error) = result {
            debug!(?command, %error, "player command rejected");
        }
        self.dispatch(events);
        result
    }

    /// Feeds one frame of pointer and button input through the builder.
    ///
    /// Returns the outcome of every command the input produced, in order.
    pub fn apply_input(&mut self, input: BuilderInput) -> Vec<Result<(), CommandError>> {
        let events = mem::take(&mut self.builder_events);
        let mut commands = Vec::new();
        let current = &self.world;
        self.builder.handle(
            &events,
            input,
            |cell| query::turret_view(current).iter().any(|turret| turret.cell == cell),
            &mut commands,
        );
        commands
            .into_iter()
            .map(|command| self.execute(command))
            .collect()
    }

    /// Recomputes the grid layout for a viewport of the provided size.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), CommandError> {
        let mut events = Vec::new();
        let result = world::apply(
            &mut self.world,
            Command::ConfigureViewport { width, height },
            &mut events,
        );
        self.dispatch(events);
        result
    }

    /// Captures the state a renderer needs for one frame.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        query::snapshot(&self.world)
    }

    /// Removes and returns every event emitted since the previous drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        mem::take(&mut self.journal)
    }

    fn engage(&mut self) {
        let phase = query::phase(&self.world);
        let turrets = query::turret_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        let cell_size = query::layout(&self.world).cell_size();

        self.targeting
            .handle(phase, &turrets, &enemies, cell_size, &mut self.targets);
        let mut commands = Vec::new();
        self.combat
            .handle(phase, &turrets, &self.targets, &mut commands);
        trace!(
            targets = self.targets.len(),
            commands = commands.len(),
            "turrets engaged"
        );

        let mut events = Vec::new();
        for command in commands {
            if let Err(error) = world::apply(&mut self.world, command, &mut events) {
                trace!(?error, "turret command rejected");
            }
        }
        self.dispatch(events);
    }

    /// Routes events to the systems until no further commands are produced.
    fn dispatch(&mut self, mut pending: Vec<Event>) {
        while !pending.is_empty() {
            let layout = query::layout(&self.world);
            let current = &self.world;
            let mut commands = Vec::new();
            self.spawning.handle(
                &pending,
                layout.columns(),
                layout.rows(),
                |cell, kind| query::is_viable_spawn(current, cell, kind),
                &mut commands,
            );

            self.builder_events.extend(
                pending
                    .iter()
                    .filter(|event| matches!(event, Event::PhaseChanged { .. }))
                    .cloned(),
            );
            self.journal.append(&mut pending);

            for command in commands {
                if let Err(error) = world::apply(&mut self.world, command, &mut pending) {
                    trace!(?error, "spawn command rejected");
                }
            }
        }
    }
}
