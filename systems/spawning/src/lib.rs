#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system that resolves the world's spawn requests into concrete entry cells.

use grid_defence_core::{CellCoord, Command, EnemyKind, Event, WaveRules};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    attempts: u32,
    breaker_after_wave: u32,
    breaker_chance: f64,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// Each request tries up to `attempts` random boundary cells. Waves after
    /// `breaker_after_wave` roll `breaker_chance` per attempt for a breaker.
    #[must_use]
    pub const fn new(
        rng_seed: u64,
        attempts: u32,
        breaker_after_wave: u32,
        breaker_chance: f64,
    ) -> Self {
        Self {
            rng_seed,
            attempts,
            breaker_after_wave,
            breaker_chance,
        }
    }

    /// Derives the configuration from the wave rules.
    #[must_use]
    pub fn from_rules(rng_seed: u64, rules: &WaveRules) -> Self {
        Self::new(
            rng_seed,
            rules.spawn_attempts,
            rules.breaker_after_wave,
            rules.breaker_chance,
        )
    }
}

/// Side of the grid an enemy enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

const SIDES: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

/// Pure system that answers every `SpawnRequested` event with exactly one
/// `SpawnEnemy` or `AbandonSpawn` command.
#[derive(Debug)]
pub struct Spawning<R = ChaCha8Rng> {
    attempts: u32,
    breaker_after_wave: u32,
    breaker_chance: f64,
    rng: R,
}

impl Spawning<ChaCha8Rng> {
    /// Creates a new spawning system seeded from the configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(config.rng_seed))
    }
}

impl<R: Rng> Spawning<R> {
    /// Creates a spawning system drawing from the provided random source.
    #[must_use]
    pub fn with_rng(config: Config, rng: R) -> Self {
        Self {
            attempts: config.attempts,
            breaker_after_wave: config.breaker_after_wave,
            breaker_chance: probability(config.breaker_chance),
            rng,
        }
    }

    /// Consumes events and emits one resolution command per spawn request.
    ///
    /// `is_viable` reports whether an enemy of the provided kind entering at
    /// the cell has a route to the tower.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        columns: u32,
        rows: u32,
        is_viable: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord, EnemyKind) -> bool,
    {
        for event in events {
            if let Event::SpawnRequested { wave } = event {
                let command = self
                    .pick_spawn(*wave, columns, rows, &is_viable)
                    .map_or(Command::AbandonSpawn, |(cell, kind)| Command::SpawnEnemy {
                        cell,
                        kind,
                    });
                out.push(command);
            }
        }
    }

    fn pick_spawn<F>(
        &mut self,
        wave: u32,
        columns: u32,
        rows: u32,
        is_viable: &F,
    ) -> Option<(CellCoord, EnemyKind)>
    where
        F: Fn(CellCoord, EnemyKind) -> bool,
    {
        if columns == 0 || rows == 0 {
            return None;
        }

        for _ in 0..self.attempts {
            let cell = self.boundary_cell(columns, rows);
            let kind = self.roll_kind(wave);
            if is_viable(cell, kind) {
                return Some((cell, kind));
            }
        }
        None
    }

    fn boundary_cell(&mut self, columns: u32, rows: u32) -> CellCoord {
        let side = SIDES[self.rng.gen_range(0..SIDES.len())];
        match side {
            Side::Top => CellCoord::new(self.rng.gen_range(0..columns), 0),
            Side::Bottom => CellCoord::new(self.rng.gen_range(0..columns), rows - 1),
            Side::Left => CellCoord::new(0, self.rng.gen_range(0..rows)),
            Side::Right => CellCoord::new(columns - 1, self.rng.gen_range(0..rows)),
        }
    }

    fn roll_kind(&mut self, wave: u32) -> EnemyKind {
        if wave > self.breaker_after_wave && self.rng.gen_bool(self.breaker_chance) {
            EnemyKind::Breaker
        } else {
            EnemyKind::Grunt
        }
    }
}

/// Clamps a probability into `[0, 1]`; NaN and infinities disable the roll.
fn probability(chance: f64) -> f64 {
    if chance.is_finite() {
        chance.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
