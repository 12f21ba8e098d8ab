#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line driver for the Grid Defence simulation.
//!
//! Builds a ring of turrets around the tower, skips every build countdown and
//! fights waves with a fixed time step, printing one summary line per wave.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use grid_defence_core::{CellCoord, CommandError, Event, Phase, PlayerCommand};
use grid_defence_simulation::{Simulation, SimulationConfig};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Upper bound on simulated combat time for a single wave.
const MAX_WAVE_TIME: Duration = Duration::from_secs(600);

/// Runs the Grid Defence simulation without a renderer.
#[derive(Debug, Parser)]
#[command(name = "grid-defence")]
#[command(about = "Headless Grid Defence simulation", long_about = None)]
#[command(version)]
struct Args {
    /// Seed for the spawn RNG.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Number of waves to fight before stopping.
    #[arg(long, default_value_t = 5)]
    waves: u32,
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 912.0)]
    width: f32,
    /// Viewport height in pixels.
    #[arg(long, default_value_t = 528.0)]
    height: f32,
    /// Fixed simulation step in milliseconds.
    #[arg(long = "dt-ms", default_value_t = 16)]
    dt_ms: u64,
    /// Turrets to try placing around the tower before the first wave.
    #[arg(long, default_value_t = 3)]
    turrets: usize,
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,
}

/// Totals gathered while one wave plays out.
#[derive(Debug, Default)]
struct WaveTally {
    kills: u32,
    hits: u32,
    cleared: bool,
}

impl WaveTally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::EnemyKilled { .. } => self.kills += 1,
                Event::TowerDamaged { .. } => self.hits += 1,
                Event::WaveCleared { .. } => self.cleared = true,
                _ => {}
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .with_context(|| format!("invalid log filter `{}`", args.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if args.dt_ms == 0 {
        bail!("--dt-ms must be at least 1");
    }

    let config = SimulationConfig::new(args.seed).with_viewport(args.width, args.height);
    let mut simulation = Simulation::new(config).context("failed to start the simulation")?;

    let placed = fortify(&mut simulation, args.turrets);
    info!(placed, requested = args.turrets, "turrets placed around the tower");

    let dt = Duration::from_millis(args.dt_ms);
    for _ in 0..args.waves {
        let wave = simulation.snapshot().wave;
        let tally = fight_wave(&mut simulation, dt)
            .with_context(|| format!("wave {wave} did not finish"))?;

        let snapshot = simulation.snapshot();
        println!(
            "wave {wave}: {} | gold {} | tower {}/{} | kills {} | hits {}",
            if tally.cleared { "cleared" } else { "lost" },
            snapshot.gold,
            snapshot.tower_health,
            snapshot.tower_max_health,
            tally.kills,
            tally.hits,
        );

        if snapshot.phase == Phase::GameOver {
            println!("game over on wave {wave}");
            break;
        }
        repair(&mut simulation);
    }

    Ok(())
}

/// Places turrets on the square ring two cells out from the tower, returning
/// how many were accepted.
fn fortify(simulation: &mut Simulation, wanted: usize) -> usize {
    let snapshot = simulation.snapshot();
    let tower = snapshot.tower_cell;
    let mut placed = 0;

    for cell in ring_around(tower, 2) {
        if placed == wanted {
            break;
        }
        match simulation.execute(PlayerCommand::PlaceTurret { cell }) {
            Ok(()) => placed += 1,
            Err(CommandError::InsufficientFunds { .. }) => break,
            Err(error) => debug!(?cell, %error, "skipping turret cell"),
        }
    }
    placed
}

/// Cells at Chebyshev distance `radius` from `center`, clockwise from the top left.
fn ring_around(center: CellCoord, radius: u32) -> Vec<CellCoord> {
    let (column, row) = (i64::from(center.column()), i64::from(center.row()));
    let radius = i64::from(radius);
    let mut cells = Vec::new();

    for dx in -radius..=radius {
        cells.push((column + dx, row - radius));
    }
    for dy in (1 - radius)..=radius {
        cells.push((column + radius, row + dy));
    }
    for dx in (-radius..radius).rev() {
        cells.push((column + dx, row + radius));
    }
    for dy in ((1 - radius)..radius).rev() {
        cells.push((column - radius, row + dy));
    }

    cells
        .into_iter()
        .filter_map(|(x, y)| {
            let x = u32::try_from(x).ok()?;
            let y = u32::try_from(y).ok()?;
            Some(CellCoord::new(x, y))
        })
        .collect()
}

/// Skips the build countdown and steps until the wave clears or the tower falls.
fn fight_wave(simulation: &mut Simulation, dt: Duration) -> Result<WaveTally> {
    let mut tally = WaveTally::default();
    if let Err(error) = simulation.execute(PlayerCommand::SkipBuildPhase) {
        warn!(%error, "could not skip the build phase");
    }
    let _ = simulation.drain_events();

    let mut elapsed = Duration::ZERO;
    while elapsed < MAX_WAVE_TIME {
        simulation.step(dt);
        elapsed += dt;
        tally.record(&simulation.drain_events());

        if tally.cleared || simulation.snapshot().phase == Phase::GameOver {
            return Ok(tally);
        }
    }
    bail!("combat exceeded {} seconds", MAX_WAVE_TIME.as_secs())
}

fn repair(simulation: &mut Simulation) {
    let snapshot = simulation.snapshot();
    if snapshot.tower_health == snapshot.tower_max_health {
        return;
    }
    match simulation.execute(PlayerCommand::RepairTower) {
        Ok(()) => info!(
            health = simulation.snapshot().tower_health,
            "tower repaired"
        ),
        Err(error) => debug!(%error, "tower left damaged"),
    }
}
