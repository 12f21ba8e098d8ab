#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Defence.

mod bullets;
mod economy;
mod enemies;
mod grid;
mod navigation;
mod phase;
mod turrets;

use std::time::Duration;

use glam::Vec2;
use grid_defence_core::{
    wrap_angle, CellCoord, Command, CommandError, EnemyKind, Event, GridLayout, Phase, Rules,
    TurretId, UpgradeStat, WELCOME_BANNER,
};
use tracing::{debug, info, trace};

use bullets::{BulletField, BulletState};
use economy::Ledger;
use enemies::{EnemyRoster, EnemySpawn};
use grid::Grid;
use navigation::Obstacles;
use phase::PhaseClock;
use turrets::TurretRegistry;

const DEFAULT_VIEWPORT_WIDTH: f32 = 912.0;
const DEFAULT_VIEWPORT_HEIGHT: f32 = 528.0;
const FALLBACK_LAYOUT: GridLayout = GridLayout::new(19, 11, 48.0, Vec2::ZERO);

/// Fraction of a cell within which a re-routed enemy counts as standing on
/// the first cell of its new path.
const PATH_SNAP_CELLS: f32 = 0.05;

/// Represents the authoritative Grid Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    rules: Rules,
    grid: Grid,
    ledger: Ledger,
    clock: PhaseClock,
    turrets: TurretRegistry,
    enemies: EnemyRoster,
    bullets: BulletField,
    selected: Option<TurretId>,
    last_dt: Duration,
    tick_index: u64,
}

impl World {
    /// Creates a new world using the default rules and viewport.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Creates a new world governed by the provided rules, laid out for the
    /// default viewport until a `ConfigureViewport` command arrives.
    #[must_use]
    pub fn with_rules(rules: Rules) -> Self {
        let layout =
            grid::layout_for_viewport(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT, &rules.grid)
                .unwrap_or(FALLBACK_LAYOUT);
        Self {
            banner: WELCOME_BANNER,
            grid: Grid::new(layout),
            ledger: Ledger::new(&rules.economy),
            clock: PhaseClock::new(&rules.waves),
            turrets: TurretRegistry::new(),
            enemies: EnemyRoster::new(),
            bullets: BulletField::default(),
            selected: None,
            last_dt: Duration::ZERO,
            tick_index: 0,
            rules,
        }
    }

    fn execute(&mut self, command: Command, out_events: &mut Vec<Event>) -> Result<(), CommandError> {
        match command {
            Command::ConfigureViewport { width, height } => {
                self.configure_viewport(width, height, out_events)
            }
            Command::Tick { dt } => {
                self.tick(dt, out_events);
                Ok(())
            }
            Command::PlaceTurret { cell } => {
                self.require_build()?;
                self.place_turret(cell, out_events)
            }
            Command::PlaceBarrier { cell } => {
                self.require_build()?;
                self.place_barrier(cell, out_events)
            }
            Command::Sell { cell } => {
                self.require_build()?;
                self.sell(cell, out_events)
            }
            Command::SelectTurret { cell } => {
                self.require_build()?;
                self.selected = self.turrets.at(cell);
                out_events.push(Event::TurretSelected {
                    turret: self.selected,
                });
                Ok(())
            }
            Command::UpgradeTurret { stat } => {
                self.require_running()?;
                self.upgrade_selected(stat, out_events)
            }
            Command::RepairTower => {
                self.require_build()?;
                let health = self
                    .ledger
                    .repair_tower(self.rules.economy.repair_cost, self.rules.economy.repair_amount)?;
                debug!(health, "tower repaired");
                out_events.push(Event::TowerRepaired { health });
                Ok(())
            }
            Command::SkipBuildPhase => {
                self.require_build()?;
                debug!(wave = self.clock.wave(), "build phase skipped");
                self.clock.skip_build();
                Ok(())
            }
            Command::SpawnEnemy { cell, kind } => {
                self.spawn_enemy(cell, kind, out_events);
                Ok(())
            }
            Command::AbandonSpawn => {
                if self.clock.phase() == Phase::Combat && self.clock.resolve_spawn() {
                    debug!(wave = self.clock.wave(), "spawn abandoned");
                    out_events.push(Event::SpawnAbandoned);
                }
                Ok(())
            }
            Command::AimTurret { turret, bearing } => {
                let blend = (self.rules.turrets.turn_rate * self.last_dt.as_secs_f32()).min(1.0);
                if let Some(state) = self.turrets.get_mut(turret) {
                    state.aim = wrap_angle(state.aim + wrap_angle(bearing - state.aim) * blend);
                }
                Ok(())
            }
            Command::FireTurret { turret } => {
                self.fire_turret(turret, out_events);
                Ok(())
            }
        }
    }

    fn require_running(&self) -> Result<(), CommandError> {
        if self.clock.phase() == Phase::GameOver {
            Err(CommandError::SimulationFrozen)
        } else {
            Ok(())
        }
    }

    fn require_build(&self) -> Result<(), CommandError> {
        match self.clock.phase() {
            Phase::Build => Ok(()),
            Phase::GameOver => Err(CommandError::SimulationFrozen),
            phase => Err(CommandError::InvalidPhase { phase }),
        }
    }

    fn is_occupied(&self, cell: CellCoord) -> bool {
        self.grid.is_tower_at(cell) || self.grid.is_barrier(cell) || self.turrets.at(cell).is_some()
    }

    fn require_free_cell(&self, cell: CellCoord) -> Result<(), CommandError> {
        if self.grid.in_bounds(cell) && !self.is_occupied(cell) {
            Ok(())
        } else {
            Err(CommandError::InvalidCell { cell })
        }
    }

    fn configure_viewport(
        &mut self,
        width: f32,
        height: f32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), CommandError> {
        let layout = grid::layout_for_viewport(width, height, &self.rules.grid)
            .ok_or(CommandError::InvalidViewport)?;
        let previous = *self.grid.layout();

        let discarded_barriers = self.grid.relayout(layout);
        let tower = self.grid.tower();
        let discarded_turrets = self
            .turrets
            .retain(|turret| layout.contains(turret.cell) && turret.cell != tower);
        if self
            .selected
            .is_some_and(|selected| discarded_turrets.contains(&selected))
        {
            self.selected = None;
        }

        for enemy in self.enemies.iter_mut() {
            let old_cell = previous.clamped_cell(enemy.position);
            let cell = CellCoord::new(
                old_cell.column().min(layout.columns().saturating_sub(1)),
                old_cell.row().min(layout.rows().saturating_sub(1)),
            );
            enemy.position = layout.cell_center(cell);
        }
        self.reroute_enemies(true);
        self.bullets.clear();

        info!(
            columns = layout.columns(),
            rows = layout.rows(),
            cell_size = layout.cell_size(),
            discarded_barriers = discarded_barriers.len(),
            discarded_turrets = discarded_turrets.len(),
            "grid layout changed"
        );
        out_events.push(Event::LayoutChanged { layout });
        Ok(())
    }

    fn place_turret(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) -> Result<(), CommandError> {
        self.require_free_cell(cell)?;
        let cost = self.rules.economy.turret_cost;
        self.ledger.spend(cost)?;
        let turret = self.turrets.insert(cell, cost);
        debug!(turret = turret.get(), column = cell.column(), row = cell.row(), "turret placed");
        out_events.push(Event::TurretPlaced { turret, cell });
        Ok(())
    }

    fn place_barrier(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) -> Result<(), CommandError> {
        self.require_free_cell(cell)?;
        let _ = self
            .grid
            .insert_barrier(cell, self.rules.enemies.barrier_health);

        if !self.grid.tower_reachable(self.rules.grid.reachability_samples) {
            let _ = self.grid.remove_barrier(cell);
            return Err(CommandError::NoPathAvailable);
        }
        if let Err(error) = self.ledger.spend(self.rules.economy.barrier_cost) {
            let _ = self.grid.remove_barrier(cell);
            return Err(error);
        }

        debug!(column = cell.column(), row = cell.row(), "barrier placed");
        out_events.push(Event::BarrierPlaced { cell });
        Ok(())
    }

    fn sell(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) -> Result<(), CommandError> {
        if let Some(turret) = self.turrets.at(cell) {
            let Some(state) = self.turrets.remove(turret) else {
                return Err(CommandError::InvalidCell { cell });
            };
            let refund = self.rules.economy.refund_for(state.spent);
            self.ledger.credit(refund);
            if self.selected == Some(turret) {
                self.selected = None;
            }
            debug!(turret = turret.get(), refund, "turret sold");
            out_events.push(Event::TurretSold {
                turret,
                cell,
                refund,
            });
            return Ok(());
        }

        if self.grid.remove_barrier(cell).is_some() {
            debug!(column = cell.column(), row = cell.row(), "barrier removed");
            out_events.push(Event::BarrierRemoved { cell });
            return Ok(());
        }

        Err(CommandError::InvalidCell { cell })
    }

    fn upgrade_selected(&mut self, stat: UpgradeStat, out_events: &mut Vec<Event>) -> Result<(), CommandError> {
        let turret = self.selected.ok_or(CommandError::NothingSelected)?;
        let current = self
            .turrets
            .get(turret)
            .map(|state| state.tiers.tier(stat))
            .ok_or(CommandError::NothingSelected)?;
        if current >= self.rules.economy.max_tier {
            return Err(CommandError::MaxTierReached { stat });
        }

        let cost = self.rules.economy.upgrade_cost(stat, current);
        self.ledger.spend(cost)?;
        let tier = current.saturating_add(1);
        if let Some(state) = self.turrets.get_mut(turret) {
            *state.tiers.tier_mut(stat) = tier;
        }

        debug!(turret = turret.get(), stat = stat.label(), tier, cost, "turret upgraded");
        out_events.push(Event::TurretUpgraded {
            turret,
            stat,
            tier,
            cost,
        });
        Ok(())
    }

    fn spawn_enemy(&mut self, cell: CellCoord, kind: EnemyKind, out_events: &mut Vec<Event>) {
        if self.clock.phase() != Phase::Combat || !self.clock.resolve_spawn() {
            return;
        }

        let path = if self.grid.in_bounds(cell) && !self.grid.is_barrier(cell) {
            self.grid
                .path_to_tower(cell, Obstacles::for_kind(kind))
                .filter(|path| path.len() > 1)
        } else {
            None
        };
        let Some(path) = path else {
            debug!(column = cell.column(), row = cell.row(), "spawn cell not viable");
            out_events.push(Event::SpawnAbandoned);
            return;
        };

        let wave = self.clock.wave();
        let position = self.grid.layout().cell_center(cell);
        let to_tower = self.grid.tower_center() - position;
        let enemy = self.enemies.spawn(EnemySpawn {
            kind,
            position,
            facing: to_tower.y.atan2(to_tower.x),
            health: self.rules.enemies.health(kind, wave),
            speed: self.rules.enemies.speed(kind, wave),
            radius_cells: self.rules.enemies.radius_cells,
            path,
        });
        debug!(enemy = enemy.get(), ?kind, wave, "enemy spawned");
        out_events.push(Event::EnemySpawned { enemy, kind, cell });
    }

    fn fire_turret(&mut self, turret: TurretId, out_events: &mut Vec<Event>) {
        if self.clock.phase() != Phase::Combat {
            return;
        }
        let layout = *self.grid.layout();
        let Some(state) = self.turrets.get_mut(turret) else {
            return;
        };
        if !state.cooldown.is_zero() {
            return;
        }

        let rules = &self.rules.turrets;
        state.cooldown = rules.cooldown(state.tiers);
        let speed = rules.bullet_speed(state.tiers) * layout.cell_size();
        self.bullets.fire(BulletState {
            position: layout.cell_center(state.cell),
            velocity: Vec2::from_angle(state.aim) * speed,
            damage: rules.bullet_damage(state.tiers),
            life: rules.bullet_lifetime,
        });
        trace!(turret = turret.get(), "turret fired");
        out_events.push(Event::BulletFired { turret });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.clock.phase() == Phase::GameOver {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        self.last_dt = dt;
        out_events.push(Event::TimeAdvanced { dt });

        match self.clock.phase() {
            Phase::Build => {
                if self.clock.advance_build(dt) {
                    let wave = self.clock.wave();
                    let spawns = self.clock.begin_combat(&self.rules.waves);
                    info!(wave, spawns, "combat started");
                    out_events.push(Event::PhaseChanged {
                        phase: Phase::Combat,
                        wave,
                    });
                    let due = self.clock.advance_spawns(Duration::ZERO);
                    self.request_spawns(due, out_events);
                }
            }
            Phase::Combat => {
                let due = self.clock.advance_spawns(dt);
                self.request_spawns(due, out_events);
            }
            Phase::GameOver => {}
        }

        self.turrets.cool_down(dt);
        self.bullets.advance(dt);
        self.advance_enemies(dt, out_events);
        self.resolve_bullet_hits(out_events);

        if self.clock.phase() == Phase::Combat
            && self.enemies.is_empty()
            && self.clock.pending_spawns() == 0
        {
            if self.ledger.tower_destroyed() {
                self.end_game(out_events);
            } else {
                self.finish_wave(out_events);
            }
        }

        if self.clock.phase() != Phase::GameOver && self.ledger.tower_destroyed() {
            self.end_game(out_events);
        }

        trace!(
            tick = self.tick_index,
            enemies = self.enemies.len(),
            gold = self.ledger.gold(),
            "tick processed"
        );
    }

    fn request_spawns(&self, due: u32, out_events: &mut Vec<Event>) {
        let wave = self.clock.wave();
        for _ in 0..due {
            out_events.push(Event::SpawnRequested { wave });
        }
    }

    fn advance_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let layout = *self.grid.layout();
        let cell_size = layout.cell_size();
        let tower_center = self.grid.tower_center();
        let contact_radius = self.rules.enemies.contact_radius_cells * cell_size;
        let tolerance = self.rules.enemies.waypoint_tolerance_px;
        let break_interval = self.rules.enemies.break_interval;
        let break_damage = self.rules.enemies.barrier_damage;
        let step_secs = dt.as_secs_f32();

        let mut reroute = false;
        let mut index = 0;
        while let Some(enemy) = self.enemies.get_mut(index) {
            let Some(target) = enemy.target_cell() else {
                let _ = self.enemies.remove(index);
                continue;
            };

            let mut destroyed = false;
            if enemy.kind.breaks_barriers() && self.grid.is_barrier(target) {
                enemy.break_timer = enemy.break_timer.saturating_add(dt);
                while !break_interval.is_zero() && enemy.break_timer >= break_interval {
                    enemy.break_timer -= break_interval;
                    match self.grid.damage_barrier(target, break_damage) {
                        Some(0) => {
                            destroyed = true;
                            break;
                        }
                        Some(remaining) => out_events.push(Event::BarrierDamaged {
                            cell: target,
                            remaining,
                        }),
                        None => break,
                    }
                }
            } else {
                enemy.break_timer = Duration::ZERO;
                let distance = enemy.speed * cell_size * step_secs;
                let _ = enemy.step_toward(layout.cell_center(target), distance, tolerance);
            }

            let to_tower = tower_center - enemy.position;
            enemy.facing = to_tower.y.atan2(to_tower.x);
            let reached_tower = to_tower.length() <= contact_radius;
            let enemy_id = enemy.id;

            if destroyed {
                debug!(column = target.column(), row = target.row(), "barrier destroyed");
                out_events.push(Event::BarrierDestroyed { cell: target });
                reroute = true;
            }

            if reached_tower {
                let _ = self.enemies.remove(index);
                let remaining = self.ledger.damage_tower(self.rules.enemies.tower_damage);
                debug!(enemy = enemy_id.get(), remaining, "enemy reached the tower");
                out_events.push(Event::TowerDamaged {
                    enemy: enemy_id,
                    remaining,
                });
                continue;
            }
            index += 1;
        }

        if reroute {
            self.reroute_enemies(false);
        }
    }

    /// Re-snaps enemies to the nearest open cell and recomputes their paths.
    /// Breakers keep their route unless `include_breakers` is set.
    fn reroute_enemies(&mut self, include_breakers: bool) {
        let layout = *self.grid.layout();
        let snap_px = PATH_SNAP_CELLS * layout.cell_size();
        let mut index = 0;
        while let Some(enemy) = self.enemies.get_mut(index) {
            if enemy.kind.breaks_barriers() && !include_breakers {
                index += 1;
                continue;
            }

            let start = self.grid.nearest_open_cell(layout.clamped_cell(enemy.position));
            match self
                .grid
                .path_to_tower(start, Obstacles::for_kind(enemy.kind))
            {
                Some(path) => {
                    enemy.assign_path(path, layout.cell_center(start), snap_px);
                    index += 1;
                }
                None => {
                    trace!(enemy = enemy.id.get(), "enemy has no route left");
                    let _ = self.enemies.remove(index);
                }
            }
        }
    }

    fn resolve_bullet_hits(&mut self, out_events: &mut Vec<Event>) {
        let hit_radius = self.rules.turrets.hit_radius(self.grid.layout().cell_size());
        let enemies = &mut self.enemies;
        self.bullets.retain(|bullet| {
            let target = enemies.iter_mut().find(|enemy| {
                enemy.health > 0.0 && enemy.position.distance(bullet.position) <= hit_radius
            });
            match target {
                Some(enemy) => {
                    enemy.health -= bullet.damage;
                    false
                }
                None => true,
            }
        });

        let reward = self.rules.economy.kill_reward;
        for enemy in self.enemies.remove_dead() {
            self.ledger.credit(reward);
            debug!(enemy = enemy.get(), reward, "enemy killed");
            out_events.push(Event::EnemyKilled { enemy, reward });
        }
    }

    fn finish_wave(&mut self, out_events: &mut Vec<Event>) {
        let cleared = self.clock.wave();
        let wave = self.clock.begin_next_build(&self.rules.waves);
        let reward = self.rules.economy.wave_clear_reward(wave);
        self.ledger.credit(reward);
        info!(wave = cleared, reward, gold = self.ledger.gold(), "wave cleared");
        out_events.push(Event::WaveCleared {
            wave: cleared,
            reward,
        });
        out_events.push(Event::PhaseChanged {
            phase: Phase::Build,
            wave,
        });
    }

    fn end_game(&mut self, out_events: &mut Vec<Event>) {
        self.clock.end_game();
        let wave = self.clock.wave();
        info!(wave, "tower destroyed, game over");
        out_events.push(Event::PhaseChanged {
            phase: Phase::GameOver,
            wave,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// A rejected command leaves the world untouched, is reported through
/// [`Event::CommandRejected`] and returned as the error.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), CommandError> {
    let result = world.execute(command, out_events);
    if let Err(error) = result {
        debug!(%error, "command rejected");
        out_events.push(Event::CommandRejected { error });
    }
    result
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use grid_defence_core::{
        CellCoord, EnemyKind, EnemySnapshot, EnemyView, FrameSnapshot, GridLayout, Phase, Rules,
        TurretId, TurretSnapshot, TurretView,
    };

    use super::{navigation::Obstacles, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Rules the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Active grid layout.
    #[must_use]
    pub fn layout(world: &World) -> GridLayout {
        *world.grid.layout()
    }

    /// Cell occupied by the tower.
    #[must_use]
    pub fn tower_cell(world: &World) -> CellCoord {
        world.grid.tower()
    }

    /// Remaining tower hit points.
    #[must_use]
    pub fn tower_health(world: &World) -> u32 {
        world.ledger.tower_health()
    }

    /// Gold currently held by the player.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.ledger.gold()
    }

    /// Active phase.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.clock.phase()
    }

    /// Current wave number, starting at one.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.clock.wave()
    }

    /// Time left on the build countdown; zero outside the build phase.
    #[must_use]
    pub fn build_time_remaining(world: &World) -> Duration {
        world.clock.build_remaining()
    }

    /// Spawns of the current wave that have not resolved yet.
    #[must_use]
    pub fn pending_spawns(world: &World) -> u32 {
        world.clock.pending_spawns()
    }

    /// Turret currently selected for upgrades.
    #[must_use]
    pub fn selected_turret(world: &World) -> Option<TurretId> {
        world.selected
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports whether the cell holds a barrier.
    #[must_use]
    pub fn is_barrier(world: &World, cell: CellCoord) -> bool {
        world.grid.is_barrier(cell)
    }

    /// Reports whether a turret or barrier could be placed on the cell,
    /// ignoring funds and path constraints.
    #[must_use]
    pub fn is_cell_free(world: &World, cell: CellCoord) -> bool {
        world.grid.in_bounds(cell) && !world.is_occupied(cell)
    }

    /// Reports whether sampled boundary cells still reach the tower around the barriers.
    #[must_use]
    pub fn tower_reachable(world: &World) -> bool {
        world
            .grid
            .tower_reachable(world.rules.grid.reachability_samples)
    }

    /// Reports whether an enemy of `kind` entering at `cell` has a route to the tower.
    #[must_use]
    pub fn is_viable_spawn(world: &World, cell: CellCoord, kind: EnemyKind) -> bool {
        world.grid.in_bounds(cell)
            && !world.grid.is_barrier(cell)
            && world
                .grid
                .path_to_tower(cell, Obstacles::for_kind(kind))
                .is_some_and(|path| path.len() > 1)
    }

    /// Captures a read-only view of the turrets ordered by identifier.
    #[must_use]
    pub fn turret_view(world: &World) -> TurretView {
        let layout = world.grid.layout();
        let snapshots = world
            .turrets
            .iter()
            .map(|turret| TurretSnapshot {
                id: turret.id,
                cell: turret.cell,
                center: layout.cell_center(turret.cell),
                aim: turret.aim,
                tiers: turret.tiers,
                cooldown: turret.cooldown,
                range_cells: world.rules.turrets.range_cells(turret.tiers),
            })
            .collect();
        TurretView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the live enemies ordered by identifier.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots: Vec<EnemySnapshot> = world.enemies.iter().map(|enemy| enemy.snapshot()).collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures everything a renderer needs to draw one frame.
    #[must_use]
    pub fn snapshot(world: &World) -> FrameSnapshot {
        let layout = *world.grid.layout();
        let selected_range_px = world
            .selected
            .and_then(|turret| world.turrets.get(turret))
            .map(|turret| world.rules.turrets.range_cells(turret.tiers) * layout.cell_size());

        FrameSnapshot {
            layout,
            tower_cell: world.grid.tower(),
            tower_center: world.grid.tower_center(),
            tower_health: world.ledger.tower_health(),
            tower_max_health: world.ledger.tower_max_health(),
            phase: world.clock.phase(),
            wave: world.clock.wave(),
            gold: world.ledger.gold(),
            build_time_remaining: world.clock.build_remaining(),
            pending_spawns: world.clock.pending_spawns(),
            selected_turret: world.selected,
            selected_range_px,
            barriers: world.grid.barrier_snapshots(),
            turrets: turret_view(world).into_vec(),
            enemies: enemy_view(world).into_vec(),
            bullets: world.bullets.snapshots(),
        }
    }
}
