#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`PlayerCommand`]
//! values describing desired mutations, systems answer world [`Event`] streams
//! with internal [`Command`] batches, and the world executes every command via
//! its `apply` entry point. Rejected commands surface a [`CommandError`] whose
//! display text doubles as the user-facing notification.

use std::{f32::consts::PI, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};

mod rules;

pub use rules::{EconomyRules, EnemyRules, GridRules, Rules, TurretRules, WaveRules};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Defence.";

/// Describes the active phase of the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Timed window where placement and repairs are allowed and enemies are dormant.
    Build,
    /// Enemies spawn and advance toward the tower.
    Combat,
    /// Terminal state entered once the tower has no hit points left.
    GameOver,
}

impl Phase {
    /// Human-readable label used by notifications.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Combat => "combat",
            Self::GameOver => "game over",
        }
    }
}

/// Turret statistic that can be upgraded independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeStat {
    /// Bullet damage.
    Damage,
    /// Detection radius.
    Range,
    /// Reload and bullet speed.
    Speed,
}

impl UpgradeStat {
    /// Every upgradeable statistic in display order.
    pub const ALL: [UpgradeStat; 3] = [Self::Damage, Self::Range, Self::Speed];

    /// Human-readable label used by notifications.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Damage => "damage",
            Self::Range => "range",
            Self::Speed => "speed",
        }
    }
}

/// Variants of enemies that can be spawned into the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Regular enemy that routes around barriers.
    Grunt,
    /// Slow, sturdy enemy that chews through barriers blocking its path.
    Breaker,
}

impl EnemyKind {
    /// Reports whether the enemy ignores barriers while planning and breaks them en route.
    #[must_use]
    pub const fn breaks_barriers(self) -> bool {
        matches!(self, Self::Breaker)
    }
}

/// Tool currently selected by the player for grid interactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildTool {
    /// Places a turret on the chosen cell.
    Turret,
    /// Places a barrier on the chosen cell.
    Barrier,
    /// Sells the turret or removes the barrier on the chosen cell.
    Sell,
}

/// Unique identifier assigned to a turret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TurretId(u32);

impl TurretId {
    /// Creates a new turret identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Pixel-space layout of the bounded grid, derived from the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    columns: u32,
    rows: u32,
    cell_size: f32,
    origin: Vec2,
}

impl GridLayout {
    /// Creates a layout from explicit dimensions, cell size and pixel origin.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, cell_size: f32, origin: Vec2) -> Self {
        Self {
            columns,
            rows,
            cell_size,
            origin,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a square cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Pixel position of the grid's upper-left corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Reports whether the cell lies inside the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Cell at the centre of the grid, where the tower sits.
    #[must_use]
    pub const fn center_cell(&self) -> CellCoord {
        CellCoord::new(self.columns / 2, self.rows / 2)
    }

    /// Pixel position of the centre of the provided cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        let half = self.cell_size / 2.0;
        self.origin
            + Vec2::new(
                cell.column() as f32 * self.cell_size + half,
                cell.row() as f32 * self.cell_size + half,
            )
    }

    /// Cell containing the provided pixel, or `None` when the pixel lies outside the grid.
    #[must_use]
    pub fn pixel_to_cell(&self, pixel: Vec2) -> Option<CellCoord> {
        if self.cell_size <= 0.0 {
            return None;
        }

        let local = (pixel - self.origin) / self.cell_size;
        let column = local.x.floor();
        let row = local.y.floor();
        if column < 0.0 || row < 0.0 {
            return None;
        }

        let cell = CellCoord::new(column as u32, row as u32);
        self.contains(cell).then_some(cell)
    }

    /// Cell containing the provided pixel, clamped onto the nearest in-bounds cell.
    #[must_use]
    pub fn clamped_cell(&self, pixel: Vec2) -> CellCoord {
        if self.cell_size <= 0.0 || self.columns == 0 || self.rows == 0 {
            return CellCoord::new(0, 0);
        }

        let local = (pixel - self.origin) / self.cell_size;
        let clamp = |value: f32, count: u32| -> u32 {
            if value.is_nan() || value < 0.0 {
                0
            } else {
                (value.floor() as u32).min(count - 1)
            }
        };
        CellCoord::new(clamp(local.x, self.columns), clamp(local.y, self.rows))
    }
}

/// Per-statistic upgrade tiers of a turret. Tiers start at one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpgradeTiers {
    /// Damage tier.
    pub damage: u8,
    /// Range tier.
    pub range: u8,
    /// Speed tier.
    pub speed: u8,
}

impl UpgradeTiers {
    /// Tiers of a freshly placed turret.
    pub const BASE: Self = Self {
        damage: 1,
        range: 1,
        speed: 1,
    };

    /// Current tier of the provided statistic.
    #[must_use]
    pub const fn tier(&self, stat: UpgradeStat) -> u8 {
        match stat {
            UpgradeStat::Damage => self.damage,
            UpgradeStat::Range => self.range,
            UpgradeStat::Speed => self.speed,
        }
    }

    /// Mutable access to the tier of the provided statistic.
    pub fn tier_mut(&mut self, stat: UpgradeStat) -> &mut u8 {
        match stat {
            UpgradeStat::Damage => &mut self.damage,
            UpgradeStat::Range => &mut self.range,
            UpgradeStat::Speed => &mut self.speed,
        }
    }
}

impl Default for UpgradeTiers {
    fn default() -> Self {
        Self::BASE
    }
}

/// Commands issued by the player through the input layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlayerCommand {
    /// Places a turret on the provided cell.
    PlaceTurret {
        /// Cell receiving the turret.
        cell: CellCoord,
    },
    /// Places a barrier on the provided cell.
    PlaceBarrier {
        /// Cell receiving the barrier.
        cell: CellCoord,
    },
    /// Sells the turret on the cell, or clears the barrier occupying it.
    Sell {
        /// Cell being cleared.
        cell: CellCoord,
    },
    /// Selects the turret on the cell for upgrades, clearing the selection otherwise.
    SelectTurret {
        /// Cell inspected for a turret.
        cell: CellCoord,
    },
    /// Upgrades a statistic of the selected turret.
    UpgradeTurret {
        /// Statistic to upgrade.
        stat: UpgradeStat,
    },
    /// Spends gold to restore tower hit points.
    RepairTower,
    /// Ends the build countdown early.
    SkipBuildPhase,
}

impl From<PlayerCommand> for Command {
    fn from(command: PlayerCommand) -> Self {
        match command {
            PlayerCommand::PlaceTurret { cell } => Command::PlaceTurret { cell },
            PlayerCommand::PlaceBarrier { cell } => Command::PlaceBarrier { cell },
            PlayerCommand::Sell { cell } => Command::Sell { cell },
            PlayerCommand::SelectTurret { cell } => Command::SelectTurret { cell },
            PlayerCommand::UpgradeTurret { stat } => Command::UpgradeTurret { stat },
            PlayerCommand::RepairTower => Command::RepairTower,
            PlayerCommand::SkipBuildPhase => Command::SkipBuildPhase,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Recomputes the grid layout from the provided viewport dimensions in pixels.
    ConfigureViewport {
        /// Viewport width in pixels.
        width: f32,
        /// Viewport height in pixels.
        height: f32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Places a turret on the provided cell.
    PlaceTurret {
        /// Cell receiving the turret.
        cell: CellCoord,
    },
    /// Places a barrier on the provided cell.
    PlaceBarrier {
        /// Cell receiving the barrier.
        cell: CellCoord,
    },
    /// Sells the turret on the cell, or clears the barrier occupying it.
    Sell {
        /// Cell being cleared.
        cell: CellCoord,
    },
    /// Selects the turret on the cell, clearing the selection when none is present.
    SelectTurret {
        /// Cell inspected for a turret.
        cell: CellCoord,
    },
    /// Upgrades a statistic of the selected turret.
    UpgradeTurret {
        /// Statistic to upgrade.
        stat: UpgradeStat,
    },
    /// Spends gold to restore tower hit points.
    RepairTower,
    /// Zeroes the build countdown so combat starts on the next tick.
    SkipBuildPhase,
    /// Resolves a pending spawn by creating an enemy at the provided boundary cell.
    SpawnEnemy {
        /// Boundary cell the enemy enters from.
        cell: CellCoord,
        /// Variant of enemy to create.
        kind: EnemyKind,
    },
    /// Resolves a pending spawn without creating an enemy.
    AbandonSpawn,
    /// Rotates a turret toward the provided bearing at its limited turn rate.
    AimTurret {
        /// Turret being rotated.
        turret: TurretId,
        /// Desired aim angle in radians.
        bearing: f32,
    },
    /// Fires a bullet along the turret's current aim.
    FireTurret {
        /// Turret that fires.
        turret: TurretId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the grid layout was recomputed.
    LayoutChanged {
        /// Layout that became active.
        layout: GridLayout,
    },
    /// Announces that the simulation entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: Phase,
        /// Wave number at the time of the transition.
        wave: u32,
    },
    /// Requests that a system resolve one pending spawn of the current wave.
    SpawnRequested {
        /// Wave the spawn belongs to.
        wave: u32,
    },
    /// Confirms that an enemy entered the grid.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
        /// Boundary cell the enemy entered from.
        cell: CellCoord,
    },
    /// Reports that a pending spawn was dropped without creating an enemy.
    SpawnAbandoned,
    /// Confirms that a turret was placed.
    TurretPlaced {
        /// Identifier assigned to the turret.
        turret: TurretId,
        /// Cell occupied by the turret.
        cell: CellCoord,
    },
    /// Confirms that a turret was sold.
    TurretSold {
        /// Identifier of the sold turret.
        turret: TurretId,
        /// Cell the turret occupied.
        cell: CellCoord,
        /// Gold credited back to the player.
        refund: u32,
    },
    /// Reports the turret currently selected for upgrades.
    TurretSelected {
        /// Selected turret, if any.
        turret: Option<TurretId>,
    },
    /// Confirms that a turret statistic was upgraded.
    TurretUpgraded {
        /// Upgraded turret.
        turret: TurretId,
        /// Statistic that was upgraded.
        stat: UpgradeStat,
        /// Tier reached by the statistic.
        tier: u8,
        /// Gold spent on the upgrade.
        cost: u32,
    },
    /// Confirms that a turret fired a bullet.
    BulletFired {
        /// Turret that fired.
        turret: TurretId,
    },
    /// Confirms that a barrier was placed.
    BarrierPlaced {
        /// Cell occupied by the barrier.
        cell: CellCoord,
    },
    /// Confirms that the player removed a barrier.
    BarrierRemoved {
        /// Cell the barrier occupied.
        cell: CellCoord,
    },
    /// Reports that a breaker enemy damaged a barrier.
    BarrierDamaged {
        /// Damaged barrier.
        cell: CellCoord,
        /// Hit points left on the barrier.
        remaining: u32,
    },
    /// Reports that a barrier was broken through.
    BarrierDestroyed {
        /// Cell the barrier occupied.
        cell: CellCoord,
    },
    /// Reports that an enemy reached the tower.
    TowerDamaged {
        /// Enemy that reached the tower.
        enemy: EnemyId,
        /// Tower hit points left.
        remaining: u32,
    },
    /// Confirms that the tower was repaired.
    TowerRepaired {
        /// Tower hit points after the repair.
        health: u32,
    },
    /// Reports that a bullet killed an enemy.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Gold credited for the kill.
        reward: u32,
    },
    /// Reports that combat ended with the tower standing.
    WaveCleared {
        /// Wave that was cleared.
        wave: u32,
        /// Gold credited for clearing the wave.
        reward: u32,
    },
    /// Reports that a command was rejected without mutating state.
    CommandRejected {
        /// Reason for the rejection.
        error: CommandError,
    },
}

/// Reasons a command may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum CommandError {
    /// The ledger holds less gold than the action costs.
    #[error("insufficient funds: {required} gold required, {available} available")]
    InsufficientFunds {
        /// Gold the action costs.
        required: u32,
        /// Gold currently held.
        available: u32,
    },
    /// The cell is out of bounds, occupied, or holds nothing to act on.
    #[error("cell ({}, {}) cannot be used", .cell.column(), .cell.row())]
    InvalidCell {
        /// Cell named by the command.
        cell: CellCoord,
    },
    /// Placing a barrier would cut every sampled boundary cell off from the tower.
    #[error("no path available to the tower")]
    NoPathAvailable,
    /// The command is not allowed in the current phase.
    #[error("not allowed during the {} phase", .phase.label())]
    InvalidPhase {
        /// Phase active when the command arrived.
        phase: Phase,
    },
    /// An upgrade was requested without a selected turret.
    #[error("select a turret first")]
    NothingSelected,
    /// The statistic already sits at the maximum tier.
    #[error("{} is already at the maximum tier", .stat.label())]
    MaxTierReached {
        /// Statistic named by the command.
        stat: UpgradeStat,
    },
    /// The tower is already at full health.
    #[error("tower is already at full health")]
    TowerAtFullHealth,
    /// The viewport dimensions cannot hold a grid.
    #[error("viewport dimensions must be positive and finite")]
    InvalidViewport,
    /// The game is over and the simulation no longer accepts commands.
    #[error("the game is over")]
    SimulationFrozen,
}

/// Normalises an angle difference into the `[-PI, PI)` range.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

/// Immutable representation of a single turret's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurretSnapshot {
    /// Identifier allocated to the turret by the world.
    pub id: TurretId,
    /// Cell occupied by the turret.
    pub cell: CellCoord,
    /// Pixel position of the turret's centre.
    pub center: Vec2,
    /// Current aim angle in radians.
    pub aim: f32,
    /// Upgrade tiers applied to the turret.
    pub tiers: UpgradeTiers,
    /// Time left before the turret may fire again.
    pub cooldown: Duration,
    /// Detection radius measured in cells.
    pub range_cells: f32,
}

/// Read-only snapshot describing all turrets placed on the grid.
#[derive(Clone, Debug, Default)]
pub struct TurretView {
    snapshots: Vec<TurretSnapshot>,
}

impl TurretView {
    /// Creates a new turret view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TurretSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured turret snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TurretSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of the provided turret.
    #[must_use]
    pub fn get(&self, turret: TurretId) -> Option<&TurretSnapshot> {
        self.snapshots
            .binary_search_by_key(&turret, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TurretSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Identifier assigned to the enemy.
    pub id: EnemyId,
    /// Variant of the enemy, doubling as its asset kind.
    pub kind: EnemyKind,
    /// Pixel position of the enemy.
    pub position: Vec2,
    /// Facing angle in radians, pointing at the tower.
    pub facing: f32,
    /// Remaining hit points.
    pub health: f32,
    /// Hit points the enemy spawned with.
    pub max_health: f32,
    /// Body radius measured in cells.
    pub radius_cells: f32,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a bullet in flight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BulletSnapshot {
    /// Pixel position of the bullet.
    pub position: Vec2,
    /// Velocity in pixels per second.
    pub velocity: Vec2,
    /// Damage dealt on impact.
    pub damage: f32,
}

/// Immutable representation of a barrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrierSnapshot {
    /// Cell occupied by the barrier.
    pub cell: CellCoord,
    /// Remaining barrier hit points.
    pub health: u32,
}

/// Target assignment computed for a single turret.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurretTarget {
    /// Turret that acquired the target.
    pub turret: TurretId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Angle from the turret centre toward the enemy, in radians.
    pub bearing: f32,
    /// Distance between turret and enemy measured in cells.
    pub distance_cells: f32,
}

/// Frozen copy of everything a renderer or HUD reads between steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Active grid layout.
    pub layout: GridLayout,
    /// Cell occupied by the tower.
    pub tower_cell: CellCoord,
    /// Pixel position of the tower's centre.
    pub tower_center: Vec2,
    /// Remaining tower hit points.
    pub tower_health: u32,
    /// Maximum tower hit points.
    pub tower_max_health: u32,
    /// Active phase.
    pub phase: Phase,
    /// Current wave number.
    pub wave: u32,
    /// Gold held by the player.
    pub gold: u32,
    /// Time left on the build countdown; zero outside the build phase.
    pub build_time_remaining: Duration,
    /// Spawns of the current wave that have not produced an enemy yet.
    pub pending_spawns: u32,
    /// Turret selected for upgrades, if any.
    pub selected_turret: Option<TurretId>,
    /// Detection radius of the selected turret in pixels, for the range overlay.
    pub selected_range_px: Option<f32>,
    /// Every barrier on the grid.
    pub barriers: Vec<BarrierSnapshot>,
    /// Every turret on the grid.
    pub turrets: Vec<TurretSnapshot>,
    /// Every live enemy.
    pub enemies: Vec<EnemySnapshot>,
    /// Every bullet in flight.
    pub bullets: Vec<BulletSnapshot>,
}

impl FrameSnapshot {
    /// Tower hit points expressed as a fraction of the maximum.
    #[must_use]
    pub fn tower_health_fraction(&self) -> f32 {
        if self.tower_max_health == 0 {
            return 0.0;
        }
        self.tower_health as f32 / self.tower_max_health as f32
    }
}

#[cfg(test)]
mod tests {
    use super::{
        wrap_angle, CellCoord, CommandError, GridLayout, Phase, PlayerCommand, TurretId,
        UpgradeStat, UpgradeTiers,
    };
    use glam::Vec2;
    use serde::{de::DeserializeOwned, Serialize};
    use std::f32::consts::PI;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn contracts_round_trip_through_bincode() {
        assert_round_trip(&TurretId::new(42));
        assert_round_trip(&CommandError::MaxTierReached {
            stat: UpgradeStat::Range,
        });
        assert_round_trip(&PlayerCommand::Sell {
            cell: CellCoord::new(3, 4),
        });
        assert_round_trip(&GridLayout::new(19, 11, 48.0, Vec2::new(4.0, 0.0)));
    }

    #[test]
    fn cell_center_and_pixel_to_cell_agree() {
        let layout = GridLayout::new(19, 11, 48.0, Vec2::new(10.0, 6.0));
        let cell = CellCoord::new(7, 3);
        let center = layout.cell_center(cell);
        assert_eq!(center, Vec2::new(10.0 + 7.0 * 48.0 + 24.0, 6.0 + 3.0 * 48.0 + 24.0));
        assert_eq!(layout.pixel_to_cell(center), Some(cell));
    }

    #[test]
    fn pixel_outside_grid_has_no_cell() {
        let layout = GridLayout::new(5, 5, 10.0, Vec2::new(20.0, 20.0));
        assert_eq!(layout.pixel_to_cell(Vec2::new(19.0, 25.0)), None);
        assert_eq!(layout.pixel_to_cell(Vec2::new(70.0, 25.0)), None);
        assert_eq!(layout.clamped_cell(Vec2::new(-50.0, 500.0)), CellCoord::new(0, 4));
    }

    #[test]
    fn center_cell_floors_half_dimensions() {
        let layout = GridLayout::new(19, 11, 48.0, Vec2::ZERO);
        assert_eq!(layout.center_cell(), CellCoord::new(9, 5));
    }

    #[test]
    fn wrap_angle_takes_the_short_way_round() {
        let wrapped = wrap_angle(1.5 * PI);
        assert!((wrapped + 0.5 * PI).abs() < 1e-5);
        assert!((wrap_angle(0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn tiers_are_addressable_by_stat() {
        let mut tiers = UpgradeTiers::BASE;
        *tiers.tier_mut(UpgradeStat::Speed) += 2;
        assert_eq!(tiers.tier(UpgradeStat::Speed), 3);
        assert_eq!(tiers.tier(UpgradeStat::Damage), 1);
    }

    #[test]
    fn rejection_messages_are_human_readable() {
        let error = CommandError::InvalidPhase {
            phase: Phase::Combat,
        };
        assert_eq!(error.to_string(), "not allowed during the combat phase");
        assert_eq!(
            CommandError::InsufficientFunds {
                required: 50,
                available: 20
            }
            .to_string(),
            "insufficient funds: 50 gold required, 20 available"
        );
    }
}
