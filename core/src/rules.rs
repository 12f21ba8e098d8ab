//! Tunable constants that govern grid sizing, economy, waves, enemies and turrets.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{EnemyKind, UpgradeStat, UpgradeTiers};

/// Aggregated tuning knobs controlling every adjustable aspect of the simulation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Viewport-to-grid sizing parameters.
    pub grid: GridRules,
    /// Gold, costs and tower durability.
    pub economy: EconomyRules,
    /// Build countdown, wave size and spawn cadence.
    pub waves: WaveRules,
    /// Enemy stats and barrier breaking.
    pub enemies: EnemyRules,
    /// Turret base stats and upgrade scaling.
    pub turrets: TurretRules,
}

/// Parameters used to derive the grid from the viewport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridRules {
    /// Preferred cell edge length in pixels.
    pub target_cell_size: f32,
    /// Fewest columns the grid may have.
    pub min_columns: u32,
    /// Most columns the grid may have.
    pub max_columns: u32,
    /// Fewest rows the grid may have.
    pub min_rows: u32,
    /// Most rows the grid may have.
    pub max_rows: u32,
    /// Boundary cells sampled when checking that the tower stays reachable.
    pub reachability_samples: usize,
}

impl Default for GridRules {
    fn default() -> Self {
        Self {
            target_cell_size: 48.0,
            min_columns: 12,
            max_columns: 36,
            min_rows: 8,
            max_rows: 24,
            reachability_samples: 12,
        }
    }
}

/// Gold ledger, price list and tower durability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EconomyRules {
    /// Gold held when the game starts.
    pub starting_gold: u32,
    /// Tower hit points when the game starts, and the repair ceiling.
    pub tower_max_health: u32,
    /// Price of a barrier.
    pub barrier_cost: u32,
    /// Price of a turret.
    pub turret_cost: u32,
    /// Price of one tower repair.
    pub repair_cost: u32,
    /// Hit points restored by one tower repair.
    pub repair_amount: u32,
    /// Smallest refund paid when selling a turret.
    pub min_refund: u32,
    /// Fraction of the placement cost refunded when selling a turret.
    pub refund_ratio: f32,
    /// Upgrade base cost for damage; the paid price is the base times the current tier.
    pub damage_upgrade_base: u32,
    /// Upgrade base cost for range.
    pub range_upgrade_base: u32,
    /// Upgrade base cost for speed.
    pub speed_upgrade_base: u32,
    /// Highest tier any statistic may reach.
    pub max_tier: u8,
    /// Gold credited for each enemy killed by a bullet.
    pub kill_reward: u32,
    /// Flat part of the wave-clear reward.
    pub wave_clear_base: u32,
    /// Per-wave part of the wave-clear reward.
    pub wave_clear_per_wave: f32,
}

impl EconomyRules {
    /// Refund paid for a turret that cost `spent` gold to place.
    #[must_use]
    pub fn refund_for(&self, spent: u32) -> u32 {
        let scaled = (spent as f32 * self.refund_ratio).floor() as u32;
        scaled.max(self.min_refund)
    }

    /// Price of raising `stat` from `current_tier` to the next tier.
    #[must_use]
    pub fn upgrade_cost(&self, stat: UpgradeStat, current_tier: u8) -> u32 {
        let base = match stat {
            UpgradeStat::Damage => self.damage_upgrade_base,
            UpgradeStat::Range => self.range_upgrade_base,
            UpgradeStat::Speed => self.speed_upgrade_base,
        };
        base.saturating_mul(u32::from(current_tier.max(1)))
    }

    /// Gold credited when the next build phase for `wave` begins.
    #[must_use]
    pub fn wave_clear_reward(&self, wave: u32) -> u32 {
        self.wave_clear_base + (wave as f32 * self.wave_clear_per_wave).floor() as u32
    }
}

impl Default for EconomyRules {
    fn default() -> Self {
        Self {
            starting_gold: 180,
            tower_max_health: 100,
            barrier_cost: 20,
            turret_cost: 50,
            repair_cost: 30,
            repair_amount: 10,
            min_refund: 10,
            refund_ratio: 0.5,
            damage_upgrade_base: 25,
            range_upgrade_base: 20,
            speed_upgrade_base: 30,
            max_tier: 9,
            kill_reward: 5,
            wave_clear_base: 25,
            wave_clear_per_wave: 6.0,
        }
    }
}

/// Build countdown and wave composition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveRules {
    /// Build countdown before any per-wave growth, in seconds.
    pub build_base_secs: f32,
    /// Build countdown growth per wave, in seconds.
    pub build_per_wave_secs: f32,
    /// Shortest build countdown, in seconds.
    pub build_min_secs: u64,
    /// Enemies in every wave before per-wave growth.
    pub size_base: u32,
    /// Enemies added per wave.
    pub size_per_wave: f32,
    /// Delay between consecutive spawns of a wave.
    pub spawn_interval: Duration,
    /// Random boundary cells tried per spawn before it is dropped.
    pub spawn_attempts: u32,
    /// Breakers only appear in waves strictly after this one.
    pub breaker_after_wave: u32,
    /// Probability that a spawn is a breaker once breakers are unlocked.
    pub breaker_chance: f64,
}

impl WaveRules {
    /// Length of the build countdown that precedes `wave`.
    #[must_use]
    pub fn build_duration(&self, wave: u32) -> Duration {
        let secs = (self.build_base_secs + wave as f32 * self.build_per_wave_secs).floor();
        let secs = if secs.is_finite() && secs > 0.0 {
            secs as u64
        } else {
            0
        };
        Duration::from_secs(secs.max(self.build_min_secs))
    }

    /// Number of spawns scheduled when `wave` enters combat.
    #[must_use]
    pub fn wave_size(&self, wave: u32) -> u32 {
        self.size_base + (wave as f32 * self.size_per_wave).floor() as u32
    }
}

impl Default for WaveRules {
    fn default() -> Self {
        Self {
            build_base_secs: 30.0,
            build_per_wave_secs: 0.2,
            build_min_secs: 10,
            size_base: 5,
            size_per_wave: 2.7,
            spawn_interval: Duration::from_millis(350),
            spawn_attempts: 10,
            breaker_after_wave: 3,
            breaker_chance: 0.1,
        }
    }
}

/// Enemy statistics and barrier-breaking behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyRules {
    /// Grunt hit points before per-wave growth.
    pub grunt_health_base: f32,
    /// Grunt hit points added per wave, floored.
    pub grunt_health_per_wave: f32,
    /// Grunt speed in cells per second before per-wave growth.
    pub grunt_speed_base: f32,
    /// Grunt speed added per wave.
    pub grunt_speed_per_wave: f32,
    /// Breaker hit points before per-wave growth.
    pub breaker_health_base: f32,
    /// Breaker hit points added per wave, floored.
    pub breaker_health_per_wave: f32,
    /// Breaker speed in cells per second before per-wave growth.
    pub breaker_speed_base: f32,
    /// Breaker speed added per wave.
    pub breaker_speed_per_wave: f32,
    /// Body radius in cells.
    pub radius_cells: f32,
    /// Hit points of a freshly placed barrier.
    pub barrier_health: u32,
    /// Damage dealt to a barrier per break cycle.
    pub barrier_damage: u32,
    /// Length of one break cycle.
    pub break_interval: Duration,
    /// Tower damage dealt by an enemy that reaches it.
    pub tower_damage: u32,
    /// Distance from the tower centre, in cells, at which an enemy strikes it.
    pub contact_radius_cells: f32,
    /// Distance in pixels within which a waypoint counts as reached.
    pub waypoint_tolerance_px: f32,
}

impl EnemyRules {
    /// Hit points of an enemy of `kind` spawned during `wave`.
    #[must_use]
    pub fn health(&self, kind: EnemyKind, wave: u32) -> f32 {
        match kind {
            EnemyKind::Grunt => {
                self.grunt_health_base + (wave as f32 * self.grunt_health_per_wave).floor()
            }
            EnemyKind::Breaker => {
                self.breaker_health_base + (wave as f32 * self.breaker_health_per_wave).floor()
            }
        }
    }

    /// Speed in cells per second of an enemy of `kind` spawned during `wave`.
    #[must_use]
    pub fn speed(&self, kind: EnemyKind, wave: u32) -> f32 {
        match kind {
            EnemyKind::Grunt => self.grunt_speed_base + wave as f32 * self.grunt_speed_per_wave,
            EnemyKind::Breaker => {
                self.breaker_speed_base + wave as f32 * self.breaker_speed_per_wave
            }
        }
    }
}

impl Default for EnemyRules {
    fn default() -> Self {
        Self {
            grunt_health_base: 18.0,
            grunt_health_per_wave: 3.0,
            grunt_speed_base: 1.0,
            grunt_speed_per_wave: 0.15,
            breaker_health_base: 40.0,
            breaker_health_per_wave: 5.0,
            breaker_speed_base: 0.5,
            breaker_speed_per_wave: 0.03,
            radius_cells: 0.35,
            barrier_health: 10,
            barrier_damage: 5,
            break_interval: Duration::from_millis(500),
            tower_damage: 6,
            contact_radius_cells: 0.6,
            waypoint_tolerance_px: 0.5,
        }
    }
}

/// Turret base statistics and per-tier scaling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurretRules {
    /// Damage of a tier-one bullet.
    pub base_damage: f32,
    /// Reload time at tier-one speed.
    pub base_cooldown: Duration,
    /// Detection radius at tier-one range, in cells.
    pub base_range_cells: f32,
    /// Bullet speed at tier-one speed, in cells per second.
    pub bullet_speed_cells: f32,
    /// Time a bullet stays in flight before expiring.
    pub bullet_lifetime: Duration,
    /// Smallest hit radius of a bullet in pixels.
    pub hit_radius_min_px: f32,
    /// Hit radius of a bullet as a fraction of the cell size.
    pub hit_radius_cells: f32,
    /// Proportional turn rate; each step closes `min(1, turn_rate * dt)` of the aim error.
    pub turn_rate: f32,
    /// Damage gained per damage tier above one, as a fraction of the base.
    pub damage_per_tier: f32,
    /// Range gained per range tier above one, as a fraction of the base.
    pub range_per_tier: f32,
    /// Reload speed gained per speed tier above one.
    pub reload_per_tier: f32,
    /// Bullet speed gained per speed tier above one, as a fraction of the base.
    pub bullet_speed_per_tier: f32,
}

impl TurretRules {
    /// Detection radius in cells for the provided tiers.
    #[must_use]
    pub fn range_cells(&self, tiers: UpgradeTiers) -> f32 {
        self.base_range_cells * scale(self.range_per_tier, tiers.range)
    }

    /// Reload time for the provided tiers.
    #[must_use]
    pub fn cooldown(&self, tiers: UpgradeTiers) -> Duration {
        self.base_cooldown
            .div_f64(f64::from(scale(self.reload_per_tier, tiers.speed)))
    }

    /// Bullet speed in cells per second for the provided tiers.
    #[must_use]
    pub fn bullet_speed(&self, tiers: UpgradeTiers) -> f32 {
        self.bullet_speed_cells * scale(self.bullet_speed_per_tier, tiers.speed)
    }

    /// Bullet damage for the provided tiers.
    #[must_use]
    pub fn bullet_damage(&self, tiers: UpgradeTiers) -> f32 {
        self.base_damage * scale(self.damage_per_tier, tiers.damage)
    }

    /// Radius in pixels within which a bullet strikes an enemy.
    #[must_use]
    pub fn hit_radius(&self, cell_size: f32) -> f32 {
        self.hit_radius_min_px.max(cell_size * self.hit_radius_cells)
    }
}

impl Default for TurretRules {
    fn default() -> Self {
        Self {
            base_damage: 6.0,
            base_cooldown: Duration::from_millis(900),
            base_range_cells: 4.5,
            bullet_speed_cells: 10.0,
            bullet_lifetime: Duration::from_millis(1600),
            hit_radius_min_px: 8.0,
            hit_radius_cells: 0.18,
            turn_rate: 5.0,
            damage_per_tier: 0.9,
            range_per_tier: 0.1,
            reload_per_tier: 0.8,
            bullet_speed_per_tier: 0.9,
        }
    }
}

fn scale(per_tier: f32, tier: u8) -> f32 {
    1.0 + per_tier * f32::from(tier.saturating_sub(1))
}
