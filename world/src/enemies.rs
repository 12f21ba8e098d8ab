//! Enemy roster and per-step locomotion.

use std::time::Duration;

use glam::Vec2;
use grid_defence_core::{CellCoord, EnemyId, EnemyKind, EnemySnapshot};

/// Live enemy walking a cell path toward the tower.
#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    /// Pixel position of the body centre.
    pub(crate) position: Vec2,
    /// Angle in radians pointing at the tower.
    pub(crate) facing: f32,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    /// Speed in cells per second.
    pub(crate) speed: f32,
    pub(crate) radius_cells: f32,
    pub(crate) path: Vec<CellCoord>,
    /// Index of the waypoint currently walked toward.
    pub(crate) waypoint: usize,
    /// Time spent hammering the barrier in front of a breaker.
    pub(crate) break_timer: Duration,
}

impl EnemyState {
    /// Cell the enemy is heading for, saturating at the final path cell.
    pub(crate) fn target_cell(&self) -> Option<CellCoord> {
        let last = self.path.len().checked_sub(1)?;
        self.path.get(self.waypoint.min(last)).copied()
    }

    /// Moves up to `distance` pixels toward `target` along a single axis,
    /// resolving whichever axis has the larger remaining gap first.
    ///
    /// Returns `true` when the waypoint lies within `tolerance` on both axes,
    /// in which case the position snaps onto it and the path index advances.
    pub(crate) fn step_toward(&mut self, target: Vec2, distance: f32, tolerance: f32) -> bool {
        let delta = target - self.position;
        if delta.x.abs() <= tolerance && delta.y.abs() <= tolerance {
            self.position = target;
            self.waypoint = self.waypoint.saturating_add(1);
            return true;
        }

        if delta.x.abs() >= delta.y.abs() {
            self.position.x += delta.x.signum() * distance.min(delta.x.abs());
        } else {
            self.position.y += delta.y.signum() * distance.min(delta.y.abs());
        }
        false
    }

    /// Installs a freshly computed path. The first waypoint is skipped when
    /// the enemy already stands on it.
    pub(crate) fn assign_path(&mut self, path: Vec<CellCoord>, first_center: Vec2, snap_px: f32) {
        self.waypoint = usize::from(self.position.distance(first_center) <= snap_px);
        self.path = path;
        self.break_timer = Duration::ZERO;
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            facing: self.facing,
            health: self.health,
            max_health: self.max_health,
            radius_cells: self.radius_cells,
        }
    }
}

/// Enemies in spawn order together with the identifier counter.
#[derive(Clone, Debug)]
pub(crate) struct EnemyRoster {
    entries: Vec<EnemyState>,
    next_enemy_id: EnemyId,
}

/// Statistics of an enemy about to enter the grid.
#[derive(Clone, Debug)]
pub(crate) struct EnemySpawn {
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec2,
    pub(crate) facing: f32,
    pub(crate) health: f32,
    pub(crate) speed: f32,
    pub(crate) radius_cells: f32,
    pub(crate) path: Vec<CellCoord>,
}

impl EnemyRoster {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    /// Adds an enemy standing on the first cell of its path.
    pub(crate) fn spawn(&mut self, spawn: EnemySpawn) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        self.entries.push(EnemyState {
            id,
            kind: spawn.kind,
            position: spawn.position,
            facing: spawn.facing,
            health: spawn.health,
            max_health: spawn.health,
            speed: spawn.speed,
            radius_cells: spawn.radius_cells,
            path: spawn.path,
            waypoint: 1,
            break_timer: Duration::ZERO,
        });
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut EnemyState> {
        self.entries.get_mut(index)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &EnemyState> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut EnemyState> {
        self.entries.iter_mut()
    }

    /// Removes the enemy at `index`, preserving the order of the rest.
    pub(crate) fn remove(&mut self, index: usize) -> Option<EnemyState> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Drops every enemy without hit points left, returning their identifiers.
    pub(crate) fn remove_dead(&mut self) -> Vec<EnemyId> {
        let dead = self
            .entries
            .iter()
            .filter(|enemy| enemy.health <= 0.0)
            .map(|enemy| enemy.id)
            .collect();
        self.entries.retain(|enemy| enemy.health > 0.0);
        dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grunt_at(position: Vec2) -> EnemySpawn {
        EnemySpawn {
            kind: EnemyKind::Grunt,
            position,
            facing: 0.0,
            health: 21.0,
            speed: 1.15,
            radius_cells: 0.35,
            path: vec![CellCoord::new(0, 0), CellCoord::new(1, 0)],
        }
    }

    #[test]
    fn spawned_enemies_receive_sequential_identifiers() {
        let mut roster = EnemyRoster::new();
        let first = roster.spawn(grunt_at(Vec2::ZERO));
        let second = roster.spawn(grunt_at(Vec2::ZERO));
        assert_eq!(first, EnemyId::new(0));
        assert_eq!(second, EnemyId::new(1));
        assert_eq!(roster.len(), 2);

        let removed = roster.remove(0).expect("enemy");
        assert_eq!(removed.id, first);
        assert!(roster.remove(5).is_none());
        assert_eq!(roster.iter().next().map(|enemy| enemy.id), Some(second));
    }

    #[test]
    fn dead_enemies_are_collected_in_spawn_order() {
        let mut roster = EnemyRoster::new();
        for _ in 0..3 {
            let _ = roster.spawn(grunt_at(Vec2::ZERO));
        }
        for enemy in roster.iter_mut().filter(|enemy| enemy.id != EnemyId::new(1)) {
            enemy.health = 0.0;
        }

        assert_eq!(roster.remove_dead(), vec![EnemyId::new(0), EnemyId::new(2)]);
        assert_eq!(roster.len(), 1);
        assert!(!roster.is_empty());
    }

    #[test]
    fn larger_axis_is_resolved_first() {
        let mut roster = EnemyRoster::new();
        let _ = roster.spawn(grunt_at(Vec2::new(0.0, 0.0)));
        let enemy = roster.get_mut(0).expect("enemy");

        assert!(!enemy.step_toward(Vec2::new(10.0, 4.0), 3.0, 0.5));
        assert_eq!(enemy.position, Vec2::new(3.0, 0.0));
        assert!(!enemy.step_toward(Vec2::new(10.0, 4.0), 3.0, 0.5));
        assert!(!enemy.step_toward(Vec2::new(10.0, 4.0), 3.0, 0.5));
        assert_eq!(enemy.position, Vec2::new(9.0, 0.0));
        assert!(!enemy.step_toward(Vec2::new(10.0, 4.0), 3.0, 0.5));
        assert_eq!(enemy.position, Vec2::new(9.0, 3.0));
    }

    #[test]
    fn reaching_a_waypoint_snaps_and_advances() {
        let mut roster = EnemyRoster::new();
        let _ = roster.spawn(grunt_at(Vec2::new(9.7, 0.0)));
        let enemy = roster.get_mut(0).expect("enemy");
        assert_eq!(enemy.waypoint, 1);

        assert!(enemy.step_toward(Vec2::new(10.0, 0.0), 3.0, 0.5));
        assert_eq!(enemy.position, Vec2::new(10.0, 0.0));
        assert_eq!(enemy.waypoint, 2);
        assert_eq!(enemy.target_cell(), Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn reassigned_path_skips_the_cell_underfoot() {
        let mut roster = EnemyRoster::new();
        let _ = roster.spawn(grunt_at(Vec2::new(24.0, 24.0)));
        let enemy = roster.get_mut(0).expect("enemy");

        enemy.assign_path(vec![CellCoord::new(0, 0)], Vec2::new(24.0, 24.0), 2.4);
        assert_eq!(enemy.waypoint, 1);

        enemy.assign_path(vec![CellCoord::new(1, 0)], Vec2::new(72.0, 24.0), 2.4);
        assert_eq!(enemy.waypoint, 0);
    }
}
