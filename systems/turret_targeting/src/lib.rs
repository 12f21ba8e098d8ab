#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic turret targets from world snapshots.

use glam::Vec2;
use grid_defence_core::{EnemyId, EnemyView, Phase, TurretId, TurretTarget, TurretView};

/// Turret targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TurretTargeting {
    turret_workspace: Vec<TurretWorkspace>,
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TurretTargeting {
    /// Creates a new turret targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes turret targets for the provided world snapshot.
    ///
    /// Each turret picks the nearest enemy whose centre lies within its
    /// detection radius; equal distances resolve to the lower enemy id. The
    /// output buffer is cleared before populating it with the latest
    /// assignments, which are ordered by turret id.
    pub fn handle(
        &mut self,
        phase: Phase,
        turrets: &TurretView,
        enemies: &EnemyView,
        cell_size: f32,
        out: &mut Vec<TurretTarget>,
    ) {
        out.clear();

        if phase != Phase::Combat || !(cell_size > 0.0) {
            return;
        }

        if turrets.iter().next().is_none() || enemies.is_empty() {
            return;
        }

        self.prepare_turret_workspace(turrets, cell_size);
        self.prepare_enemy_workspace(enemies);

        for turret in &self.turret_workspace {
            let max_distance_sq = turret.range_px * turret.range_px;
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.enemy_workspace {
                let offset = candidate.position - turret.center;
                let distance_sq = offset.length_squared();
                if distance_sq > max_distance_sq {
                    continue;
                }

                let current = BestCandidate {
                    distance_sq,
                    enemy: candidate.id,
                    offset,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best_candidate) = best {
                out.push(TurretTarget {
                    turret: turret.id,
                    enemy: best_candidate.enemy,
                    bearing: best_candidate.offset.y.atan2(best_candidate.offset.x),
                    distance_cells: best_candidate.distance_sq.sqrt() / cell_size,
                });
            }
        }
    }

    fn prepare_turret_workspace(&mut self, turrets: &TurretView, cell_size: f32) {
        self.turret_workspace.clear();
        for snapshot in turrets.iter() {
            self.turret_workspace.push(TurretWorkspace {
                id: snapshot.id,
                center: snapshot.center,
                range_px: snapshot.range_cells * cell_size,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        for snapshot in enemies.iter().filter(|snapshot| snapshot.health > 0.0) {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TurretWorkspace {
    id: TurretId,
    center: Vec2,
    range_px: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance_sq: f32,
    enemy: EnemyId,
    offset: Vec2,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }
        self.enemy < other.enemy
    }
}
