#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits aiming and firing commands from targeting data.

use grid_defence_core::{Command, Phase, TurretTarget, TurretView};

/// Turret combat system that steers turrets toward their targets and fires
/// those whose cooldown has elapsed.
#[derive(Debug, Default)]
pub struct TurretCombat {
    scratch: Vec<Command>,
}

impl TurretCombat {
    /// Creates a new turret combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::AimTurret` for every targeted turret, followed by
    /// `Command::FireTurret` when that turret is ready to fire.
    pub fn handle(
        &mut self,
        phase: Phase,
        turrets: &TurretView,
        turret_targets: &[TurretTarget],
        out: &mut Vec<Command>,
    ) {
        if phase != Phase::Combat || turret_targets.is_empty() {
            return;
        }

        self.scratch.clear();

        for target in turret_targets {
            let Some(snapshot) = turrets.get(target.turret) else {
                continue;
            };

            self.scratch.push(Command::AimTurret {
                turret: target.turret,
                bearing: target.bearing,
            });
            if snapshot.cooldown.is_zero() {
                self.scratch.push(Command::FireTurret {
                    turret: target.turret,
                });
            }
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_defence_core::{CellCoord, EnemyId, TurretId, TurretSnapshot, UpgradeTiers};
    use std::time::Duration;

    fn snapshot(id: u32, cooldown: Duration) -> TurretSnapshot {
        TurretSnapshot {
            id: TurretId::new(id),
            cell: CellCoord::new(id, 0),
            center: Default::default(),
            aim: 0.0,
            tiers: UpgradeTiers::BASE,
            cooldown,
            range_cells: 4.5,
        }
    }

    fn target(turret: u32, enemy: u32, bearing: f32) -> TurretTarget {
        TurretTarget {
            turret: TurretId::new(turret),
            enemy: EnemyId::new(enemy),
            bearing,
            distance_cells: 1.0,
        }
    }

    #[test]
    fn build_phase_is_silent() {
        let mut system = TurretCombat::new();
        let turrets = TurretView::from_snapshots(vec![snapshot(1, Duration::ZERO)]);
        let mut out = Vec::new();

        system.handle(Phase::Build, &turrets, &[target(1, 7, 0.5)], &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn firing_respects_cooldown_readiness() {
        let mut system = TurretCombat::new();
        let turrets = TurretView::from_snapshots(vec![
            snapshot(2, Duration::ZERO),
            snapshot(5, Duration::from_millis(300)),
        ]);
        let targets = vec![target(2, 4, 1.0), target(5, 1, -1.0)];
        let mut out = Vec::new();

        system.handle(Phase::Combat, &turrets, &targets, &mut out);

        assert_eq!(
            out,
            vec![
                Command::AimTurret {
                    turret: TurretId::new(2),
                    bearing: 1.0,
                },
                Command::FireTurret {
                    turret: TurretId::new(2),
                },
                Command::AimTurret {
                    turret: TurretId::new(5),
                    bearing: -1.0,
                },
            ]
        );
    }

    #[test]
    fn targets_of_unknown_turrets_are_skipped() {
        let mut system = TurretCombat::new();
        let turrets = TurretView::from_snapshots(vec![snapshot(0, Duration::ZERO)]);
        let mut out = Vec::new();

        system.handle(Phase::Combat, &turrets, &[target(3, 0, 0.0)], &mut out);

        assert!(out.is_empty());
    }
}
