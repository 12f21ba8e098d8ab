//! Authoritative turret state management utilities.

use std::{collections::BTreeMap, time::Duration};

use grid_defence_core::{CellCoord, TurretId, UpgradeTiers};

/// Snapshot of a turret stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TurretState {
    /// Identifier allocated by the world for the turret.
    pub(crate) id: TurretId,
    /// Cell occupied by the turret.
    pub(crate) cell: CellCoord,
    /// Upgrade tiers applied so far.
    pub(crate) tiers: UpgradeTiers,
    /// Current aim angle in radians.
    pub(crate) aim: f32,
    /// Time left before the turret may fire again; never below zero.
    pub(crate) cooldown: Duration,
    /// Gold paid to place the turret. Upgrades are not added.
    pub(crate) spent: u32,
}

/// Registry that stores turrets and manages identifier allocation.
#[derive(Clone, Debug)]
pub(crate) struct TurretRegistry {
    entries: BTreeMap<TurretId, TurretState>,
    next_turret_id: TurretId,
}

impl TurretRegistry {
    /// Creates an empty turret registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_turret_id: TurretId::new(0),
        }
    }

    /// Stores a fresh tier-one turret and returns its identifier.
    pub(crate) fn insert(&mut self, cell: CellCoord, spent: u32) -> TurretId {
        let id = self.next_turret_id;
        self.next_turret_id = TurretId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            TurretState {
                id,
                cell,
                tiers: UpgradeTiers::BASE,
                aim: 0.0,
                cooldown: Duration::ZERO,
                spent,
            },
        );
        id
    }

    pub(crate) fn remove(&mut self, id: TurretId) -> Option<TurretState> {
        self.entries.remove(&id)
    }

    pub(crate) fn get(&self, id: TurretId) -> Option<&TurretState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TurretId) -> Option<&mut TurretState> {
        self.entries.get_mut(&id)
    }

    /// Identifier of the turret occupying `cell`, if any.
    pub(crate) fn at(&self, cell: CellCoord) -> Option<TurretId> {
        self.entries
            .values()
            .find(|turret| turret.cell == cell)
            .map(|turret| turret.id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TurretState> {
        self.entries.values()
    }

    /// Runs every cooldown down by `dt`, stopping at zero.
    pub(crate) fn cool_down(&mut self, dt: Duration) {
        for turret in self.entries.values_mut() {
            turret.cooldown = turret.cooldown.saturating_sub(dt);
        }
    }

    /// Removes every turret rejected by `keep`, returning the removed identifiers.
    pub(crate) fn retain<F>(&mut self, mut keep: F) -> Vec<TurretId>
    where
        F: FnMut(&TurretState) -> bool,
    {
        let removed: Vec<TurretId> = self
            .entries
            .values()
            .filter(|turret| !keep(turret))
            .map(|turret| turret.id)
            .collect();
        for id in &removed {
            let _ = self.entries.remove(id);
        }
        removed
    }
}
