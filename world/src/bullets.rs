//! Bullets in flight.

use std::time::Duration;

use glam::Vec2;
use grid_defence_core::BulletSnapshot;

#[derive(Clone, Debug)]
pub(crate) struct BulletState {
    pub(crate) position: Vec2,
    /// Pixels per second.
    pub(crate) velocity: Vec2,
    pub(crate) damage: f32,
    pub(crate) life: Duration,
}

/// Bullets in firing order.
#[derive(Clone, Debug, Default)]
pub(crate) struct BulletField {
    entries: Vec<BulletState>,
}

impl BulletField {
    pub(crate) fn fire(&mut self, bullet: BulletState) {
        self.entries.push(bullet);
    }

    /// Ages and moves every bullet, dropping those whose lifetime ran out.
    pub(crate) fn advance(&mut self, dt: Duration) {
        let secs = dt.as_secs_f32();
        self.entries.retain_mut(|bullet| {
            bullet.life = bullet.life.saturating_sub(dt);
            bullet.position += bullet.velocity * secs;
            !bullet.life.is_zero()
        });
    }

    /// Keeps only the bullets for which `keep` returns `true`.
    pub(crate) fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&BulletState) -> bool,
    {
        self.entries.retain(keep);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn snapshots(&self) -> Vec<BulletSnapshot> {
        self.entries
            .iter()
            .map(|bullet| BulletSnapshot {
                position: bullet.position,
                velocity: bullet.velocity,
                damage: bullet.damage,
            })
            .collect()
    }
}
