//! Gold ledger and tower durability.

use grid_defence_core::{CommandError, EconomyRules};

/// Gold balance and tower hit points. Gold never goes negative: spending
/// more than the balance fails instead of clamping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Ledger {
    gold: u32,
    tower_health: u32,
    tower_max_health: u32,
}

impl Ledger {
    pub(crate) fn new(rules: &EconomyRules) -> Self {
        Self {
            gold: rules.starting_gold,
            tower_health: rules.tower_max_health,
            tower_max_health: rules.tower_max_health,
        }
    }

    pub(crate) const fn gold(&self) -> u32 {
        self.gold
    }

    pub(crate) const fn tower_health(&self) -> u32 {
        self.tower_health
    }

    pub(crate) const fn tower_max_health(&self) -> u32 {
        self.tower_max_health
    }

    pub(crate) const fn can_afford(&self, cost: u32) -> bool {
        self.gold >= cost
    }

    /// Ensures the balance covers `cost` without touching it.
    pub(crate) fn ensure_affordable(&self, cost: u32) -> Result<(), CommandError> {
        if self.can_afford(cost) {
            Ok(())
        } else {
            Err(CommandError::InsufficientFunds {
                required: cost,
                available: self.gold,
            })
        }
    }

    /// Debits `cost` in full or not at all.
    pub(crate) fn spend(&mut self, cost: u32) -> Result<(), CommandError> {
        self.ensure_affordable(cost)?;
        self.gold -= cost;
        Ok(())
    }

    pub(crate) fn credit(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    pub(crate) const fn tower_destroyed(&self) -> bool {
        self.tower_health == 0
    }

    /// Deals damage to the tower, returning the hit points left.
    pub(crate) fn damage_tower(&mut self, amount: u32) -> u32 {
        self.tower_health = self.tower_health.saturating_sub(amount);
        self.tower_health
    }

    /// Pays for a repair and heals the tower, capped at its maximum.
    pub(crate) fn repair_tower(&mut self, cost: u32, amount: u32) -> Result<u32, CommandError> {
        self.ensure_affordable(cost)?;
        if self.tower_health >= self.tower_max_health {
            return Err(CommandError::TowerAtFullHealth);
        }
        self.gold -= cost;
        self.tower_health = self
            .tower_health
            .saturating_add(amount)
            .min(self.tower_max_health);
        Ok(self.tower_health)
    }
}
