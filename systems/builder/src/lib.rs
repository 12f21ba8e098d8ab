#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure build-phase system responsible for turning player input into commands.

use grid_defence_core::{BuildTool, CellCoord, Event, Phase, PlayerCommand, UpgradeStat};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Tool chosen in the shop; `None` once a long press cancelled it.
    pub tool: Option<BuildTool>,
    /// Cell under the pointer, if it lies on the grid.
    pub cursor_cell: Option<CellCoord>,
    /// Indicates whether the player tapped the grid on this frame.
    pub confirm_action: bool,
    /// Upgrade button pressed on this frame.
    pub upgrade: Option<UpgradeStat>,
    /// Indicates whether the repair button was pressed on this frame.
    pub repair_action: bool,
    /// Indicates whether the skip button was pressed on this frame.
    pub skip_action: bool,
}

impl BuilderInput {
    /// Creates an input descriptor for a tap on `cell` with the provided tool.
    #[must_use]
    pub const fn tap(tool: Option<BuildTool>, cell: CellCoord) -> Self {
        Self {
            tool,
            cursor_cell: Some(cell),
            confirm_action: true,
            upgrade: None,
            repair_action: false,
            skip_action: false,
        }
    }
}

/// Builder system that translates tool selection + input into player commands.
#[derive(Debug, Clone)]
pub struct Builder {
    phase: Phase,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a new builder system instance; worlds start in the build phase.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Phase::Build,
        }
    }

    /// Consumes world events and adapter-derived input to emit player commands.
    ///
    /// A tap first selects whatever turret sits under the pointer and then
    /// applies the active tool. Tapping an existing turret with the turret
    /// tool only selects it. The `turret_at` closure should mirror the world's
    /// turret occupancy.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        turret_at: F,
        out: &mut Vec<PlayerCommand>,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        for event in events {
            if let Event::PhaseChanged { phase, .. } = event {
                self.phase = *phase;
            }
        }

        if self.phase == Phase::GameOver {
            return;
        }

        if let Some(stat) = input.upgrade {
            out.push(PlayerCommand::UpgradeTurret { stat });
        }
        if input.repair_action {
            out.push(PlayerCommand::RepairTower);
        }

        if self.phase != Phase::Build {
            return;
        }

        if input.skip_action {
            out.push(PlayerCommand::SkipBuildPhase);
        }

        if !input.confirm_action {
            return;
        }
        let Some(cell) = input.cursor_cell else {
            return;
        };

        out.push(PlayerCommand::SelectTurret { cell });
        match input.tool {
            Some(BuildTool::Turret) if !turret_at(cell) => {
                out.push(PlayerCommand::PlaceTurret { cell });
            }
            Some(BuildTool::Barrier) => out.push(PlayerCommand::PlaceBarrier { cell }),
            Some(BuildTool::Sell) => out.push(PlayerCommand::Sell { cell }),
            Some(BuildTool::Turret) | None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combat_phase_ignores_taps_but_not_upgrades() {
        let mut builder = Builder::new();
        let mut out = Vec::new();
        let input = BuilderInput {
            upgrade: Some(UpgradeStat::Range),
            skip_action: true,
            ..BuilderInput::tap(Some(BuildTool::Turret), CellCoord::new(1, 1))
        };

        builder.handle(
            &[Event::PhaseChanged {
                phase: Phase::Combat,
                wave: 1,
            }],
            input,
            |_| false,
            &mut out,
        );

        assert_eq!(
            out,
            vec![PlayerCommand::UpgradeTurret {
                stat: UpgradeStat::Range
            }]
        );
    }

    #[test]
    fn game_over_silences_all_input() {
        let mut builder = Builder::new();
        let mut out = Vec::new();
        builder.handle(
            &[Event::PhaseChanged {
                phase: Phase::GameOver,
                wave: 4,
            }],
            BuilderInput {
                repair_action: true,
                ..BuilderInput::tap(Some(BuildTool::Sell), CellCoord::new(0, 0))
            },
            |_| false,
            &mut out,
        );
        assert!(out.is_empty());
    }
}
