//! Phase bookkeeping: build countdown, wave counter and the pending-spawn queue.

use std::{collections::VecDeque, time::Duration};

use grid_defence_core::{Phase, WaveRules};

/// Tracks the active phase, the wave counter and the staggered spawn schedule.
#[derive(Clone, Debug)]
pub(crate) struct PhaseClock {
    phase: Phase,
    wave: u32,
    build_remaining: Duration,
    schedule: SpawnSchedule,
}

impl PhaseClock {
    /// Starts wave one in the build phase.
    pub(crate) fn new(rules: &WaveRules) -> Self {
        let wave = 1;
        Self {
            phase: Phase::Build,
            wave,
            build_remaining: rules.build_duration(wave),
            schedule: SpawnSchedule::default(),
        }
    }

    pub(crate) const fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) const fn wave(&self) -> u32 {
        self.wave
    }

    pub(crate) fn build_remaining(&self) -> Duration {
        if self.phase == Phase::Build {
            self.build_remaining
        } else {
            Duration::ZERO
        }
    }

    /// Spawns still owed by the current wave, whether queued or awaiting resolution.
    pub(crate) fn pending_spawns(&self) -> u32 {
        self.schedule.pending()
    }

    /// Zeroes the build countdown so the next tick starts combat.
    pub(crate) fn skip_build(&mut self) {
        self.build_remaining = Duration::ZERO;
    }

    /// Runs the build countdown down; returns `true` once it has expired.
    pub(crate) fn advance_build(&mut self, dt: Duration) -> bool {
        self.build_remaining = self.build_remaining.saturating_sub(dt);
        self.build_remaining.is_zero()
    }

    /// Enters combat and queues one spawn per interval for the current wave.
    /// Returns the number of spawns scheduled.
    pub(crate) fn begin_combat(&mut self, rules: &WaveRules) -> u32 {
        self.phase = Phase::Combat;
        let count = rules.wave_size(self.wave);
        self.schedule.queue_wave(count, rules.spawn_interval);
        count
    }

    /// Advances the spawn clock, returning how many spawns fell due.
    pub(crate) fn advance_spawns(&mut self, dt: Duration) -> u32 {
        self.schedule.advance(dt)
    }

    /// Marks one due spawn as resolved, returning `false` when none was awaiting.
    pub(crate) fn resolve_spawn(&mut self) -> bool {
        self.schedule.resolve()
    }

    /// Moves to the build phase of the next wave, returning the new wave number.
    pub(crate) fn begin_next_build(&mut self, rules: &WaveRules) -> u32 {
        self.wave = self.wave.saturating_add(1);
        self.phase = Phase::Build;
        self.build_remaining = rules.build_duration(self.wave);
        self.schedule = SpawnSchedule::default();
        self.wave
    }

    pub(crate) fn end_game(&mut self) {
        self.phase = Phase::GameOver;
        self.schedule = SpawnSchedule::default();
    }
}

/// Pending spawns of a wave, each with a due time measured from combat start.
#[derive(Clone, Debug, Default)]
struct SpawnSchedule {
    elapsed: Duration,
    queued: VecDeque<Duration>,
    awaiting: u32,
}

impl SpawnSchedule {
    fn queue_wave(&mut self, count: u32, interval: Duration) {
        self.elapsed = Duration::ZERO;
        self.queued = (0..count).map(|index| interval * index).collect();
        self.awaiting = 0;
    }

    fn advance(&mut self, dt: Duration) -> u32 {
        self.elapsed = self.elapsed.saturating_add(dt);
        let mut due = 0;
        while self
            .queued
            .front()
            .is_some_and(|due_at| *due_at <= self.elapsed)
        {
            let _ = self.queued.pop_front();
            due += 1;
        }
        self.awaiting += due;
        due
    }

    fn resolve(&mut self) -> bool {
        if self.awaiting == 0 {
            return false;
        }
        self.awaiting -= 1;
        true
    }

    fn pending(&self) -> u32 {
        self.awaiting + self.queued.len() as u32
    }
}
