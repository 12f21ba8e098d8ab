//! Bounded grid layout, tower anchoring and barrier occupancy.

use std::collections::BTreeMap;

use glam::Vec2;
use grid_defence_core::{BarrierSnapshot, CellCoord, GridLayout, GridRules};

use crate::navigation::{self, Obstacles};

/// Derives the grid layout that best fills a viewport of the provided size.
///
/// Column and row counts track the preferred cell size, are clamped to the
/// configured limits and forced odd so the tower sits on an exact centre cell.
/// Returns `None` for degenerate viewports that cannot hold a single pixel per cell.
pub(crate) fn layout_for_viewport(width: f32, height: f32, rules: &GridRules) -> Option<GridLayout> {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return None;
    }
    if !(rules.target_cell_size > 0.0) {
        return None;
    }

    let columns = fit_count(width / rules.target_cell_size, rules.min_columns, rules.max_columns);
    let rows = fit_count(height / rules.target_cell_size, rules.min_rows, rules.max_rows);
    if columns == 0 || rows == 0 {
        return None;
    }

    let cell_size = (width / columns as f32).min(height / rows as f32).floor();
    if cell_size < 1.0 {
        return None;
    }

    let origin = Vec2::new(
        ((width - cell_size * columns as f32) / 2.0).floor(),
        ((height - cell_size * rows as f32) / 2.0).floor(),
    );
    Some(GridLayout::new(columns, rows, cell_size, origin))
}

fn fit_count(ratio: f32, min: u32, max: u32) -> u32 {
    let rounded = if ratio.is_finite() && ratio > 0.0 {
        ratio.round() as u32
    } else {
        0
    };
    let count = rounded.max(min).min(max);
    if count % 2 == 1 {
        count
    } else if count < max {
        count + 1
    } else {
        count.saturating_sub(1)
    }
}

/// Authoritative grid state: layout, tower anchor and barriers with their hit points.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    layout: GridLayout,
    tower: CellCoord,
    barriers: BTreeMap<CellCoord, u32>,
}

impl Grid {
    /// Creates an empty grid with the tower snapped to the layout centre.
    pub(crate) fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            tower: layout.center_cell(),
            barriers: BTreeMap::new(),
        }
    }

    pub(crate) const fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub(crate) const fn tower(&self) -> CellCoord {
        self.tower
    }

    pub(crate) fn tower_center(&self) -> Vec2 {
        self.layout.cell_center(self.tower)
    }

    pub(crate) const fn in_bounds(&self, cell: CellCoord) -> bool {
        self.layout.contains(cell)
    }

    pub(crate) fn is_tower_at(&self, cell: CellCoord) -> bool {
        self.tower == cell
    }

    pub(crate) fn is_barrier(&self, cell: CellCoord) -> bool {
        self.barriers.contains_key(&cell)
    }

    /// Adds a barrier; returns `false` when the cell already holds one.
    pub(crate) fn insert_barrier(&mut self, cell: CellCoord, health: u32) -> bool {
        if self.barriers.contains_key(&cell) {
            return false;
        }
        let _ = self.barriers.insert(cell, health);
        true
    }

    /// Removes a barrier, yielding the hit points it had left.
    pub(crate) fn remove_barrier(&mut self, cell: CellCoord) -> Option<u32> {
        self.barriers.remove(&cell)
    }

    /// Deals damage to a barrier, removing it once its hit points run out.
    ///
    /// Returns the hit points left, where zero means the barrier was destroyed,
    /// or `None` when no barrier occupies the cell.
    pub(crate) fn damage_barrier(&mut self, cell: CellCoord, amount: u32) -> Option<u32> {
        let health = self.barriers.get_mut(&cell)?;
        *health = health.saturating_sub(amount);
        let remaining = *health;
        if remaining == 0 {
            let _ = self.barriers.remove(&cell);
        }
        Some(remaining)
    }

    pub(crate) fn barrier_snapshots(&self) -> Vec<BarrierSnapshot> {
        self.barriers
            .iter()
            .map(|(&cell, &health)| BarrierSnapshot { cell, health })
            .collect()
    }

    /// Shortest path from `start` to the tower using the requested search variant.
    pub(crate) fn path_to_tower(
        &self,
        start: CellCoord,
        obstacles: Obstacles,
    ) -> Option<Vec<CellCoord>> {
        let (width, height) = (self.layout.columns(), self.layout.rows());
        match obstacles {
            Obstacles::Respect => navigation::find_path(width, height, start, self.tower, |cell| {
                self.is_barrier(cell)
            }),
            Obstacles::Ignore => navigation::find_path(width, height, start, self.tower, |_| false),
        }
    }

    /// Reports whether sampled boundary cells still reach the tower around the barriers.
    pub(crate) fn tower_reachable(&self, samples: usize) -> bool {
        navigation::tower_reachable(
            self.layout.columns(),
            self.layout.rows(),
            self.tower,
            samples,
            |cell| self.is_barrier(cell),
        )
    }

    /// Nearest barrier-free cell to `cell`, checking the cell itself and then
    /// its four neighbours. Falls back to `cell` when all five are blocked.
    pub(crate) fn nearest_open_cell(&self, cell: CellCoord) -> CellCoord {
        const OFFSETS: [(i64, i64); 5] = [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)];

        OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| {
                let column = u32::try_from(i64::from(cell.column()) + dx).ok()?;
                let row = u32::try_from(i64::from(cell.row()) + dy).ok()?;
                Some(CellCoord::new(column, row))
            })
            .find(|candidate| self.in_bounds(*candidate) && !self.is_barrier(*candidate))
            .unwrap_or(cell)
    }

    /// Replaces the layout, re-centring the tower and discarding barriers that
    /// no longer fit. Returns the discarded barrier cells.
    pub(crate) fn relayout(&mut self, layout: GridLayout) -> Vec<CellCoord> {
        self.layout = layout;
        self.tower = layout.center_cell();

        let tower = self.tower;
        let discarded: Vec<CellCoord> = self
            .barriers
            .keys()
            .copied()
            .filter(|cell| !layout.contains(*cell) || *cell == tower)
            .collect();
        for cell in &discarded {
            let _ = self.barriers.remove(cell);
        }
        discarded
    }
}
