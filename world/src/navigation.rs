//! Shortest-path search used for enemy routing and placement validation.

use std::{cmp::Reverse, collections::BinaryHeap};

use grid_defence_core::{CellCoord, EnemyKind};

/// Chooses whether barriers constrain a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Obstacles {
    /// Barrier cells are never expanded and a barrier goal has no path.
    Respect,
    /// Barrier cells are treated like open ground.
    Ignore,
}

impl Obstacles {
    /// Search variant used to route an enemy of the provided kind.
    pub(crate) const fn for_kind(kind: EnemyKind) -> Self {
        if kind.breaks_barriers() {
            Self::Ignore
        } else {
            Self::Respect
        }
    }
}

/// Finds a shortest 4-directional path from `start` to `goal`, both inclusive.
///
/// The search is A* with a Manhattan heuristic, which is admissible and
/// consistent on a uniform-cost grid, so the returned path always has the
/// minimal number of steps. Ties between equally promising frontier nodes are
/// broken arbitrarily; callers must only rely on the path length. `is_blocked`
/// is consulted for every neighbour and for the goal, never for the start.
pub(crate) fn find_path<F>(
    width: u32,
    height: u32,
    start: CellCoord,
    goal: CellCoord,
    is_blocked: F,
) -> Option<Vec<CellCoord>>
where
    F: Fn(CellCoord) -> bool,
{
    if !within(start, width, height) || !within(goal, width, height) {
        return None;
    }

    if is_blocked(goal) {
        return None;
    }

    let width_usize = usize::try_from(width).ok()?;
    let cell_count = width_usize.checked_mul(usize::try_from(height).ok()?)?;
    let start_index = index(width_usize, start)?;
    let goal_index = index(width_usize, goal)?;

    let mut cost = vec![u32::MAX; cell_count];
    let mut came_from = vec![usize::MAX; cell_count];
    let mut closed = vec![false; cell_count];
    let mut frontier = BinaryHeap::new();

    cost[start_index] = 0;
    frontier.push(Reverse((start.manhattan_distance(goal), 0_u32, start_index)));

    while let Some(Reverse((_, _, current_index))) = frontier.pop() {
        if closed[current_index] {
            continue;
        }
        closed[current_index] = true;

        if current_index == goal_index {
            return Some(reconstruct(width_usize, &came_from, start_index, goal_index));
        }

        let current = cell_at(width_usize, current_index);
        let next_cost = cost[current_index].saturating_add(1);

        for neighbor in neighbors(current, width, height) {
            if is_blocked(neighbor) {
                continue;
            }

            let Some(neighbor_index) = index(width_usize, neighbor) else {
                continue;
            };

            if closed[neighbor_index] || cost[neighbor_index] <= next_cost {
                continue;
            }

            cost[neighbor_index] = next_cost;
            came_from[neighbor_index] = current_index;
            let remaining = neighbor.manhattan_distance(goal);
            frontier.push(Reverse((
                next_cost.saturating_add(remaining),
                remaining,
                neighbor_index,
            )));
        }
    }

    None
}

/// Perimeter cells in a fixed order: top and bottom rows interleaved by
/// column, followed by left and right columns interleaved by row.
pub(crate) fn boundary_cells(width: u32, height: u32) -> Vec<CellCoord> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut cells = Vec::with_capacity((width as usize + height as usize) * 2);
    for column in 0..width {
        cells.push(CellCoord::new(column, 0));
        cells.push(CellCoord::new(column, height - 1));
    }
    for row in 0..height {
        cells.push(CellCoord::new(0, row));
        cells.push(CellCoord::new(width - 1, row));
    }
    cells
}

/// Reports whether an obstacle-aware search reaches `tower` from at least one
/// of `samples` evenly spaced boundary cells.
///
/// The stride is rounded down so at least `samples` cells are tried whenever
/// the perimeter is long enough. Blocked samples are skipped.
pub(crate) fn tower_reachable<F>(
    width: u32,
    height: u32,
    tower: CellCoord,
    samples: usize,
    is_blocked: F,
) -> bool
where
    F: Fn(CellCoord) -> bool,
{
    let starts = boundary_cells(width, height);
    if starts.is_empty() {
        return false;
    }

    let stride = (starts.len() / samples.max(1)).max(1);
    starts.iter().step_by(stride).any(|&start| {
        !is_blocked(start)
            && find_path(width, height, start, tower, &is_blocked)
                .is_some_and(|path| path.len() > 1)
    })
}

fn reconstruct(
    width: usize,
    came_from: &[usize],
    start_index: usize,
    goal_index: usize,
) -> Vec<CellCoord> {
    let mut path = vec![cell_at(width, goal_index)];
    let mut cursor = goal_index;
    while cursor != start_index {
        cursor = came_from[cursor];
        path.push(cell_at(width, cursor));
    }
    path.reverse();
    path
}

fn within(cell: CellCoord, width: u32, height: u32) -> bool {
    cell.column() < width && cell.row() < height
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(column) = cell.column().checked_add(1) {
        if column < width {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < height {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

fn cell_at(width: usize, index: usize) -> CellCoord {
    CellCoord::new((index % width) as u32, (index / width) as u32)
}
