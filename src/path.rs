use grid_util::point::Point;
use std::ops::ControlFlow;

use crate::cell::{CellIndex, CellState};
use crate::grid::Grid;
use crate::search::Parents;

/// A route through the grid, stored from start to goal (both included).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    cells: Vec<CellIndex>,
}

impl Path {
    pub fn cells(&self) -> &[CellIndex] {
        &self.cells
    }

    /// Number of unit moves, one less than the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// True when start and goal coincide.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn start(&self) -> Option<CellIndex> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<CellIndex> {
        self.cells.last().copied()
    }

    pub fn points(&self, grid: &Grid) -> Vec<Point> {
        self.cells.iter().map(|&ix| grid.cell(ix).point()).collect()
    }

    /// Reduces the path to the cells where it changes direction, plus both ends.
    pub fn waypoints(&self, grid: &Grid) -> Vec<Point> {
        let points = self.points(grid);
        let mut waypoints = Vec::new();
        for (i, &p) in points.iter().enumerate() {
            let turns = match (i.checked_sub(1).map(|j| points[j]), points.get(i + 1)) {
                (Some(prev), Some(next)) => {
                    (p.x - prev.x, p.y - prev.y) != (next.x - p.x, next.y - p.y)
                }
                _ => true,
            };
            if turns {
                waypoints.push(p);
            }
        }
        waypoints
    }
}

/// Walks the parent chain back from `goal` and marks every cell between goal and start as
/// [CellState::Path], calling `on_step` after each one. The goal and the start (the only
/// cell without a parent) keep their states.
///
/// Returns [ControlFlow::Break] as soon as `on_step` does, leaving the remaining cells
/// untouched.
pub fn reconstruct_path<F>(
    grid: &mut Grid,
    parents: &Parents,
    goal: CellIndex,
    mut on_step: F,
) -> ControlFlow<(), Path>
where
    F: FnMut(&Grid) -> ControlFlow<()>,
{
    let mut cells = vec![goal];
    let mut current = goal;
    while let Some(&parent) = parents.get(&current) {
        current = parent;
        cells.push(current);
        if parents.contains_key(&current) {
            grid.set_state(current, CellState::Path);
            if on_step(&*grid).is_break() {
                return ControlFlow::Break(());
            }
        }
    }
    cells.reverse();
    ControlFlow::Continue(Path { cells })
}
