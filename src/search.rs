//! Best-first (A*) search over the cells of a [Grid].
//!
//! The search mutates cell states as it goes (frontier cells become [CellState::Open],
//! expanded cells [CellState::Closed], the final route [CellState::Path]) and hands control
//! back to the caller after every expansion so the grid can be redrawn. The caller answers
//! with a [ControlFlow]; [ControlFlow::Break] aborts the search on the spot.
use fxhash::{FxBuildHasher, FxHashMap, FxHashSet};
use grid_util::point::Point;
use indexmap::IndexMap;
use log::{info, trace};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::ControlFlow;

use crate::cell::{CellIndex, CellState, Neighbours};
use crate::error::ConfigurationError;
use crate::grid::Grid;
use crate::heuristic::Heuristic;
use crate::path::{reconstruct_path, Path};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Maps every relaxed cell to the cell it was last reached from, in the order the cells
/// were first reached.
pub type Parents = FxIndexMap<CellIndex, CellIndex>;

/// Cost of moving between two adjacent cells.
pub const STEP_COST: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FrontierEntry {
    f_score: u32,
    sequence: u64,
    index: CellIndex,
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for the max-heap: the smallest estimated cost comes out first and ties go
        // to whichever entry was inserted earlier.
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Frontier and cost bookkeeping of a single search run.
#[derive(Clone, Debug, Default)]
pub struct SearchState {
    frontier: BinaryHeap<FrontierEntry>,
    open: FxHashSet<CellIndex>,
    g_score: FxHashMap<CellIndex, u32>,
    f_score: FxHashMap<CellIndex, u32>,
    parents: Parents,
    sequence: u64,
}

impl SearchState {
    fn new(start: CellIndex, start_estimate: u32) -> SearchState {
        let mut state = SearchState::default();
        state.g_score.insert(start, 0);
        state.f_score.insert(start, start_estimate);
        state.open.insert(start);
        state.frontier.push(FrontierEntry {
            f_score: start_estimate,
            sequence: 0,
            index: start,
        });
        state
    }

    fn push(&mut self, index: CellIndex, f_score: u32) {
        self.sequence += 1;
        self.frontier.push(FrontierEntry {
            f_score,
            sequence: self.sequence,
            index,
        });
    }

    /// Pops the best frontier entry. An open cell whose cost improved keeps the entry it
    /// was inserted with.
    fn pop(&mut self) -> Option<CellIndex> {
        let entry = self.frontier.pop()?;
        self.open.remove(&entry.index);
        Some(entry.index)
    }

    /// Best known cost from the start, [None] meaning unreached.
    pub fn g_score(&self, index: CellIndex) -> Option<u32> {
        self.g_score.get(&index).copied()
    }

    pub fn f_score(&self, index: CellIndex) -> Option<u32> {
        self.f_score.get(&index).copied()
    }

    pub fn is_open(&self, index: CellIndex) -> bool {
        self.open.contains(&index)
    }

    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    pub fn parents(&self) -> &Parents {
        &self.parents
    }
}

/// Result of a single [AstarSearch::step].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The cell was taken off the frontier and its neighbours were relaxed.
    Expanded(CellIndex),
    /// The goal was taken off the frontier.
    Found,
    /// The frontier is empty and the goal was never reached.
    Exhausted,
}

/// How a search run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    Success(Path),
    NoPath,
    Aborted,
}

impl SearchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Success(_))
    }

    /// The found path, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Success(path) => Some(path),
            _ => None,
        }
    }
}

/// Everything a finished [run_search] leaves behind besides the coloured grid.
#[derive(Clone, Debug)]
pub struct SearchRun {
    pub outcome: SearchOutcome,
    pub parents: Parents,
    pub expansions: usize,
}

/// A* search that can be advanced one expansion at a time, for hosts that drive the
/// animation from their own frame loop. [run_search] wraps it in a callback-driven loop.
///
/// Neighbour lists are taken from the cells as they are, so
/// [Grid::recompute_all_neighbours] must have been called after the last barrier edit.
pub struct AstarSearch<'g, H> {
    grid: &'g mut Grid,
    start: CellIndex,
    goal: CellIndex,
    goal_point: Point,
    heuristic: H,
    state: SearchState,
    pending_close: Option<CellIndex>,
    expansions: usize,
}

fn check_endpoint(grid: &Grid, index: CellIndex) -> Result<(), ConfigurationError> {
    let rows = grid.rows();
    let (row, column) = (index / rows, index % rows);
    if index >= grid.len() {
        Err(ConfigurationError::CellOutOfRange { row, column })
    } else if grid.cell(index).is_barrier() {
        Err(ConfigurationError::BarrierEndpoint { row, column })
    } else {
        Ok(())
    }
}

impl<'g, H: Heuristic> AstarSearch<'g, H> {
    pub fn new(
        grid: &'g mut Grid,
        start: CellIndex,
        goal: CellIndex,
        heuristic: H,
    ) -> Result<AstarSearch<'g, H>, ConfigurationError> {
        check_endpoint(grid, start)?;
        check_endpoint(grid, goal)?;
        let goal_point = grid.cell(goal).point();
        let start_estimate = heuristic.estimate(grid.cell(start).point(), goal_point);
        Ok(AstarSearch {
            grid,
            start,
            goal,
            goal_point,
            heuristic,
            state: SearchState::new(start, start_estimate),
            pending_close: None,
            expansions: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &*self.grid
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn start(&self) -> CellIndex {
        self.start
    }

    pub fn goal(&self) -> CellIndex {
        self.goal
    }

    /// Number of [Step::Expanded] steps so far.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Performs one outer iteration of the search. The cell expanded by the previous call
    /// is marked closed first, so that a redraw between two calls still shows it as the
    /// cell being expanded.
    pub fn step(&mut self) -> Step {
        if let Some(previous) = self.pending_close.take() {
            if previous != self.start {
                self.grid.set_state(previous, CellState::Closed);
            }
        }
        let Some(current) = self.state.pop() else {
            return Step::Exhausted;
        };
        if current == self.goal {
            return Step::Found;
        }
        trace!("Expanding cell {}", current);
        let current_g = self.state.g_score[&current];
        let neighbours = Neighbours::from_slice(self.grid.cell(current).neighbours());
        for neighbour in neighbours {
            let tentative_g = current_g + STEP_COST;
            let known_g = self.state.g_score.get(&neighbour).copied().unwrap_or(u32::MAX);
            if tentative_g >= known_g {
                continue;
            }
            let f_score = tentative_g.saturating_add(
                self.heuristic
                    .estimate(self.grid.cell(neighbour).point(), self.goal_point),
            );
            self.state.parents.insert(neighbour, current);
            self.state.g_score.insert(neighbour, tentative_g);
            self.state.f_score.insert(neighbour, f_score);
            if self.state.open.insert(neighbour) {
                self.state.push(neighbour, f_score);
                self.grid.set_state(neighbour, CellState::Open);
            }
        }
        self.expansions += 1;
        self.pending_close = Some(current);
        Step::Expanded(current)
    }

    /// Consumes the search and returns the parent map.
    pub fn into_parents(self) -> Parents {
        self.state.parents
    }
}

/// Runs an A* search from `start` to `goal` on `grid`, calling `on_step` once after every
/// expansion and once per path cell during reconstruction. Returning
/// [ControlFlow::Break] from `on_step` aborts the search without touching any more cells.
///
/// On success the path cells are marked [CellState::Path] and the goal keeps
/// [CellState::End]. Cell states are left as they are when the search fails or is aborted.
pub fn run_search<H, F>(
    grid: &mut Grid,
    start: CellIndex,
    goal: CellIndex,
    heuristic: H,
    mut on_step: F,
) -> Result<SearchRun, ConfigurationError>
where
    H: Heuristic,
    F: FnMut(&Grid) -> ControlFlow<()>,
{
    let mut search = AstarSearch::new(grid, start, goal, heuristic)?;
    info!(
        "Searching from {} to {}",
        search.grid().cell(start).point(),
        search.goal_point
    );
    let found = loop {
        match search.step() {
            Step::Expanded(_) => {
                if on_step(search.grid()).is_break() {
                    break false;
                }
            }
            Step::Found => break true,
            Step::Exhausted => {
                let expansions = search.expansions();
                info!("No path found after {} expansions", expansions);
                return Ok(SearchRun {
                    outcome: SearchOutcome::NoPath,
                    parents: search.into_parents(),
                    expansions,
                });
            }
        }
    };
    let expansions = search.expansions();
    let parents = search.into_parents();
    if !found {
        info!("Search aborted after {} expansions", expansions);
        return Ok(SearchRun {
            outcome: SearchOutcome::Aborted,
            parents,
            expansions,
        });
    }
    let outcome = match reconstruct_path(grid, &parents, goal, &mut on_step) {
        ControlFlow::Continue(path) => {
            if goal != start {
                grid.set_state(goal, CellState::End);
            }
            info!(
                "Found path of length {} after {} expansions",
                path.len(),
                expansions
            );
            SearchOutcome::Success(path)
        }
        ControlFlow::Break(()) => {
            info!("Search aborted during path reconstruction");
            SearchOutcome::Aborted
        }
    };
    Ok(SearchRun {
        outcome,
        parents,
        expansions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::{Manhattan, Zero};

    fn prepared(text: &str) -> (Grid, CellIndex, CellIndex) {
        let mut grid: Grid = text.parse().unwrap();
        grid.recompute_all_neighbours();
        let (start, end) = grid.endpoints().unwrap();
        (grid, start, end)
    }

    #[test]
    fn frontier_orders_by_cost_then_sequence() {
        let mut heap = BinaryHeap::new();
        for (f_score, sequence, index) in [(5, 0, 0), (3, 2, 1), (3, 1, 2), (4, 3, 3)] {
            heap.push(FrontierEntry {
                f_score,
                sequence,
                index,
            });
        }
        let order = std::iter::from_fn(|| heap.pop().map(|e| e.index)).collect::<Vec<_>>();
        assert_eq!(order, vec![2, 1, 3, 0]);
    }

    #[test]
    fn improved_open_cell_keeps_its_entry() {
        // Overestimates the left column so that (2, 0) is first opened the long way round.
        let detour = |p: Point, _goal: Point| -> u32 {
            match (p.x, p.y) {
                (0, 1) => 10,
                (0, 2) => 20,
                _ => 0,
            }
        };
        let (mut grid, start, end) = prepared("S..\n.#.\nE..");
        let mut search = AstarSearch::new(&mut grid, start, end, detour).unwrap();
        let expanded = std::iter::from_fn(|| match search.step() {
            Step::Expanded(ix) => Some(ix),
            _ => None,
        })
        .take(7)
        .collect::<Vec<_>>();
        assert_eq!(expanded, vec![0, 1, 2, 5, 8, 7, 3]);
        assert_eq!(search.state().g_score(end), Some(2));
        assert_eq!(search.state().f_score(end), Some(22));
        assert_eq!(search.state().parents()[&end], 3);
        assert_eq!(search.state.frontier.len(), search.state().open_len());
        assert_eq!(search.step(), Step::Found);
        assert_eq!(search.expansions(), 7);
    }

    #[test]
    fn open_and_closed_stay_disjoint() {
        let (mut grid, start, end) = prepared("S..#.\n.#...\n...#.\n.#.#.\n...#E");
        let mut search = AstarSearch::new(&mut grid, start, end, Manhattan).unwrap();
        loop {
            let step = search.step();
            for ix in 0..search.grid().len() {
                if search.state().is_open(ix) {
                    assert_ne!(search.grid().state(ix), CellState::Closed, "cell {}", ix);
                }
            }
            for &ix in search.state().parents().keys() {
                assert!(search.state().g_score(ix).is_some(), "cell {}", ix);
            }
            if !matches!(step, Step::Expanded(_)) {
                break;
            }
        }
        assert!(search.state().parents().contains_key(&end));
    }

    #[test]
    fn start_is_never_closed_or_opened() {
        let (mut grid, start, end) = prepared("S..\n...\n..E");
        let run = run_search(&mut grid, start, end, Manhattan, |_| ControlFlow::Continue(()))
            .unwrap();
        assert!(run.outcome.is_success());
        assert_eq!(grid.state(start), CellState::Start);
        assert_eq!(grid.state(end), CellState::End);
        assert!(!run.parents.contains_key(&start));
    }

    #[test]
    fn callback_runs_once_per_expansion_and_path_cell() {
        let (mut grid, start, end) = prepared("S....\n.....\n.....\n.....\n....E");
        let mut calls = 0;
        let run = run_search(&mut grid, start, end, Manhattan, |_| {
            calls += 1;
            ControlFlow::Continue(())
        })
        .unwrap();
        let path = run.outcome.path().unwrap();
        assert_eq!(path.len(), 8);
        assert_eq!(calls, run.expansions + 7);
    }

    #[test]
    fn stepping_marks_open_then_closed() {
        let (mut grid, start, end) = prepared("S..\n...\n..E");
        let mut search = AstarSearch::new(&mut grid, start, end, Zero).unwrap();
        assert_eq!(search.step(), Step::Expanded(start));
        // Down first, then right.
        assert_eq!(search.grid().state(3), CellState::Open);
        assert_eq!(search.grid().state(1), CellState::Open);
        assert_eq!(search.state().g_score(3), Some(1));
        assert_eq!(search.step(), Step::Expanded(3));
        assert_eq!(search.grid().state(start), CellState::Start);
        assert_eq!(search.grid().state(3), CellState::Open);
        search.step();
        assert_eq!(search.grid().state(3), CellState::Closed);
    }

    #[test]
    fn equal_start_goal() {
        let mut grid = Grid::build(1, 10).unwrap();
        grid.set_cell_state(0, 0, CellState::Start).unwrap();
        grid.recompute_all_neighbours();
        let run = run_search(&mut grid, 0, 0, Manhattan, |_| ControlFlow::Continue(())).unwrap();
        let path = run.outcome.path().unwrap();
        assert_eq!(path.len(), 0);
        assert_eq!(path.cells(), &[0]);
        assert_eq!(grid.state(0), CellState::Start);
    }

    #[test]
    fn rejects_bad_endpoints() {
        let (mut grid, start, _) = prepared("S#.\n...\n..E");
        assert_eq!(
            run_search(&mut grid, start, 1, Manhattan, |_| ControlFlow::Continue(()))
                .unwrap_err(),
            ConfigurationError::BarrierEndpoint { row: 0, column: 1 }
        );
        assert_eq!(
            run_search(&mut grid, start, 9, Manhattan, |_| ControlFlow::Continue(()))
                .unwrap_err(),
            ConfigurationError::CellOutOfRange { row: 3, column: 0 }
        );
    }

    #[test]
    fn abort_during_reconstruction() {
        let (mut grid, start, end) = prepared("S..\n...\n..E");
        let mut expansions_seen = 0;
        let run = run_search(&mut grid, start, end, Manhattan, |g| {
            if g.cells().iter().any(|c| c.state() == CellState::Path) {
                return ControlFlow::Break(());
            }
            expansions_seen += 1;
            ControlFlow::Continue(())
        })
        .unwrap();
        assert_eq!(run.outcome, SearchOutcome::Aborted);
        assert_eq!(run.expansions, expansions_seen);
        let marked = grid
            .cells()
            .iter()
            .filter(|c| c.state() == CellState::Path)
            .count();
        assert_eq!(marked, 1);
    }
}
