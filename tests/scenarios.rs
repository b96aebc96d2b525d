use astar_visualizer::{
    run_search, CellIndex, CellState, Grid, Manhattan, SearchOutcome, SearchRun,
};
use std::ops::ControlFlow;

fn search(grid: &mut Grid) -> SearchRun {
    grid.recompute_all_neighbours();
    let (start, end) = grid.endpoints().unwrap();
    run_search(grid, start, end, Manhattan, |_| ControlFlow::Continue(())).unwrap()
}

fn path_cells(grid: &Grid) -> Vec<CellIndex> {
    (0..grid.len())
        .filter(|&ix| grid.state(ix) == CellState::Path)
        .collect()
}

#[test]
fn open_grid_corner_to_corner() {
    let mut grid = Grid::build(5, 500).unwrap();
    grid.set_cell_state(0, 0, CellState::Start).unwrap();
    grid.set_cell_state(4, 4, CellState::End).unwrap();
    let run = search(&mut grid);
    let path = run.outcome.path().expect("path on an empty grid");
    assert_eq!(path.len(), 8);
    assert_eq!(path.cells().first(), Some(&0));
    assert_eq!(path.cells().last(), Some(&24));
    assert_eq!(path_cells(&grid).len(), 7);
}

#[test]
fn routes_around_a_wall() {
    //  ___
    // |S  |
    // |## |
    // |E  |
    //  ___
    let mut grid: Grid = "S..\n##.\nE..".parse().unwrap();
    let run = search(&mut grid);
    let path = run.outcome.path().unwrap();
    assert_eq!(path.len(), 6);
    assert_eq!(path.cells(), &[0, 1, 2, 5, 8, 7, 6]);
    assert_eq!(grid.to_string(), "S**\n##*\nE**\n");
}

#[test]
fn full_wall_blocks_the_goal() {
    let mut grid: Grid = "S..\n###\n..E".parse().unwrap();
    let run = search(&mut grid);
    assert_eq!(run.outcome, SearchOutcome::NoPath);
    assert!(path_cells(&grid).is_empty());
    // Everything on the start side was expanded.
    assert_eq!(grid.state(1), CellState::Closed);
    assert_eq!(grid.state(2), CellState::Closed);
    assert_eq!(grid.state(6), CellState::Empty);
}

#[test]
fn single_gap_is_used() {
    for gap in 0..3 {
        let mut grid: Grid = "S..\n###\n..E".parse().unwrap();
        grid.reset_cell(1, gap).unwrap();
        let run = search(&mut grid);
        let path = run.outcome.path().unwrap();
        assert!(path.cells().contains(&(3 + gap)), "gap at column {gap}");
        assert_eq!(path.len(), 4);
    }
}

#[test]
fn abort_freezes_the_grid() {
    let mut grid = Grid::build(10, 100).unwrap();
    grid.set_cell_state(0, 0, CellState::Start).unwrap();
    grid.set_cell_state(9, 9, CellState::End).unwrap();
    grid.recompute_all_neighbours();
    let mut calls = 0;
    let mut snapshot = None;
    let run = run_search(&mut grid, 0, 99, Manhattan, |g| {
        calls += 1;
        if calls == 3 {
            snapshot = Some(g.to_string());
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    })
    .unwrap();
    assert_eq!(run.outcome, SearchOutcome::Aborted);
    assert_eq!(run.expansions, 3);
    assert_eq!(Some(grid.to_string()), snapshot);
    assert!(path_cells(&grid).is_empty());
}

#[test]
fn reset_always_gives_empty() {
    let mut grid = Grid::build(2, 20).unwrap();
    for state in [
        CellState::Empty,
        CellState::Open,
        CellState::Closed,
        CellState::Barrier,
        CellState::Start,
        CellState::End,
        CellState::Path,
    ] {
        grid.set_cell_state(1, 1, state).unwrap();
        grid.reset_cell(1, 1).unwrap();
        assert_eq!(grid.get(1, 1).unwrap().state(), CellState::Empty);
    }
}

#[test]
fn barrier_edits_need_recomputation() {
    let mut grid: Grid = "S..\n...\n..E".parse().unwrap();
    grid.recompute_all_neighbours();
    grid.set_cell_state(1, 0, CellState::Barrier).unwrap();
    // Stale until recomputed.
    assert!(grid.cell(0).neighbours().contains(&3));
    grid.recompute_all_neighbours();
    assert!(!grid.cell(0).neighbours().contains(&3));
}

#[test]
fn repeated_runs_agree() {
    let text = "S....\n.#.#.\n.#.#.\n...#.\n.#..E";
    let mut first: Grid = text.parse().unwrap();
    let mut second: Grid = text.parse().unwrap();
    let a = search(&mut first);
    let b = search(&mut second);
    assert!(a.parents.iter().eq(b.parents.iter()));
    assert_eq!(a.outcome, b.outcome);
    assert_eq!(a.outcome.path().map(|p| p.len()), Some(8));
}
