use astar_visualizer::{run_search, Grid, Manhattan};
use std::ops::ControlFlow;

// In this example a path is found on a 5x5 grid with shape
//  _____
// |S    |
// | ### |
// | #   |
// | # # |
// |   #E|
//  _____
// where
// - # marks a barrier
// - S marks the start
// - E marks the end
//
// Every step of the search is printed as it happens.

fn main() {
    let mut grid: Grid = "S....\n.###.\n.#...\n.#.#.\n...#E".parse().unwrap();
    grid.recompute_all_neighbours();
    let (start, end) = grid.endpoints().unwrap();
    let mut frame = 0;
    let run = run_search(&mut grid, start, end, Manhattan, |g| {
        frame += 1;
        println!("Step {frame}:\n{g}");
        ControlFlow::Continue(())
    })
    .unwrap();
    println!("{:?} after {} expansions", run.outcome, run.expansions);
    if let Some(path) = run.outcome.path() {
        println!("Waypoints:");
        for p in path.waypoints(&grid) {
            println!("{:?}", p);
        }
    }
}
