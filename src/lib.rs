//! # astar_visualizer
//!
//! The search core of an interactive grid pathfinding visualizer. A user paints a start
//! cell, an end cell and barriers onto a square [Grid]; an
//! [A* search](https://en.wikipedia.org/wiki/A*_search_algorithm) then colours the frontier,
//! the expanded cells and finally the shortest path, yielding to the host after every step
//! so each intermediate state can be drawn.
//!
//! Movement is 4-connected with unit cost. Cells live in a flat arena owned by the grid and
//! refer to their neighbours by index. Drawing goes through the [Canvas] trait so the core
//! does not depend on any windowing library; [FrameBuffer] is a built-in in-memory canvas.
//!
//! ```
//! use astar_visualizer::{run_search, Grid, Manhattan, SearchOutcome};
//! use std::ops::ControlFlow;
//!
//! let mut grid: Grid = "S..\n##.\nE..".parse().unwrap();
//! grid.recompute_all_neighbours();
//! let (start, end) = grid.endpoints().unwrap();
//! let run = run_search(&mut grid, start, end, Manhattan, |_| ControlFlow::Continue(())).unwrap();
//! assert_eq!(run.outcome.path().map(|p| p.len()), Some(6));
//! print!("{}", grid);
//! ```
pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod path;
pub mod render;
pub mod search;
pub mod visualizer;

pub use cell::{Cell, CellIndex, CellState};
pub use config::VisualizerConfig;
pub use error::{ConfigurationError, LoadConfigError, ParseGridError};
pub use grid::Grid;
pub use grid_util::point::Point;
pub use heuristic::{Euclidean, Heuristic, HeuristicKind, Manhattan, Zero};
pub use path::{reconstruct_path, Path};
pub use render::{Canvas, FrameBuffer, Palette, Rgb};
pub use search::{run_search, AstarSearch, Parents, SearchOutcome, SearchRun, Step};
pub use visualizer::{InputEvent, MouseButton, Visualizer};
